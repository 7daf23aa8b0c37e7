//! Clean command implementation.

use ratingset_pipeline::normalize::clean;
use ratingset_types::CanonicalName;

fn clean_names(names: &[String]) -> Vec<(&str, CanonicalName)> {
    names.iter().map(|n| (n.as_str(), clean(n))).collect()
}

/// Print the canonical key of each name.
pub(crate) fn show_clean_names(names: &[String]) {
    println!("{:<40} {}", "Name", "Canonical");
    println!("{}", "─".repeat(60));
    for (raw, key) in clean_names(names) {
        if key.is_empty() {
            println!("{:<40} (empty)", raw);
        } else {
            println!("{:<40} {}", raw, key);
        }
    }
}
