//! Console output shared by the subcommands.

use ratingset_pipeline::filter::FilterReport;
use ratingset_pipeline::merge::MergeReport;
use std::collections::BTreeMap;
use std::fmt::Write;

const BOX_WIDTH: usize = 62;

/// Boxed section title.
pub(crate) fn print_header(title: &str) {
    println!("\n╔{}╗", "═".repeat(BOX_WIDTH));
    println!("║{:^width$}║", title, width = BOX_WIDTH);
    println!("╚{}╝\n", "═".repeat(BOX_WIDTH));
}

/// Rule-delimited subsection title.
pub(crate) fn print_section(title: &str) {
    println!("{}", "━".repeat(BOX_WIDTH));
    println!("{}", title);
    println!("{}\n", "━".repeat(BOX_WIDTH));
}

pub(crate) fn print_filter_report(report: &FilterReport) {
    println!("Ratings read:            {:>8}", report.input);
    println!("  known grade:           {:>8}", report.known_grade);
    println!("  distinct:              {:>8}", report.distinct);
    println!("  agency:                {:>8}", report.agency);
    println!();
}

pub(crate) fn print_merge_report(report: &MergeReport) {
    println!("Matched rows:            {:>8}", report.matched_rows);
    println!("Unmatched ratings:       {:>8}", report.unmatched_ratings);
    println!("Empty-key rows:          {:>8}", report.empty_key_rows);
    println!("Ambiguous keys:          {:>8}", report.ambiguous.len());
    for m in &report.ambiguous {
        println!("  {:<30} {}", m.key, m.symbols.join(", "));
    }
    println!();
}

/// Grade distribution as a two-column table with a share column.
pub(crate) fn grade_table(grades: &BTreeMap<String, usize>) -> String {
    let total: usize = grades.values().sum();
    let mut out = String::new();

    let _ = writeln!(out, "{:<8} {:>8} {:>8}", "Rating", "Count", "Share");
    let _ = writeln!(out, "{}", "─".repeat(26));
    for (grade, count) in grades {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        let _ = writeln!(out, "{:<8} {:>8} {:>7.1}%", grade, count, share);
    }
    let _ = writeln!(out, "{}", "─".repeat(26));
    let _ = writeln!(out, "{:<8} {:>8}", "Total", total);
    out
}
