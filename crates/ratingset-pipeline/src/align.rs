//! Fiscal-year alignment of ratings and ratio records.
//!
//! A rating issued before July is taken to reflect the previous fiscal year;
//! from July on it reflects the current one. A ratio record belongs to the
//! calendar year of its report date. Rows are joined on (ticker, year).

use chrono::{Datelike, NaiveDate};
use ratingset_types::{
    DatasetError, FinancialRatioRecord, JoinedObservation, MatchedRating, Result,
};
use std::collections::HashMap;

/// First month whose ratings use the current year's ratios.
pub const FISCAL_CUTOFF_MONTH: u32 = 7;

/// Rating date formats, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Effective fiscal year of a rating issued on `date`.
#[must_use]
pub fn effective_fiscal_year(date: NaiveDate) -> i32 {
    date.year() - i32::from(date.month() < FISCAL_CUTOFF_MONTH)
}

/// Parse a rating date as written in the ratings history.
///
/// Accepts `YYYY-MM-DD` (optionally followed by a time part), `MM/DD/YYYY`
/// and `YYYY/MM/DD`.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidDate`] if no format matches.
pub fn parse_rating_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let candidates = [trimmed, trimmed.get(..10).unwrap_or(trimmed)];

    candidates
        .iter()
        .flat_map(|c| DATE_FORMATS.iter().map(move |f| (*c, *f)))
        .find_map(|(c, f)| NaiveDate::parse_from_str(c, f).ok())
        .ok_or_else(|| DatasetError::InvalidDate(raw.to_string()))
}

/// Join each matched rating with the ratio records of its effective year.
///
/// Output follows rating order, then fetch order. A rating with no record
/// for its (ticker, year) is dropped; several records for the same key each
/// produce a row.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidDate`] if a rating date cannot be parsed.
pub fn align(
    rows: Vec<MatchedRating>,
    ratios: &[FinancialRatioRecord],
) -> Result<Vec<JoinedObservation>> {
    let mut by_key: HashMap<(&str, i32), Vec<&FinancialRatioRecord>> = HashMap::new();
    for record in ratios {
        by_key
            .entry((record.symbol.as_str(), record.fiscal_year()))
            .or_default()
            .push(record);
    }

    let mut joined = Vec::new();
    for matched in rows {
        let rating_date = parse_rating_date(&matched.rating.date)?;
        let year = effective_fiscal_year(rating_date);

        let Some(records) = by_key.get(&(matched.symbol.as_str(), year)) else {
            continue;
        };

        for record in records {
            joined.push(JoinedObservation {
                matched: matched.clone(),
                rating_date,
                year,
                ratios: (*record).clone(),
            });
        }
    }

    tracing::info!(rows = joined.len(), "aligned ratings with fiscal-year ratios");
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratingset_types::{CanonicalName, RatingRecord, RatioValue};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn matched(symbol: &str, rating_date: &str) -> MatchedRating {
        MatchedRating {
            rating: RatingRecord {
                name: "Acme Corp.".to_string(),
                agency: "Standard & Poor's Ratings Services".to_string(),
                rating: "AA".to_string(),
                date: rating_date.to_string(),
                extra: Vec::new(),
            },
            canonical: CanonicalName::new("Acme Corp."),
            symbol: symbol.to_string(),
        }
    }

    fn ratios(symbol: &str, report: NaiveDate, current: f64) -> FinancialRatioRecord {
        FinancialRatioRecord {
            symbol: symbol.to_string(),
            date: report,
            fields: vec![("currentRatio".to_string(), RatioValue::Number(current))],
        }
    }

    #[rstest]
    #[case(date(2015, 3, 10), 2014)]
    #[case(date(2015, 8, 20), 2015)]
    #[case(date(2015, 1, 1), 2014)]
    #[case(date(2015, 12, 31), 2015)]
    #[case(date(2015, 6, 30), 2014)]
    #[case(date(2015, 7, 1), 2015)]
    #[case(date(2000, 1, 1), 1999)]
    fn test_effective_fiscal_year(#[case] rating_date: NaiveDate, #[case] expected: i32) {
        assert_eq!(effective_fiscal_year(rating_date), expected);
    }

    #[rstest]
    #[case("2020-05-01", date(2020, 5, 1))]
    #[case(" 2020-05-01 ", date(2020, 5, 1))]
    #[case("2020-05-01 00:00:00", date(2020, 5, 1))]
    #[case("2020-05-01T13:45:00Z", date(2020, 5, 1))]
    #[case("05/01/2020", date(2020, 5, 1))]
    #[case("2020/05/01", date(2020, 5, 1))]
    fn test_parse_rating_date(#[case] raw: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_rating_date(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_rating_date_invalid() {
        assert!(matches!(
            parse_rating_date("yesterday"),
            Err(DatasetError::InvalidDate(_))
        ));
        assert!(parse_rating_date("").is_err());
    }

    #[test]
    fn test_align_picks_effective_year() {
        let records = [
            ratios("ACME", date(2020, 12, 31), 1.0),
            ratios("ACME", date(2019, 12, 31), 2.0),
            ratios("OTHER", date(2019, 12, 31), 3.0),
        ];

        let joined = align(vec![matched("ACME", "2020-05-01")], &records).unwrap();

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].year, 2019);
        assert_eq!(joined[0].rating_date, date(2020, 5, 1));
        assert_eq!(joined[0].ratios.date, date(2019, 12, 31));
        assert_eq!(joined[0].ratios.symbol, "ACME");
    }

    #[test]
    fn test_align_drops_ratings_without_ratios() {
        let records = [ratios("ACME", date(2010, 12, 31), 1.0)];
        let joined = align(
            vec![matched("ACME", "2020-09-01"), matched("NONE", "2011-02-01")],
            &records,
        )
        .unwrap();
        assert!(joined.is_empty());
    }

    #[test]
    fn test_align_fans_out_on_repeated_year() {
        let records = [
            ratios("ACME", date(2019, 3, 31), 1.0),
            ratios("ACME", date(2019, 12, 31), 2.0),
        ];
        let joined = align(vec![matched("ACME", "2019-10-15")], &records).unwrap();

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].ratios.date, date(2019, 3, 31));
        assert_eq!(joined[1].ratios.date, date(2019, 12, 31));
    }

    #[test]
    fn test_align_bad_date_is_fatal() {
        let err = align(vec![matched("ACME", "not a date")], &[]).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidDate(_)));
    }
}
