//! Data types for FMP API responses.

use crate::{FmpError, Result};
use chrono::NaiveDate;
use ratingset_types::{FinancialRatioRecord, RatioValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of the `ratios` response array, as sent by FMP.
///
/// Only `symbol` and `date` are interpreted. Every other field is kept
/// verbatim in `fields`, in response order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRatios {
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Report date (YYYY-MM-DD).
    #[serde(default)]
    pub date: Option<String>,
    /// Remaining ratio fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawRatios {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok())
    }

    /// Convert into a [`FinancialRatioRecord`].
    ///
    /// `requested` is used when the payload does not name its symbol.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::MalformedRecord`] if the report date is missing or
    /// unparseable.
    pub fn into_record(self, requested: &str) -> Result<FinancialRatioRecord> {
        let date = self.parsed_date().ok_or_else(|| {
            FmpError::MalformedRecord(format!(
                "{requested}: unusable report date {:?}",
                self.date
            ))
        })?;

        let fields = self
            .fields
            .into_iter()
            .map(|(name, value)| (name, ratio_value(value)))
            .collect();

        Ok(FinancialRatioRecord {
            symbol: self.symbol.unwrap_or_else(|| requested.to_string()),
            date,
            fields,
        })
    }
}

fn ratio_value(value: Value) -> RatioValue {
    match value {
        Value::Null => RatioValue::Null,
        Value::Number(n) => n.as_f64().map_or(RatioValue::Null, RatioValue::Number),
        Value::String(s) => RatioValue::Text(s),
        other => RatioValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_keep_response_order() {
        let raw: RawRatios = serde_json::from_value(json!({
            "symbol": "ACME",
            "date": "2019-12-31",
            "period": "FY",
            "currentRatio": 1.25,
            "quickRatio": 0.9,
            "payoutRatio": null
        }))
        .unwrap();

        let record = raw.into_record("ACME").unwrap();
        assert_eq!(record.symbol, "ACME");
        assert_eq!(record.fiscal_year(), 2019);

        let names: Vec<&str> = record.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["period", "currentRatio", "quickRatio", "payoutRatio"]);
        assert_eq!(record.fields[0].1, RatioValue::Text("FY".to_string()));
        assert_eq!(record.fields[1].1, RatioValue::Number(1.25));
        assert_eq!(record.fields[3].1, RatioValue::Null);
    }

    #[test]
    fn test_missing_symbol_uses_requested() {
        let raw: RawRatios =
            serde_json::from_value(json!({ "date": "2018-06-30", "currentRatio": 2 })).unwrap();
        let record = raw.into_record("XYZ").unwrap();
        assert_eq!(record.symbol, "XYZ");
        assert_eq!(record.fields[0].1, RatioValue::Number(2.0));
    }

    #[test]
    fn test_datetime_suffix_is_accepted() {
        let raw: RawRatios =
            serde_json::from_value(json!({ "date": "2018-06-30 00:00:00" })).unwrap();
        assert_eq!(raw.parsed_date(), NaiveDate::from_ymd_opt(2018, 6, 30));
    }

    #[test]
    fn test_missing_date_is_malformed() {
        let raw: RawRatios = serde_json::from_value(json!({ "symbol": "ACME" })).unwrap();
        let err = raw.into_record("ACME").unwrap_err();
        assert!(matches!(err, FmpError::MalformedRecord(_)));
    }
}
