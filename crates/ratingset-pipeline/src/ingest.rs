//! CSV ingestion for the ratings history and the stock registry.
//!
//! Both files are read with every column as text. Empty cells become empty
//! strings; dates stay unparsed until the alignment stage.

use polars::prelude::*;
use ratingset_types::{DatasetError, RatingRecord, RatingsTable, Result, StockRecord};
use std::path::Path;

/// Company name column, present in both inputs.
pub const NAME_COLUMN: &str = "Name";

/// Rating agency column of the ratings history.
pub const AGENCY_COLUMN: &str = "Rating Agency Name";

/// Letter grade column of the ratings history.
pub const RATING_COLUMN: &str = "Rating";

/// Rating date column of the ratings history.
pub const DATE_COLUMN: &str = "date";

/// Ticker column of the stock registry.
pub const SYMBOL_COLUMN: &str = "Symbol";

const RATING_COLUMNS: [&str; 4] = [NAME_COLUMN, AGENCY_COLUMN, RATING_COLUMN, DATE_COLUMN];

/// Read a CSV file into a DataFrame of text columns.
///
/// # Errors
///
/// Returns [`DatasetError::MissingInput`] if the file does not exist, or a
/// Polars error if it cannot be parsed as CSV.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(DatasetError::MissingInput(path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    tracing::debug!(path = %path.display(), rows = df.height(), "read table");
    Ok(df)
}

/// Extract a column as owned strings, mapping nulls to "".
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| DatasetError::MissingColumn(name.to_string()))?
        .cast(&DataType::String)?;

    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v: Option<&str>| v.unwrap_or_default().to_string())
        .collect();

    Ok(values)
}

/// Build a [`RatingsTable`] from a DataFrame.
///
/// # Errors
///
/// Returns [`DatasetError::MissingColumn`] if any of `Name`,
/// `Rating Agency Name`, `Rating` or `date` is absent.
pub fn ratings_from_frame(df: &DataFrame) -> Result<RatingsTable> {
    let names = text_column(df, NAME_COLUMN)?;
    let agencies = text_column(df, AGENCY_COLUMN)?;
    let ratings = text_column(df, RATING_COLUMN)?;
    let dates = text_column(df, DATE_COLUMN)?;

    let extra_columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|s| !RATING_COLUMNS.contains(&s.as_str()))
        .collect();

    let extra_values = extra_columns
        .iter()
        .map(|c| text_column(df, c))
        .collect::<Result<Vec<_>>>()?;

    let records = names
        .into_iter()
        .zip(agencies)
        .zip(ratings)
        .zip(dates)
        .enumerate()
        .map(|(i, (((name, agency), rating), date))| RatingRecord {
            name,
            agency,
            rating,
            date,
            extra: extra_values.iter().map(|col| col[i].clone()).collect(),
        })
        .collect();

    Ok(RatingsTable {
        extra_columns,
        records,
    })
}

/// Build the stock registry from a DataFrame. Columns other than `Name` and
/// `Symbol` are ignored.
///
/// # Errors
///
/// Returns [`DatasetError::MissingColumn`] if `Name` or `Symbol` is absent.
pub fn stocks_from_frame(df: &DataFrame) -> Result<Vec<StockRecord>> {
    let names = text_column(df, NAME_COLUMN)?;
    let symbols = text_column(df, SYMBOL_COLUMN)?;

    Ok(names
        .into_iter()
        .zip(symbols)
        .map(|(name, symbol)| StockRecord { name, symbol })
        .collect())
}

/// Load the ratings history CSV.
///
/// # Errors
///
/// See [`read_table`] and [`ratings_from_frame`].
pub fn load_ratings(path: &Path) -> Result<RatingsTable> {
    ratings_from_frame(&read_table(path)?)
}

/// Load the stock registry CSV.
///
/// # Errors
///
/// See [`read_table`] and [`stocks_from_frame`].
pub fn load_stocks(path: &Path) -> Result<Vec<StockRecord>> {
    stocks_from_frame(&read_table(path)?)
}
