//! Timestamp-keyed series and the alignment rules used when scoring.
use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{GlueError, Result};

/// Timestamp format of series files and result-file headers.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A time series ordered by timestamp. NaN marks a missing value.
pub type TimeSeries = BTreeMap<NaiveDateTime, f64>;

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), DATETIME_FORMAT).ok()
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Read a two-column `DateTime,value` CSV file.
///
/// Empty or `nan` value cells are read as NaN (missing observation). A
/// timestamp may appear only once.
pub fn read_series(path: &Path) -> Result<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut series = TimeSeries::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let (Some(raw_dt), Some(raw_value)) = (record.get(0), record.get(1)) else {
            return Err(GlueError::format(
                path,
                format!("line {}: expected two columns", line),
            ));
        };
        let dt = parse_datetime(raw_dt).ok_or_else(|| {
            GlueError::format(path, format!("line {}: invalid timestamp \"{}\"", line, raw_dt))
        })?;
        let value = if raw_value.is_empty() {
            f64::NAN
        } else {
            raw_value.parse::<f64>().map_err(|_| {
                GlueError::format(
                    path,
                    format!("line {}: non-numeric value \"{}\"", line, raw_value),
                )
            })?
        };
        if series.insert(dt, value).is_some() {
            return Err(GlueError::format(
                path,
                format!("line {}: duplicate timestamp \"{}\"", line, raw_dt),
            ));
        }
    }
    Ok(series)
}

/// Values of `series` at the timestamps of `reference`, in reference order.
///
/// Returns the first reference timestamp that `series` lacks as the error.
pub fn align_to(series: &TimeSeries, reference: &TimeSeries) -> std::result::Result<Vec<f64>, NaiveDateTime> {
    reference
        .keys()
        .map(|dt| series.get(dt).copied().ok_or(*dt))
        .collect()
}

/// Drop every position where `observed` is NaN from both sequences.
///
/// The two outputs stay index-aligned.
pub fn mask_unobserved(observed: &[f64], simulated: &[f64]) -> (Vec<f64>, Vec<f64>) {
    observed
        .iter()
        .zip(simulated)
        .filter(|(o, _)| !o.is_nan())
        .map(|(o, s)| (*o, *s))
        .unzip()
}
