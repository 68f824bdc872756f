//! Loading of the prior Monte Carlo sample.
//!
//! The sample file is a CSV table with one row per prior draw. Its header
//! names every objective function and every parameter; columns are looked
//! up by name so their order in the file does not matter.
use std::path::Path;

use tracing::info;

use crate::error::{GlueError, Result};
use crate::matrix::Matrix;

/// Parameter and objective-function tables of a prior sample, row-aligned.
#[derive(Debug, Clone)]
pub struct Sample {
    pub parameters: Matrix,
    pub objectives: Matrix,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.parameters.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Read the prior sample at `path`, extracting `parameter_names` and
/// `metric_names` columns in the given order.
pub fn load_sample(
    path: &Path,
    parameter_names: &[&str],
    metric_names: &[String],
) -> Result<Sample> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let locate = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| GlueError::format(path, format!("missing column \"{}\"", name)))
    };
    let param_cols = parameter_names
        .iter()
        .map(|n| locate(n))
        .collect::<Result<Vec<_>>>()?;
    let metric_cols = metric_names
        .iter()
        .map(|n| locate(n))
        .collect::<Result<Vec<_>>>()?;

    let mut params = Vec::new();
    let mut objectives = Vec::new();
    let mut rows = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let cell = |col: usize| -> Result<f64> {
            let raw = record.get(col).unwrap_or("");
            raw.parse::<f64>().map_err(|_| {
                GlueError::format(
                    path,
                    format!(
                        "line {}: column \"{}\" holds non-numeric value \"{}\"",
                        line, &headers[col], raw
                    ),
                )
            })
        };
        for &col in &param_cols {
            params.push(cell(col)?);
        }
        for &col in &metric_cols {
            objectives.push(cell(col)?);
        }
        rows += 1;
    }

    let sample = Sample {
        parameters: Matrix::from_vec(rows, param_cols.len(), params)
            .map_err(|e| GlueError::format(path, e))?,
        objectives: Matrix::from_vec(rows, metric_cols.len(), objectives)
            .map_err(|e| GlueError::format(path, e))?,
    };
    info!(path = %path.display(), draws = sample.len(), "loaded prior sample");
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn columns_found_by_name_in_any_order() {
        let file = write_file("b,NSE,a,PBias\n2.0,0.8,1.0,-3.5\n4.0,0.1,3.0,12.0\n");
        let sample = load_sample(file.path(), &["a", "b"], &names(&["NSE", "PBias"])).unwrap();
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.parameters.row(0), &[1.0, 2.0]);
        assert_eq!(sample.parameters.row(1), &[3.0, 4.0]);
        assert_eq!(sample.objectives.row(0), &[0.8, -3.5]);
        assert_eq!(sample.objectives.row(1), &[0.1, 12.0]);
    }

    #[test]
    fn whitespace_and_nan_cells_are_accepted() {
        let file = write_file("a, NSE\n 1.5 , NaN\n");
        let sample = load_sample(file.path(), &["a"], &names(&["NSE"])).unwrap();
        assert_eq!(sample.parameters.get(0, 0), 1.5);
        assert!(sample.objectives.get(0, 0).is_nan());
    }

    #[test]
    fn missing_column_is_format_error() {
        let file = write_file("a,NSE\n1.0,0.5\n");
        let err = load_sample(file.path(), &["a", "b"], &names(&["NSE"])).unwrap_err();
        match err {
            GlueError::Format { message, .. } => assert!(message.contains("\"b\"")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_format_error() {
        let file = write_file("a,NSE\n1.0,0.5\n2.0,abc\n");
        let err = load_sample(file.path(), &["a"], &names(&["NSE"])).unwrap_err();
        match err {
            GlueError::Format { message, .. } => {
                assert!(message.contains("line 3"));
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn header_only_file_gives_empty_sample() {
        let file = write_file("a,NSE\n");
        let sample = load_sample(file.path(), &["a"], &names(&["NSE"])).unwrap();
        assert!(sample.is_empty());
        assert_eq!(sample.objectives.cols(), 1);
    }
}
