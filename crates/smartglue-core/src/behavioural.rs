//! Behavioural-set selection.
//!
//! A sampled parameter row is behavioural when every configured threshold
//! condition holds on its objective-function row (logical AND across the
//! metric columns).
use serde::Deserialize;
use tracing::debug;

use crate::error::{GlueError, Result};
use crate::matrix::Matrix;

/// Threshold rule applied to one objective-function column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// value == threshold
    Equal(f64),
    /// value >= threshold
    Min(f64),
    /// value <= threshold
    Max(f64),
    /// low <= value <= high
    Inside(f64, f64),
    /// value <= low AND value >= high
    Outside(f64, f64),
}

impl Condition {
    /// Build a condition from its kind name and threshold values.
    ///
    /// `equal`, `min` and `max` take one value; `inside` and `outside` take
    /// two, with the second strictly greater than the first.
    pub fn parse(kind: &str, values: &[f64]) -> Result<Self> {
        let single = |make: fn(f64) -> Condition| match values {
            [v] => Ok(make(*v)),
            _ => Err(GlueError::Config(format!(
                "\"{}\" condition takes exactly one value, got {}",
                kind,
                values.len()
            ))),
        };
        let pair = |make: fn(f64, f64) -> Condition| match values {
            [low, high] if high > low => Ok(make(*low, *high)),
            [low, high] => Err(GlueError::Config(format!(
                "\"{}\" condition bounds are inconsistent: {} is not greater than {}",
                kind, high, low
            ))),
            _ => Err(GlueError::Config(format!(
                "\"{}\" condition takes exactly two values, got {}",
                kind,
                values.len()
            ))),
        };
        match kind {
            "equal" => single(Condition::Equal),
            "min" => single(Condition::Min),
            "max" => single(Condition::Max),
            "inside" => pair(Condition::Inside),
            "outside" => pair(Condition::Outside),
            other => Err(GlueError::Config(format!(
                "unknown threshold type \"{}\"",
                other
            ))),
        }
    }

    /// Whether `value` satisfies the condition. NaN never does.
    pub fn accepts(&self, value: f64) -> bool {
        match *self {
            Condition::Equal(t) => value == t,
            Condition::Min(t) => value >= t,
            Condition::Max(t) => value <= t,
            Condition::Inside(low, high) => value >= low && value <= high,
            // Two-sided AND: with high > low no value satisfies it.
            Condition::Outside(low, high) => value <= low && value >= high,
        }
    }
}

/// A condition bound to a named objective-function column.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub metric: String,
    pub condition: Condition,
}

/// Criterion as written in the settings file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CriterionSpec {
    pub metric: String,
    pub kind: String,
    pub values: Vec<f64>,
}

impl CriterionSpec {
    pub fn build(&self) -> Result<Criterion> {
        Ok(Criterion {
            metric: self.metric.clone(),
            condition: Condition::parse(&self.kind, &self.values)?,
        })
    }
}

/// Default acceptance thresholds: NSE >= 0.75, PBias within +/-10 %, and
/// the groundwater constraint met when it is enabled.
pub fn default_criteria(groundwater: bool) -> Vec<Criterion> {
    let mut criteria = vec![
        Criterion {
            metric: "NSE".to_string(),
            condition: Condition::Min(0.75),
        },
        Criterion {
            metric: "PBias".to_string(),
            condition: Condition::Inside(-10.0, 10.0),
        },
    ];
    if groundwater {
        criteria.push(Criterion {
            metric: crate::metrics::GROUNDWATER_NAME.to_string(),
            condition: Condition::Equal(1.0),
        });
    }
    criteria
}

/// Keep the parameter rows whose objective rows satisfy every condition.
///
/// `conditions[c]` applies to column `c` of `objectives`. Row order is preserved.
pub fn select(params: &Matrix, objectives: &Matrix, conditions: &[Condition]) -> Result<Matrix> {
    if params.rows() != objectives.rows() {
        return Err(GlueError::Dimension(format!(
            "parameter matrix has {} rows but objective matrix has {}",
            params.rows(),
            objectives.rows()
        )));
    }
    if conditions.len() != objectives.cols() {
        return Err(GlueError::Dimension(format!(
            "{} conditions given for {} objective columns",
            conditions.len(),
            objectives.cols()
        )));
    }

    let mut mask = vec![true; objectives.rows()];
    for (col, condition) in conditions.iter().enumerate() {
        for (keep, value) in mask.iter_mut().zip(objectives.column(col)) {
            *keep &= condition.accepts(value);
        }
    }

    let selected = params.filter_rows(&mask);
    debug!(
        sampled = params.rows(),
        behavioural = selected.rows(),
        "behavioural selection"
    );
    Ok(selected)
}

/// Select with criteria addressed by metric name.
///
/// `metric_names` labels the columns of `objectives`; the named columns are
/// projected out in criterion order before [`select`] runs.
pub fn select_by_name(
    params: &Matrix,
    objectives: &Matrix,
    metric_names: &[String],
    criteria: &[Criterion],
) -> Result<Matrix> {
    if metric_names.len() != objectives.cols() {
        return Err(GlueError::Dimension(format!(
            "{} metric names given for {} objective columns",
            metric_names.len(),
            objectives.cols()
        )));
    }
    let mut columns = Vec::with_capacity(criteria.len());
    for criterion in criteria {
        let col = metric_names
            .iter()
            .position(|n| *n == criterion.metric)
            .ok_or_else(|| {
                GlueError::Config(format!(
                    "no objective function named \"{}\"",
                    criterion.metric
                ))
            })?;
        columns.push(col);
    }
    let conditions: Vec<Condition> = criteria.iter().map(|c| c.condition).collect();
    select(params, &objectives.select_columns(&columns), &conditions)
}
