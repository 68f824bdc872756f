//! Parameter vectors and the supply that hands them out draw by draw.
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{GlueError, Result};
use crate::matrix::Matrix;

/// SMART parameter names in canonical order.
pub const PARAMETER_NAMES: [&str; N_PARAMETERS] =
    ["T", "C", "H", "D", "S", "Z", "SK", "FK", "GK", "RK"];

/// Number of model parameters.
pub const N_PARAMETERS: usize = 10;

/// One value for each of the ten model parameters, in [`PARAMETER_NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterVector {
    values: [f64; N_PARAMETERS],
}

impl ParameterVector {
    /// Build from a slice holding exactly ten values in canonical order.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let values: [f64; N_PARAMETERS] = values.try_into().map_err(|_| {
            GlueError::Dimension(format!(
                "expected {} parameter values, got {}",
                N_PARAMETERS,
                values.len()
            ))
        })?;
        Ok(Self { values })
    }

    /// Build from `(name, value)` pairs; every name must appear exactly once.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Result<Self> {
        let mut values = [f64::NAN; N_PARAMETERS];
        let mut seen = [false; N_PARAMETERS];
        for (name, value) in pairs {
            let idx = index_of(name)
                .ok_or_else(|| GlueError::Config(format!("unknown parameter \"{}\"", name)))?;
            if seen[idx] {
                return Err(GlueError::Config(format!(
                    "parameter \"{}\" given twice",
                    name
                )));
            }
            seen[idx] = true;
            values[idx] = value;
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(GlueError::Config(format!(
                "parameter \"{}\" is missing",
                PARAMETER_NAMES[missing]
            )));
        }
        Ok(Self { values })
    }

    /// Value of the named parameter.
    pub fn get(&self, name: &str) -> Option<f64> {
        index_of(name).map(|i| self.values[i])
    }

    pub fn values(&self) -> &[f64; N_PARAMETERS] {
        &self.values
    }

    /// `(name, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        PARAMETER_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

fn index_of(name: &str) -> Option<usize> {
    PARAMETER_NAMES.iter().position(|n| *n == name)
}

/// How the values of one parameter are generated.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSpec {
    /// Replay a fixed list: draw `i` takes `values[i]`.
    Replay { values: Vec<f64> },
    /// Independent uniform draw in `[low, high)`.
    Uniform { low: f64, high: f64 },
}

/// Hands out parameter vectors through an index cursor.
///
/// Draw `i` combines entry `i` of every dimension in lockstep. The cursor is
/// atomic, so concurrent callers never receive the same index. Once `len()`
/// draws have been handed out `next()` returns `None`: the supply stops at
/// the end and never wraps around.
#[derive(Debug)]
pub struct ParameterSupply {
    specs: Vec<ParameterSpec>,
    draws: usize,
    seed: u64,
    cursor: AtomicUsize,
}

impl ParameterSupply {
    /// Build a supply of `draws` vectors from one spec per parameter.
    pub fn new(specs: Vec<ParameterSpec>, draws: usize, seed: u64) -> Result<Self> {
        if specs.len() != N_PARAMETERS {
            return Err(GlueError::Dimension(format!(
                "expected {} parameter specifications, got {}",
                N_PARAMETERS,
                specs.len()
            )));
        }
        for (name, spec) in PARAMETER_NAMES.iter().zip(&specs) {
            match spec {
                ParameterSpec::Replay { values } if values.len() != draws => {
                    return Err(GlueError::Dimension(format!(
                        "replay list for {} holds {} values for {} draws",
                        name,
                        values.len(),
                        draws
                    )));
                }
                ParameterSpec::Uniform { low, high } if !(low < high) => {
                    return Err(GlueError::Config(format!(
                        "{} = [{}, {}] is not a valid uniform range",
                        name, low, high
                    )));
                }
                _ => {}
            }
        }
        Ok(Self {
            specs,
            draws,
            seed,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Replay every row of `behavioural` exactly once, in row order.
    pub fn replay(behavioural: &Matrix) -> Result<Self> {
        if behavioural.cols() != N_PARAMETERS {
            return Err(GlueError::Dimension(format!(
                "behavioural set has {} columns, expected {}",
                behavioural.cols(),
                N_PARAMETERS
            )));
        }
        let specs = (0..N_PARAMETERS)
            .map(|c| ParameterSpec::Replay {
                values: behavioural.column(c).collect(),
            })
            .collect();
        Self::new(specs, behavioural.rows(), 0)
    }

    /// Uniform random draws within `bounds`, reproducible from `seed`.
    pub fn uniform(bounds: &[(f64, f64)], draws: usize, seed: u64) -> Result<Self> {
        let specs = bounds
            .iter()
            .map(|&(low, high)| ParameterSpec::Uniform { low, high })
            .collect();
        Self::new(specs, draws, seed)
    }

    /// Total number of draws in one pass.
    pub fn len(&self) -> usize {
        self.draws
    }

    pub fn is_empty(&self) -> bool {
        self.draws == 0
    }

    /// Draws not yet handed out by [`next`](Self::next).
    pub fn remaining(&self) -> usize {
        self.draws.saturating_sub(self.cursor.load(Ordering::Acquire))
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    /// Advance the cursor and return the draw index with its vector.
    pub fn next(&self) -> Option<(usize, ParameterVector)> {
        let index = self.cursor.fetch_add(1, Ordering::AcqRel);
        self.draw(index).map(|v| (index, v))
    }

    /// Vector of draw `index` without touching the cursor.
    pub fn draw(&self, index: usize) -> Option<ParameterVector> {
        if index >= self.draws {
            return None;
        }
        // seeded on the first uniform spec
        let mut rng: Option<StdRng> = None;
        let mut values = [0.0; N_PARAMETERS];
        for (value, spec) in values.iter_mut().zip(&self.specs) {
            *value = match spec {
                ParameterSpec::Replay { values } => values[index],
                ParameterSpec::Uniform { low, high } => rng
                    .get_or_insert_with(|| self.draw_rng(index))
                    .gen_range(*low..*high),
            };
        }
        Some(ParameterVector { values })
    }

    fn draw_rng(&self, index: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}
