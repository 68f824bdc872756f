//! Replay of the behavioural set through a simulation model.
//!
//! One draw is: take the next behavioural parameter vector, run the model,
//! line the simulated flow up with the observations, score it and hand the
//! record to the result writer. [`CalibrationHarness`] exposes each step on
//! its own and [`CalibrationHarness::run_draw`] chains them.
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::{GlueError, Result};
use crate::matrix::Matrix;
use crate::metrics::{groundwater_constraint, objective_names, score_all, ObjectiveVector};
use crate::parameters::{ParameterSupply, ParameterVector, PARAMETER_NAMES};
use crate::series::{align_to, format_datetime, mask_unobserved};
use crate::settings::Settings;
use crate::traits::SimulationModel;
use crate::writer::{RecordSink, ResultRecord, ResultWriter};

/// Simulated flow at the observation timestamps, plus the model diagnostic.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub flow: Vec<f64>,
    pub diagnostic: f64,
}

/// Observed flow (NaN where missing) and the reference diagnostic.
///
/// `observed[i]` belongs to `timestamps[i]`, and so does
/// `SimulationResult::flow[i]`.
#[derive(Debug, Clone)]
pub struct EvaluationData {
    pub timestamps: Vec<NaiveDateTime>,
    pub observed: Vec<f64>,
    pub reference: f64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Records written to the result file.
    pub records: usize,
    pub path: PathBuf,
}

pub struct CalibrationHarness<M: SimulationModel> {
    model: M,
    supply: ParameterSupply,
    evaluation: EvaluationData,
    groundwater: bool,
    save_series: bool,
    path: PathBuf,
    sink: RecordSink,
}

impl<M: SimulationModel> CalibrationHarness<M> {
    /// Set up a run over the rows of `behavioural`.
    ///
    /// `metric_names` labels the objective columns of the result file and
    /// must match the metric count implied by the groundwater setting. The
    /// result file at `output_path` is created (or truncated) and its header
    /// written before this returns.
    pub fn new(
        model: M,
        settings: &Settings,
        behavioural: &Matrix,
        metric_names: &[String],
        save_series: bool,
        output_path: &Path,
    ) -> Result<Self> {
        let groundwater = settings.groundwater_enabled();
        let expected = objective_names(groundwater).len();
        if metric_names.len() != expected {
            return Err(GlueError::Dimension(format!(
                "{} metric names given, the objective suite computes {}",
                metric_names.len(),
                expected
            )));
        }
        let supply = ParameterSupply::replay(behavioural)?;

        let evaluation = EvaluationData {
            timestamps: model.observed().keys().copied().collect(),
            observed: model.observed().values().copied().collect(),
            reference: settings.gw_constraint,
        };

        let labels: Vec<String> = if save_series {
            evaluation.timestamps.iter().map(format_datetime).collect()
        } else {
            Vec::new()
        };
        let mut writer = ResultWriter::open(output_path)?;
        writer.write_header(metric_names, &PARAMETER_NAMES, &labels)?;

        info!(
            draws = supply.len(),
            observations = evaluation.observed.len(),
            groundwater,
            save_series,
            path = %output_path.display(),
            "calibration harness ready"
        );

        Ok(Self {
            model,
            supply,
            evaluation,
            groundwater,
            save_series,
            path: output_path.to_path_buf(),
            sink: RecordSink::spawn(writer)?,
        })
    }

    /// Number of behavioural vectors to replay.
    pub fn draws(&self) -> usize {
        self.supply.len()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn next_parameters(&self) -> Option<(usize, ParameterVector)> {
        self.supply.next()
    }

    /// Run the model and keep the simulated values at the observation
    /// timestamps, in observation order.
    pub fn simulate(&self, draw: usize, params: &ParameterVector) -> Result<SimulationResult> {
        let output = self
            .model
            .simulate(params)
            .map_err(|message| GlueError::Simulation { draw, message })?;
        let flow = align_to(&output.flow, self.model.observed()).map_err(|missing| {
            GlueError::Simulation {
                draw,
                message: format!(
                    "simulated series has no value at {}",
                    format_datetime(&missing)
                ),
            }
        })?;
        Ok(SimulationResult {
            flow,
            diagnostic: output.diagnostic,
        })
    }

    pub fn evaluation(&self) -> &EvaluationData {
        &self.evaluation
    }

    /// Objective functions of one simulation.
    ///
    /// Positions without an observation are left out of every metric.
    pub fn score(&self, simulation: &SimulationResult, evaluation: &EvaluationData) -> ObjectiveVector {
        let (observed, simulated) = mask_unobserved(&evaluation.observed, &simulation.flow);
        let mut objectives = score_all(&observed, &simulated);
        if self.groundwater {
            objectives.push(groundwater_constraint(
                evaluation.reference,
                simulation.diagnostic,
            ));
        }
        objectives
    }

    pub fn persist(
        &self,
        index: usize,
        objectives: &ObjectiveVector,
        params: &ParameterVector,
        simulation: &SimulationResult,
    ) -> Result<()> {
        let mut values = Vec::with_capacity(
            objectives.len() + params.values().len() + simulation.flow.len(),
        );
        values.extend_from_slice(objectives);
        values.extend_from_slice(params.values());
        if self.save_series {
            values.extend_from_slice(&simulation.flow);
        }
        self.sink.send(ResultRecord { index, values })
    }

    /// Replay one behavioural vector. Returns the draw index, or `None`
    /// once every vector has been handed out.
    pub fn run_draw(&self) -> Result<Option<usize>> {
        let Some((index, params)) = self.next_parameters() else {
            return Ok(None);
        };
        let simulation = self.simulate(index, &params)?;
        let objectives = self.score(&simulation, self.evaluation());
        debug!(draw = index, nse = objectives[0], "draw scored");
        self.persist(index, &objectives, &params, &simulation)?;
        Ok(Some(index))
    }

    /// Close the result file and wait for every record to be written.
    pub fn finish(self) -> Result<RunSummary> {
        let records = self.sink.close()?;
        Ok(RunSummary {
            records,
            path: self.path,
        })
    }
}
