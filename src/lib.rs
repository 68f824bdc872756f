//! smartglue: GLUE behavioural replay for the SMART rainfall-runoff model.
//!
//! The heavy lifting lives in [`smartglue_core`]; this crate wires one
//! catchment's input files to a calibration run.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub use smartglue_core::{CalibrationHarness, ExecutionMode, GlueError, RunSummary, SimulationModel};

use smartglue_core::behavioural::select_by_name;
use smartglue_core::metrics::objective_names;
use smartglue_core::parameters::PARAMETER_NAMES;
use smartglue_core::sample::load_sample;
use smartglue_core::sampler;
use smartglue_core::settings::Settings;
use smartglue_core::smart::SmartModel;

/// Input and output locations of one catchment below a project root.
#[derive(Debug, Clone)]
pub struct CatchmentPaths {
    pub catchment: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl CatchmentPaths {
    /// `<root>/in/<catchment>/` and `<root>/out/<catchment>/`.
    pub fn new(root: &Path, catchment: &str) -> Self {
        Self {
            catchment: catchment.to_string(),
            input_dir: root.join("in").join(catchment),
            output_dir: root.join("out").join(catchment),
        }
    }

    pub fn settings(&self) -> PathBuf {
        self.input_dir.join(format!("{}.sttngs", self.catchment))
    }

    /// Prior Monte Carlo sample.
    pub fn sample(&self) -> PathBuf {
        self.input_dir.join(format!("{}.SMART.lhs", self.catchment))
    }

    pub fn results(&self) -> PathBuf {
        self.output_dir.join(format!("{}.SMART.glue", self.catchment))
    }
}

/// Options of one GLUE run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub mode: ExecutionMode,
    /// Leave the simulated series out of the result file even when the
    /// settings ask for it.
    pub no_series: bool,
}

/// Select the behavioural set of `paths.catchment` and replay it through SMART.
pub fn run_catchment(paths: &CatchmentPaths, options: &RunOptions) -> Result<RunSummary> {
    let settings_path = paths.settings();
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("loading settings for catchment {}", paths.catchment))?;
    let groundwater = settings.groundwater_enabled();
    let metric_names = objective_names(groundwater);

    let sample_path = paths.sample();
    let sample = load_sample(&sample_path, &PARAMETER_NAMES, &metric_names)
        .with_context(|| format!("loading prior sample {}", sample_path.display()))?;
    let criteria = settings.criteria()?;
    let behavioural = select_by_name(
        &sample.parameters,
        &sample.objectives,
        &metric_names,
        &criteria,
    )?;
    info!(
        catchment = %paths.catchment,
        sampled = sample.len(),
        behavioural = behavioural.rows(),
        "behavioural set selected"
    );

    let model = SmartModel::load(&settings, &paths.input_dir, &paths.catchment)
        .with_context(|| format!("loading forcing for catchment {}", paths.catchment))?;

    std::fs::create_dir_all(&paths.output_dir)
        .with_context(|| format!("creating {}", paths.output_dir.display()))?;
    let save_series = settings.save_series && !options.no_series;
    let harness = CalibrationHarness::new(
        model,
        &settings,
        &behavioural,
        &metric_names,
        save_series,
        &paths.results(),
    )?;

    let summary = sampler::run(harness, options.mode)
        .with_context(|| format!("GLUE run for catchment {}", paths.catchment))?;
    Ok(summary)
}
