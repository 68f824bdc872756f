//! Catchment simulation settings.
//!
//! Read from `<catchment>.sttngs`, a TOML document:
//!
//! ```toml
//! catchment_area = 2.5e8      # m2
//! gauged_area = 2.4e8         # m2
//! start = "2000-01-01 00:00:00"
//! end = "2004-12-31 00:00:00"
//! simulation_step = 60        # minutes
//! report_step = 1440          # minutes
//! warm_up = 365               # days
//! gw_constraint = -999.0      # -999.0 disables the groundwater constraint
//!
//! [[behavioural]]
//! metric = "NSE"
//! kind = "min"
//! values = [0.75]
//! ```
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::behavioural::{default_criteria, Criterion, CriterionSpec};
use crate::error::{GlueError, Result};
use crate::series::DATETIME_FORMAT;

/// Reference value meaning "groundwater constraint disabled".
pub const GW_DISABLED: f64 = -999.0;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Catchment area at the outlet [m2].
    pub catchment_area: f64,
    /// Area drained at the flow gauge [m2].
    pub gauged_area: f64,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub start: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub end: NaiveDateTime,
    /// Simulation time step [min].
    pub simulation_step: u32,
    /// Reporting time step [min], a multiple of the simulation step.
    pub report_step: u32,
    /// Warm-up period excluded from the outputs [days].
    pub warm_up: u32,
    /// Reference groundwater share of total flow, or [`GW_DISABLED`].
    pub gw_constraint: f64,
    /// Persist the full simulated series with every result record.
    #[serde(default = "default_save_series")]
    pub save_series: bool,
    /// Behavioural thresholds overriding the defaults.
    #[serde(default)]
    pub behavioural: Vec<CriterionSpec>,
}

fn default_save_series() -> bool {
    true
}

fn deserialize_datetime<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(serde::de::Error::custom)
}

impl Settings {
    /// Read and validate a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GlueError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|message| GlueError::Settings {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(text: &str) -> std::result::Result<Self, String> {
        let settings: Settings = toml::from_str(text).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !(self.catchment_area > 0.0) {
            return Err(format!("catchment_area = {} must be positive", self.catchment_area));
        }
        if !(self.gauged_area > 0.0) {
            return Err(format!("gauged_area = {} must be positive", self.gauged_area));
        }
        if self.end <= self.start {
            return Err(format!("end {} is not after start {}", self.end, self.start));
        }
        if self.simulation_step == 0 {
            return Err("simulation_step must be positive".to_string());
        }
        if self.report_step < self.simulation_step || self.report_step % self.simulation_step != 0 {
            return Err(format!(
                "report_step = {} is not a multiple of simulation_step = {}",
                self.report_step, self.simulation_step
            ));
        }
        if self.warm_up_end() >= self.end {
            return Err(format!(
                "warm-up of {} days covers the whole simulation period",
                self.warm_up
            ));
        }
        Ok(())
    }

    /// Whether the groundwater constraint takes part in scoring.
    pub fn groundwater_enabled(&self) -> bool {
        self.gw_constraint != GW_DISABLED
    }

    /// First timestamp kept in the outputs.
    pub fn warm_up_end(&self) -> NaiveDateTime {
        self.start + Duration::days(i64::from(self.warm_up))
    }

    pub fn simulation_delta(&self) -> Duration {
        Duration::minutes(i64::from(self.simulation_step))
    }

    pub fn report_delta(&self) -> Duration {
        Duration::minutes(i64::from(self.report_step))
    }

    /// Simulation steps aggregated into one reporting step.
    pub fn steps_per_report(&self) -> usize {
        (self.report_step / self.simulation_step) as usize
    }

    /// Configured behavioural criteria, or the defaults when none are given.
    pub fn criteria(&self) -> Result<Vec<Criterion>> {
        if self.behavioural.is_empty() {
            return Ok(default_criteria(self.groundwater_enabled()));
        }
        self.behavioural.iter().map(CriterionSpec::build).collect()
    }
}
