//! SMART -- Soil Moisture Accounting and Routing with Transport.
//!
//! A lumped conceptual rainfall-runoff model with 10 parameters: a layered
//! soil moisture store feeding overland, drain, interflow and groundwater
//! linear reservoirs, routed through one river reservoir.
//! [`SmartModel`] wraps it as a [`SimulationModel`] for one catchment.
pub mod constants;
pub mod params;
pub mod processes;
pub mod run;
pub mod state;

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::Result;
use crate::forcing::ForcingData;
use crate::parameters::ParameterVector;
use crate::series::{read_series, TimeSeries};
use crate::settings::Settings;
use crate::traits::{ModelOutput, SimulationModel};

use self::params::Parameters;

/// SMART set up for one catchment: forcing, observations and time grid.
#[derive(Debug, Clone)]
pub struct SmartModel {
    forcing: ForcingData,
    observed: TimeSeries,
    catchment_area: f64,
    dt_hours: f64,
    steps_per_report: usize,
    warm_up_end: NaiveDateTime,
}

impl SmartModel {
    /// Assemble a model from already loaded forcing and observations.
    ///
    /// `observed` must be expressed at the catchment outlet in m3/s.
    pub fn new(settings: &Settings, forcing: ForcingData, observed: TimeSeries) -> Self {
        let warm_up_end = settings.warm_up_end();
        let observed = observed
            .range(warm_up_end..settings.end)
            .map(|(dt, q)| (*dt, *q))
            .collect();
        Self {
            forcing,
            observed,
            catchment_area: settings.catchment_area,
            dt_hours: f64::from(settings.simulation_step) / 60.0,
            steps_per_report: settings.steps_per_report(),
            warm_up_end,
        }
    }

    /// Load `<catchment>.rain`, `<catchment>.peva` and `<catchment>.flow`
    /// from `input_dir`.
    ///
    /// Observed flows measured at the gauge are transferred to the
    /// catchment outlet with the ratio of catchment to gauged area.
    pub fn load(settings: &Settings, input_dir: &Path, catchment: &str) -> Result<Self> {
        let file = |ext: &str| input_dir.join(format!("{}.{}", catchment, ext));
        let forcing = ForcingData::from_files(&file("rain"), &file("peva"), settings)?;
        let area_ratio = settings.catchment_area / settings.gauged_area;
        let observed = read_series(&file("flow"))?
            .into_iter()
            .map(|(dt, q)| (dt, q * area_ratio))
            .collect();
        let model = Self::new(settings, forcing, observed);
        info!(
            catchment,
            steps = model.forcing.len(),
            observations = model.observed.len(),
            "SMART model ready"
        );
        Ok(model)
    }

    /// Convert runoff depth [mm/step] into discharge [m3/s].
    fn to_discharge(&self, depth_mm: f64) -> f64 {
        depth_mm / 1000.0 * self.catchment_area / (self.dt_hours * 3600.0)
    }
}

impl SimulationModel for SmartModel {
    fn simulate(&self, vector: &ParameterVector) -> std::result::Result<ModelOutput, String> {
        let params = Parameters::from_vector(vector)?;
        let fluxes = run::run(&params, &self.forcing.precip, &self.forcing.pet, self.dt_hours, None);

        // Report-step means of discharge, after warm-up.
        let mut flow = TimeSeries::new();
        let mut groundwater = 0.0;
        let mut hillslope = 0.0;
        let chunks = self
            .forcing
            .timestamps
            .chunks_exact(self.steps_per_report)
            .zip(fluxes.chunks_exact(self.steps_per_report));
        for (stamps, block) in chunks {
            if stamps[0] < self.warm_up_end {
                continue;
            }
            let mean_depth = block.iter().map(|f| f.streamflow).sum::<f64>() / block.len() as f64;
            flow.insert(stamps[0], self.to_discharge(mean_depth));
            groundwater += block.iter().map(|f| f.q_groundwater).sum::<f64>();
            hillslope += block.iter().map(|f| f.hillslope_outflow()).sum::<f64>();
        }

        // Share of groundwater in the flow leaving the hillslope.
        let diagnostic = if hillslope > 0.0 {
            groundwater / hillslope
        } else {
            f64::NAN
        };
        Ok(ModelOutput { flow, diagnostic })
    }

    fn observed(&self) -> &TimeSeries {
        &self.observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::parse_datetime;

    fn settings() -> Settings {
        Settings::from_toml(
            r#"
catchment_area = 3.6e6
gauged_area = 1.8e6
start = "2000-01-01 00:00:00"
end = "2000-01-11 00:00:00"
simulation_step = 60
report_step = 1440
warm_up = 2
gw_constraint = 0.3
"#,
        )
        .unwrap()
    }

    fn forcing(settings: &Settings) -> ForcingData {
        storm_forcing(settings, 2.0)
    }

    fn storm_forcing(settings: &Settings, intensity: f64) -> ForcingData {
        let n = 240;
        let timestamps = (0..n)
            .map(|i| settings.start + settings.simulation_delta() * i)
            .collect();
        let precip = (0..n)
            .map(|i| if i % 24 < 4 { intensity } else { 0.0 })
            .collect();
        ForcingData::new(timestamps, precip, vec![0.05; n as usize]).unwrap()
    }

    fn vector() -> ParameterVector {
        ParameterVector::from_slice(&[1.0, 0.5, 0.1, 0.5, 0.005, 60.0, 24.0, 48.0, 2400.0, 12.0])
            .unwrap()
    }

    #[test]
    fn simulate_reports_daily_after_warm_up() {
        let s = settings();
        let model = SmartModel::new(&s, forcing(&s), TimeSeries::new());
        let out = model.simulate(&vector()).unwrap();
        assert_eq!(out.flow.len(), 8);
        let first = *out.flow.keys().next().unwrap();
        assert_eq!(first, parse_datetime("2000-01-03 00:00:00").unwrap());
        assert!(out.flow.values().all(|q| q.is_finite() && *q >= 0.0));
        assert!((0.0..=1.0).contains(&out.diagnostic));
    }

    #[test]
    fn saturated_soil_recharges_groundwater() {
        let s = settings();
        let model = SmartModel::new(&s, storm_forcing(&s, 20.0), TimeSeries::new());
        let out = model.simulate(&vector()).unwrap();
        assert!(out.diagnostic > 0.0 && out.diagnostic < 1.0);
    }

    #[test]
    fn observed_restricted_to_post_warm_up_period() {
        let s = settings();
        let mut obs = TimeSeries::new();
        obs.insert(parse_datetime("2000-01-01 00:00:00").unwrap(), 1.0);
        obs.insert(parse_datetime("2000-01-05 00:00:00").unwrap(), 2.0);
        obs.insert(parse_datetime("2000-01-12 00:00:00").unwrap(), 3.0);
        let model = SmartModel::new(&s, forcing(&s), obs);
        assert_eq!(model.observed().len(), 1);
    }

    #[test]
    fn discharge_conversion() {
        let s = settings();
        let model = SmartModel::new(&s, forcing(&s), TimeSeries::new());
        // 1 mm/h over 3.6 km2 = 3600 m3/h = 1 m3/s
        assert!((model.to_discharge(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_bounds_vector_fails() {
        let s = settings();
        let model = SmartModel::new(&s, forcing(&s), TimeSeries::new());
        let bad = ParameterVector::from_slice(&[5.0; 10]).unwrap();
        assert!(model.simulate(&bad).is_err());
    }
}
