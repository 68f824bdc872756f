//! Meteorological forcing on the simulation time grid.
//!
//! Rainfall and potential evapotranspiration series are read from the
//! catchment input files, cut to the simulation period and checked to cover
//! every simulation step without gaps.
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{GlueError, Result};
use crate::series::{format_datetime, read_series, TimeSeries};
use crate::settings::Settings;

/// Validated forcing data for the SMART model.
///
/// All arrays have the same length. NaN values are rejected.
#[derive(Debug, Clone)]
pub struct ForcingData {
    /// Start timestamp of each simulation step.
    pub timestamps: Vec<NaiveDateTime>,
    /// Rainfall [mm/step].
    pub precip: Vec<f64>,
    /// Potential evapotranspiration [mm/step].
    pub pet: Vec<f64>,
}

impl ForcingData {
    /// Create new ForcingData with validation.
    ///
    /// Validates:
    /// - all arrays have the same length
    /// - arrays are non-empty
    /// - no NaN values in precip or pet
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        precip: Vec<f64>,
        pet: Vec<f64>,
    ) -> std::result::Result<Self, String> {
        if precip.is_empty() {
            return Err("precip array is empty".to_string());
        }
        if precip.len() != pet.len() || precip.len() != timestamps.len() {
            return Err(format!(
                "precip length {} does not match pet length {} and timestamp count {}",
                precip.len(),
                pet.len(),
                timestamps.len()
            ));
        }
        if precip.iter().any(|v| v.is_nan()) {
            return Err("precip array contains NaN values".to_string());
        }
        if pet.iter().any(|v| v.is_nan()) {
            return Err("pet array contains NaN values".to_string());
        }
        Ok(Self {
            timestamps,
            precip,
            pet,
        })
    }

    /// Read rainfall and PET files and sample them on the simulation grid
    /// `[start, end)` of `settings`.
    pub fn from_files(rain_path: &Path, pet_path: &Path, settings: &Settings) -> Result<Self> {
        let rain = read_series(rain_path)?;
        let pet = read_series(pet_path)?;

        let mut timestamps = Vec::new();
        let mut dt = settings.start;
        while dt < settings.end {
            timestamps.push(dt);
            dt += settings.simulation_delta();
        }

        let sample = |series: &TimeSeries, path: &Path| -> Result<Vec<f64>> {
            timestamps
                .iter()
                .map(|dt| {
                    series.get(dt).copied().ok_or_else(|| {
                        GlueError::format(path, format!("no value at {}", format_datetime(dt)))
                    })
                })
                .collect()
        };
        let precip = sample(&rain, rain_path)?;
        let pet = sample(&pet, pet_path)?;

        Self::new(timestamps, precip, pet).map_err(|e| GlueError::format(rain_path, e))
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.precip.len()
    }

    /// Returns `true` if there are no timesteps.
    pub fn is_empty(&self) -> bool {
        self.precip.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::parse_datetime;
    use std::io::Write;

    fn stamps(n: usize) -> Vec<NaiveDateTime> {
        let start = parse_datetime("2000-01-01 00:00:00").unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect()
    }

    #[test]
    fn valid_forcing_data() {
        let fd = ForcingData::new(stamps(3), vec![1.0, 0.0, 2.0], vec![0.1, 0.2, 0.3]);
        assert_eq!(fd.unwrap().len(), 3);
    }

    #[test]
    fn rejects_length_mismatch() {
        let fd = ForcingData::new(stamps(2), vec![1.0, 0.0], vec![0.1]);
        assert!(fd.unwrap_err().contains("does not match"));
    }

    #[test]
    fn rejects_empty_arrays() {
        let fd = ForcingData::new(vec![], vec![], vec![]);
        assert!(fd.unwrap_err().contains("empty"));
    }

    #[test]
    fn rejects_nan() {
        let fd = ForcingData::new(stamps(2), vec![1.0, f64::NAN], vec![0.1, 0.1]);
        assert!(fd.unwrap_err().contains("NaN"));
        let fd = ForcingData::new(stamps(2), vec![1.0, 1.0], vec![f64::NAN, 0.1]);
        assert!(fd.unwrap_err().contains("NaN"));
    }

    fn write_series(values: &[(&str, f64)]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DateTime,value").unwrap();
        for (dt, v) in values {
            writeln!(file, "{},{}", dt, v).unwrap();
        }
        file
    }

    fn settings() -> Settings {
        Settings::from_toml(
            r#"
catchment_area = 1.0e6
gauged_area = 1.0e6
start = "2000-01-01 00:00:00"
end = "2000-01-01 03:00:00"
simulation_step = 60
report_step = 60
warm_up = 0
gw_constraint = -999.0
"#,
        )
        .unwrap()
    }

    #[test]
    fn from_files_samples_simulation_grid() {
        let rain = write_series(&[
            ("1999-12-31 23:00:00", 9.0),
            ("2000-01-01 00:00:00", 1.0),
            ("2000-01-01 01:00:00", 2.0),
            ("2000-01-01 02:00:00", 3.0),
            ("2000-01-01 03:00:00", 9.0),
        ]);
        let pet = write_series(&[
            ("2000-01-01 00:00:00", 0.1),
            ("2000-01-01 01:00:00", 0.2),
            ("2000-01-01 02:00:00", 0.3),
        ]);
        let fd = ForcingData::from_files(rain.path(), pet.path(), &settings()).unwrap();
        assert_eq!(fd.precip, vec![1.0, 2.0, 3.0]);
        assert_eq!(fd.pet, vec![0.1, 0.2, 0.3]);
        assert_eq!(fd.timestamps[0], parse_datetime("2000-01-01 00:00:00").unwrap());
    }

    #[test]
    fn from_files_rejects_gaps() {
        let rain = write_series(&[("2000-01-01 00:00:00", 1.0), ("2000-01-01 02:00:00", 3.0)]);
        let pet = write_series(&[
            ("2000-01-01 00:00:00", 0.1),
            ("2000-01-01 01:00:00", 0.2),
            ("2000-01-01 02:00:00", 0.3),
        ]);
        let err = ForcingData::from_files(rain.path(), pet.path(), &settings()).unwrap_err();
        assert!(err.to_string().contains("2000-01-01 01:00:00"));
    }
}
