/// SMART calibrated parameters.
///
/// Ten parameters controlling rainfall correction, soil moisture accounting
/// and the residence times of the routing reservoirs.
use smartglue_macros::ParameterSet;

use super::constants::ALL_BOUNDS;
use crate::parameters::ParameterVector;

#[derive(Debug, Clone, Copy, ParameterSet)]
pub struct Parameters {
    #[parameter(name = "T")]
    pub t: f64,
    #[parameter(name = "C")]
    pub c: f64,
    #[parameter(name = "H")]
    pub h: f64,
    #[parameter(name = "D")]
    pub d: f64,
    #[parameter(name = "S")]
    pub s: f64,
    #[parameter(name = "Z")]
    pub z: f64,
    #[parameter(name = "SK")]
    pub sk: f64,
    #[parameter(name = "FK")]
    pub fk: f64,
    #[parameter(name = "GK")]
    pub gk: f64,
    #[parameter(name = "RK")]
    pub rk: f64,
}

impl Parameters {
    /// Create Parameters from a parameter vector, returning an error if any
    /// value is out of bounds.
    pub fn from_vector(vector: &ParameterVector) -> Result<Self, String> {
        let params = Self::from_slice(vector.values())?;
        params.check_bounds()?;
        Ok(params)
    }

    fn check_bounds(&self) -> Result<(), String> {
        for ((name, val), bounds) in Self::NAMES.iter().zip(self.to_array()).zip(&ALL_BOUNDS) {
            if !(bounds.min..=bounds.max).contains(&val) {
                return Err(format!(
                    "{} = {} is out of bounds [{}, {}]",
                    name, val, bounds.min, bounds.max
                ));
            }
        }
        Ok(())
    }

    /// Capacity of one soil layer [mm].
    pub fn layer_capacity(&self) -> f64 {
        self.z / super::constants::N_SOIL_LAYERS as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ParameterSupply, PARAMETER_NAMES};
    use crate::smart::constants::PARAM_BOUNDS;

    fn valid() -> [f64; 10] {
        [1.0, 0.5, 0.1, 0.5, 0.005, 60.0, 24.0, 48.0, 2400.0, 12.0]
    }

    #[test]
    fn names_match_parameter_vector() {
        assert_eq!(Parameters::NAMES, &PARAMETER_NAMES);
        assert_eq!(Parameters::COUNT, 10);
    }

    #[test]
    fn valid_parameters() {
        let v = ParameterVector::from_slice(&valid()).unwrap();
        let p = Parameters::from_vector(&v).unwrap();
        assert_eq!(p.z, 60.0);
        assert_eq!(p.gk, 2400.0);
        assert_eq!(p.layer_capacity(), 10.0);
    }

    #[test]
    fn out_of_bounds_rejected() {
        let mut values = valid();
        values[5] = 500.0;
        let v = ParameterVector::from_slice(&values).unwrap();
        let err = Parameters::from_vector(&v).unwrap_err();
        assert!(err.starts_with("Z = 500"));
    }

    #[test]
    fn boundary_values_are_valid() {
        let low = [0.9, 0.0, 0.0, 0.0, 0.0, 15.0, 1.0, 1.0, 1200.0, 1.0];
        let high = [1.1, 1.0, 0.3, 1.0, 0.013, 150.0, 240.0, 240.0, 5000.0, 96.0];
        for values in [low, high] {
            let v = ParameterVector::from_slice(&values).unwrap();
            assert!(Parameters::from_vector(&v).is_ok());
        }
    }

    #[test]
    fn to_array_roundtrip() {
        let p = Parameters::from_slice(&valid()).unwrap();
        assert_eq!(p.to_array(), valid());
    }

    #[test]
    fn uniform_draws_within_bounds_are_valid() {
        let supply = ParameterSupply::uniform(&PARAM_BOUNDS, 50, 11).unwrap();
        while let Some((_, v)) = supply.next() {
            assert!(Parameters::from_vector(&v).is_ok());
        }
    }
}
