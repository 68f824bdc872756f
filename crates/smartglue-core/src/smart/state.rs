/// SMART model state variables.
///
/// Water stored in the soil layers and in the five routing reservoirs [mm].
use super::constants::{INITIAL_SOIL_FILL, N_SOIL_LAYERS};
use super::params::Parameters;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    /// Soil moisture per layer, top layer first.
    pub soil_layers: [f64; N_SOIL_LAYERS],
    pub overland: f64,
    pub drain: f64,
    pub interflow: f64,
    pub groundwater: f64,
    pub river: f64,
}

impl State {
    /// Create initial state from parameters.
    ///
    /// Soil layers start at [`INITIAL_SOIL_FILL`] of their capacity and the
    /// routing reservoirs start empty.
    pub fn initialize(params: &Parameters) -> Self {
        Self {
            soil_layers: [INITIAL_SOIL_FILL * params.layer_capacity(); N_SOIL_LAYERS],
            overland: 0.0,
            drain: 0.0,
            interflow: 0.0,
            groundwater: 0.0,
            river: 0.0,
        }
    }

    /// Total soil moisture [mm].
    pub fn soil_moisture(&self) -> f64 {
        self.soil_layers.iter().sum()
    }

    /// Total water held by the model [mm].
    pub fn total_storage(&self) -> f64 {
        self.soil_moisture() + self.overland + self.drain + self.interflow + self.groundwater + self.river
    }
}
