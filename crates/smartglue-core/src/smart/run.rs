/// SMART model orchestration functions.
///
/// - `step()`: Execute a single timestep
/// - `run()`: Execute over a forcing timeseries
use super::params::Parameters;
use super::processes;
use super::state::State;

/// Per-timestep fluxes [mm/step].
#[derive(Debug, Clone, Copy, Default)]
pub struct Fluxes {
    pub precip: f64,
    pub pet: f64,
    pub rainfall: f64,
    pub overland_input: f64,
    pub infiltration: f64,
    pub drain_input: f64,
    pub percolation: f64,
    pub actual_et: f64,
    pub interflow_input: f64,
    pub q_overland: f64,
    pub q_interflow: f64,
    pub q_drain: f64,
    pub q_groundwater: f64,
    pub streamflow: f64,
}

impl Fluxes {
    /// Flow leaving the hillslope reservoirs before channel routing.
    pub fn hillslope_outflow(&self) -> f64 {
        self.q_overland + self.q_interflow + self.q_drain + self.q_groundwater
    }
}

/// Execute one timestep of SMART.
///
/// Returns (new_state, fluxes).
pub fn step(state: &State, params: &Parameters, precip: f64, pet: f64, dt_hours: f64) -> (State, Fluxes) {
    let mut layers = state.soil_layers;
    let capacity = params.layer_capacity();

    // 1. Rainfall and quick runoff
    let rainfall = processes::effective_rainfall(precip, params.t);
    let soil_moisture: f64 = layers.iter().sum();
    let (overland_input, infiltration) =
        processes::quick_runoff(rainfall, soil_moisture, params.z, params.h);

    // 2. Soil moisture accounting
    let excess = processes::infiltrate(&mut layers, infiltration, capacity);
    let (drain_input, percolation) = processes::split_excess(excess, params.d);
    let actual_et = processes::evapotranspiration(&mut layers, pet, params.c);
    let interflow_input = processes::soil_outflow(&mut layers, params.s);

    // 3. Hillslope routing
    let (overland, q_overland) =
        processes::linear_reservoir(state.overland, overland_input, params.sk, dt_hours);
    let (interflow, q_interflow) =
        processes::linear_reservoir(state.interflow, interflow_input, params.sk, dt_hours);
    let (drain, q_drain) = processes::linear_reservoir(state.drain, drain_input, params.fk, dt_hours);
    let (groundwater, q_groundwater) =
        processes::linear_reservoir(state.groundwater, percolation, params.gk, dt_hours);

    // 4. Channel routing
    let hillslope = q_overland + q_interflow + q_drain + q_groundwater;
    let (river, streamflow) = processes::linear_reservoir(state.river, hillslope, params.rk, dt_hours);

    let new_state = State {
        soil_layers: layers,
        overland,
        drain,
        interflow,
        groundwater,
        river,
    };

    let fluxes = Fluxes {
        precip,
        pet,
        rainfall,
        overland_input,
        infiltration,
        drain_input,
        percolation,
        actual_et,
        interflow_input,
        q_overland,
        q_interflow,
        q_drain,
        q_groundwater,
        streamflow,
    };

    (new_state, fluxes)
}

/// Run SMART over a forcing timeseries.
///
/// Returns the fluxes of every timestep.
pub fn run(
    params: &Parameters,
    precip: &[f64],
    pet: &[f64],
    dt_hours: f64,
    initial_state: Option<&State>,
) -> Vec<Fluxes> {
    assert_eq!(precip.len(), pet.len(), "precip and pet must have the same length");

    let mut state = match initial_state {
        Some(s) => *s,
        None => State::initialize(params),
    };

    let mut outputs = Vec::with_capacity(precip.len());
    for (&p, &e) in precip.iter().zip(pet) {
        let (new_state, fluxes) = step(&state, params, p, e, dt_hours);
        outputs.push(fluxes);
        state = new_state;
    }
    outputs
}
