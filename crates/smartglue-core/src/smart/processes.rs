/// SMART core process functions.
///
/// Pure functions for each stage of a timestep: rainfall correction, quick
/// runoff, layered soil moisture accounting and linear-reservoir routing.
/// Water amounts are in mm per step.

/// Corrected rainfall reaching the catchment.
pub fn effective_rainfall(precip: f64, t: f64) -> f64 {
    precip * t
}

/// Split rainfall into quick (overland) runoff and infiltration.
///
/// Quick runoff grows with the soil saturation ratio.
/// Returns (overland_input, infiltration).
pub fn quick_runoff(rain: f64, soil_moisture: f64, z: f64, h: f64) -> (f64, f64) {
    let saturation = (soil_moisture / z).clamp(0.0, 1.0);
    let overland = h * saturation * rain;
    (overland, rain - overland)
}

/// Fill soil layers top-down with `infiltration`.
///
/// Returns the saturation excess that no layer could hold.
pub fn infiltrate(layers: &mut [f64], infiltration: f64, capacity: f64) -> f64 {
    let mut remaining = infiltration;
    for layer in layers.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let room = (capacity - *layer).max(0.0);
        let added = remaining.min(room);
        *layer += added;
        remaining -= added;
    }
    remaining
}

/// Split saturation excess into drain flow and deep percolation.
///
/// Returns (drain_input, percolation).
pub fn split_excess(excess: f64, d: f64) -> (f64, f64) {
    let drain = d * excess;
    (drain, excess - drain)
}

/// Draw evapotranspiration from the soil layers, top-down.
///
/// The demand passed to each deeper layer is reduced by the decay factor
/// `c`. Returns the actual evapotranspiration.
pub fn evapotranspiration(layers: &mut [f64], pet: f64, c: f64) -> f64 {
    let mut demand = pet;
    let mut actual = 0.0;
    for layer in layers.iter_mut() {
        if demand <= 0.0 {
            break;
        }
        let taken = demand.min(*layer);
        *layer -= taken;
        actual += taken;
        demand = (demand - taken) * c;
    }
    actual
}

/// Lateral soil outflow: each layer releases the fraction `s` of its content.
///
/// Returns the total interflow input.
pub fn soil_outflow(layers: &mut [f64], s: f64) -> f64 {
    layers
        .iter_mut()
        .map(|layer| {
            let out = s * *layer;
            *layer -= out;
            out
        })
        .sum()
}

/// Linear reservoir over one step of `dt_hours`, residence time `k_hours`.
///
/// Uses the exact exponential recession of storage plus inflow.
/// Returns (new_storage, outflow).
pub fn linear_reservoir(storage: f64, inflow: f64, k_hours: f64, dt_hours: f64) -> (f64, f64) {
    let available = storage + inflow;
    let outflow = available * (1.0 - (-dt_hours / k_hours).exp());
    (available - outflow, outflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quick_runoff_scales_with_saturation() {
        let (o, i) = quick_runoff(10.0, 0.0, 60.0, 0.2);
        assert_eq!(o, 0.0);
        assert_eq!(i, 10.0);
        let (o, i) = quick_runoff(10.0, 60.0, 60.0, 0.2);
        assert_relative_eq!(o, 2.0);
        assert_relative_eq!(i, 8.0);
    }

    #[test]
    fn infiltrate_fills_top_down() {
        let mut layers = [8.0, 5.0, 0.0];
        let excess = infiltrate(&mut layers, 6.0, 10.0);
        assert_eq!(layers, [10.0, 9.0, 0.0]);
        assert_eq!(excess, 0.0);
        let excess = infiltrate(&mut layers, 15.0, 10.0);
        assert_eq!(layers, [10.0, 10.0, 10.0]);
        assert_relative_eq!(excess, 4.0);
    }

    #[test]
    fn split_excess_conserves_water() {
        let (d, p) = split_excess(4.0, 0.25);
        assert_relative_eq!(d, 1.0);
        assert_relative_eq!(p, 3.0);
    }

    #[test]
    fn evapotranspiration_decays_with_depth() {
        let mut layers = [1.0, 5.0, 5.0];
        let aet = evapotranspiration(&mut layers, 3.0, 0.5);
        // layer 0 gives 1.0, remaining demand 2.0 * 0.5 = 1.0 taken from layer 1
        assert_relative_eq!(aet, 2.0);
        assert_eq!(layers, [0.0, 4.0, 5.0]);
    }

    #[test]
    fn evapotranspiration_limited_by_storage() {
        let mut layers = [0.5, 0.5];
        let aet = evapotranspiration(&mut layers, 10.0, 1.0);
        assert_relative_eq!(aet, 1.0);
        assert_eq!(layers, [0.0, 0.0]);
    }

    #[test]
    fn soil_outflow_fraction_of_each_layer() {
        let mut layers = [10.0, 20.0];
        let out = soil_outflow(&mut layers, 0.01);
        assert_relative_eq!(out, 0.3);
        assert_relative_eq!(layers[1], 19.8);
    }

    #[test]
    fn linear_reservoir_mass_balance() {
        let (s, q) = linear_reservoir(10.0, 2.0, 24.0, 1.0);
        assert_relative_eq!(s + q, 12.0, epsilon = 1e-12);
        assert_relative_eq!(q, 12.0 * (1.0 - (-1.0_f64 / 24.0).exp()), epsilon = 1e-12);
    }

    #[test]
    fn linear_reservoir_empty_stays_empty() {
        assert_eq!(linear_reservoir(0.0, 0.0, 10.0, 1.0), (0.0, 0.0));
    }
}
