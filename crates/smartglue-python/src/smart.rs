use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use smartglue_core::parameters::{ParameterVector, N_PARAMETERS};
use smartglue_core::smart::params::Parameters;
use smartglue_core::smart::run;

use crate::convert::{checked_slice, contiguous_slice};

/// Run SMART over a forcing series. Returns a dict of per-step flux arrays.
#[pyfunction]
#[pyo3(signature = (params, precip, pet, dt_hours=1.0))]
fn smart_run<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    precip: PyReadonlyArray1<'py, f64>,
    pet: PyReadonlyArray1<'py, f64>,
    dt_hours: f64,
) -> PyResult<Bound<'py, PyDict>> {
    let p_slice = checked_slice(&params, N_PARAMETERS, "params")?;
    let vector = ParameterVector::from_slice(p_slice)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let p = Parameters::from_vector(&vector).map_err(PyValueError::new_err)?;

    let precip_slice = contiguous_slice(&precip)?;
    let pet_slice = checked_slice(&pet, precip_slice.len(), "pet")?;

    let fluxes = run::run(&p, precip_slice, pet_slice, dt_hours, None);

    let dict = fluxes_to_dict!(
        py, fluxes,
        precip, pet, rainfall, overland_input, infiltration, drain_input, percolation,
        actual_et, interflow_input, q_overland, q_interflow, q_drain, q_groundwater, streamflow,
    );
    Ok(dict)
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "smart")?;
    m.add_function(wrap_pyfunction!(smart_run, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
