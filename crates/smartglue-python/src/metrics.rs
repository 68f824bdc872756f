use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use smartglue_core::metrics;

use crate::convert::paired_slices;

/// Wrap `metrics::$name` as a Python function taking two numpy arrays.
macro_rules! metric_fn {
    ($($py_name:ident => $name:ident),+ $(,)?) => {
        $(
            #[pyfunction]
            fn $py_name(
                observed: PyReadonlyArray1<'_, f64>,
                simulated: PyReadonlyArray1<'_, f64>,
            ) -> PyResult<f64> {
                let (obs, sim) = paired_slices(&observed, &simulated)?;
                Ok(metrics::$name(obs, sim))
            }
        )+
    };
}

metric_fn! {
    nse => nse,
    log_nse => log_nse,
    sqrt_nse => sqrt_nse,
    bounded_nse => bounded_nse,
    kge => kge,
    bias => bias,
    pbias => pbias,
    rmse => rmse,
    spearman => spearman,
    mare => mare,
}

/// KGE with its components as `(kge, r, alpha, beta)`.
#[pyfunction]
fn kge_components(
    observed: PyReadonlyArray1<'_, f64>,
    simulated: PyReadonlyArray1<'_, f64>,
) -> PyResult<(f64, f64, f64, f64)> {
    let (obs, sim) = paired_slices(&observed, &simulated)?;
    let c = metrics::kge_components(obs, sim);
    Ok((c.kge, c.r, c.alpha, c.beta))
}

#[pyfunction]
fn groundwater_constraint(reference: f64, simulated: f64) -> f64 {
    metrics::groundwater_constraint(reference, simulated)
}

/// All objective functions in result-file order.
#[pyfunction]
fn score_all<'py>(
    py: Python<'py>,
    observed: PyReadonlyArray1<'py, f64>,
    simulated: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (obs, sim) = paired_slices(&observed, &simulated)?;
    Ok(PyArray1::from_vec(py, metrics::score_all(obs, sim)))
}

#[pyfunction]
#[pyo3(signature = (groundwater=false))]
fn objective_names(groundwater: bool) -> Vec<String> {
    metrics::objective_names(groundwater)
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "metrics")?;
    m.add_function(wrap_pyfunction!(nse, &m)?)?;
    m.add_function(wrap_pyfunction!(log_nse, &m)?)?;
    m.add_function(wrap_pyfunction!(sqrt_nse, &m)?)?;
    m.add_function(wrap_pyfunction!(bounded_nse, &m)?)?;
    m.add_function(wrap_pyfunction!(kge, &m)?)?;
    m.add_function(wrap_pyfunction!(kge_components, &m)?)?;
    m.add_function(wrap_pyfunction!(bias, &m)?)?;
    m.add_function(wrap_pyfunction!(pbias, &m)?)?;
    m.add_function(wrap_pyfunction!(rmse, &m)?)?;
    m.add_function(wrap_pyfunction!(spearman, &m)?)?;
    m.add_function(wrap_pyfunction!(mare, &m)?)?;
    m.add_function(wrap_pyfunction!(groundwater_constraint, &m)?)?;
    m.add_function(wrap_pyfunction!(score_all, &m)?)?;
    m.add_function(wrap_pyfunction!(objective_names, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
