use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use smartglue_core::behavioural::{self, Condition};

use crate::convert::{glue_error, matrix_from_array};

/// Keep the rows of `params` whose `objectives` row meets every condition.
///
/// `kinds[c]` and `values[c]` describe the condition on objective column `c`.
#[pyfunction]
fn select<'py>(
    py: Python<'py>,
    params: PyReadonlyArray2<'py, f64>,
    objectives: PyReadonlyArray2<'py, f64>,
    kinds: Vec<String>,
    values: Vec<Vec<f64>>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    if kinds.len() != values.len() {
        return Err(PyValueError::new_err(format!(
            "{} condition kinds given with {} value lists",
            kinds.len(),
            values.len()
        )));
    }
    let params = matrix_from_array(&params, "params")?;
    let objectives = matrix_from_array(&objectives, "objectives")?;
    let conditions = kinds
        .iter()
        .zip(&values)
        .map(|(kind, v)| Condition::parse(kind, v))
        .collect::<Result<Vec<_>, _>>()
        .map_err(glue_error)?;

    let selected = behavioural::select(&params, &objectives, &conditions).map_err(glue_error)?;
    let (rows, cols) = (selected.rows(), selected.cols());
    let flat: Vec<f64> = selected.iter_rows().flatten().copied().collect();
    PyArray1::from_vec(py, flat).reshape([rows, cols])
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "behavioural")?;
    m.add_function(wrap_pyfunction!(select, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
