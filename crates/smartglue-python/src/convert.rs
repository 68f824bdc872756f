use numpy::{PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use smartglue_core::matrix::Matrix;
use smartglue_core::GlueError;

/// Validate that a numpy array is C-contiguous and return its slice.
pub fn contiguous_slice<'py>(arr: &'py PyReadonlyArray1<'py, f64>) -> PyResult<&'py [f64]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Validate length + contiguity of a numpy array.
pub fn checked_slice<'py>(
    arr: &'py PyReadonlyArray1<'py, f64>,
    expected_len: usize,
    name: &str,
) -> PyResult<&'py [f64]> {
    let slice = contiguous_slice(arr)?;
    if slice.len() != expected_len {
        return Err(PyValueError::new_err(format!(
            "{} must have {} elements, got {}",
            name,
            expected_len,
            slice.len()
        )));
    }
    Ok(slice)
}

/// Validate that two arrays line up element for element.
pub fn paired_slices<'py>(
    observed: &'py PyReadonlyArray1<'py, f64>,
    simulated: &'py PyReadonlyArray1<'py, f64>,
) -> PyResult<(&'py [f64], &'py [f64])> {
    let obs = contiguous_slice(observed)?;
    let sim = checked_slice(simulated, obs.len(), "simulated")?;
    Ok((obs, sim))
}

/// Copy a C-contiguous 2-D array into a [`Matrix`].
pub fn matrix_from_array(arr: &PyReadonlyArray2<'_, f64>, name: &str) -> PyResult<Matrix> {
    let (rows, cols) = arr.as_array().dim();
    let data = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err(format!("{} must be C-contiguous", name)))?;
    Matrix::from_vec(rows, cols, data.to_vec()).map_err(PyValueError::new_err)
}

pub fn glue_error(err: GlueError) -> PyErr {
    PyValueError::new_err(err.to_string())
}
