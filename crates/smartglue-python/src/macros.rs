/// Collect one field of every per-step `Fluxes` value into a numpy array
/// and store it in a `PyDict` under the field name.
macro_rules! fluxes_to_dict {
    ($py:expr, $fluxes:expr, $($field:ident),+ $(,)?) => {{
        let dict = pyo3::types::PyDict::new($py);
        $(
            let column: Vec<f64> = $fluxes.iter().map(|f| f.$field).collect();
            dict.set_item(stringify!($field), numpy::PyArray1::from_vec($py, column))?;
        )+
        dict
    }};
}
