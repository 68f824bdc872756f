/// SMART numerical constants and parameter bounds.
///
/// Centralises the fixed values used throughout the SMART model.

// -- Model contract constants --

/// Number of soil layers sharing the effective soil depth Z.
pub const N_SOIL_LAYERS: usize = 6;

/// Initial soil moisture as a fraction of each layer's capacity.
pub const INITIAL_SOIL_FILL: f64 = 0.5;

// -- Parameter bounds --

/// Parameter bounds for calibration.
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Rainfall aerial correction coefficient [-].
pub const T_BOUNDS: Bounds = Bounds { min: 0.9, max: 1.1 };

/// Evaporation decay with soil depth [-].
pub const C_BOUNDS: Bounds = Bounds { min: 0.0, max: 1.0 };

/// Quick runoff coefficient [-].
pub const H_BOUNDS: Bounds = Bounds { min: 0.0, max: 0.3 };

/// Fraction of saturation excess diverted to drain flow [-].
pub const D_BOUNDS: Bounds = Bounds { min: 0.0, max: 1.0 };

/// Soil outflow coefficient [1/step].
pub const S_BOUNDS: Bounds = Bounds {
    min: 0.0,
    max: 0.013,
};

/// Effective soil depth [mm].
pub const Z_BOUNDS: Bounds = Bounds {
    min: 15.0,
    max: 150.0,
};

/// Overland and interflow reservoir residence time [h].
pub const SK_BOUNDS: Bounds = Bounds {
    min: 1.0,
    max: 240.0,
};

/// Drain flow reservoir residence time [h].
pub const FK_BOUNDS: Bounds = Bounds {
    min: 1.0,
    max: 240.0,
};

/// Groundwater reservoir residence time [h].
pub const GK_BOUNDS: Bounds = Bounds {
    min: 1200.0,
    max: 5000.0,
};

/// River channel reservoir residence time [h].
pub const RK_BOUNDS: Bounds = Bounds {
    min: 1.0,
    max: 96.0,
};

/// All bounds in canonical parameter order.
pub const ALL_BOUNDS: [Bounds; 10] = [
    T_BOUNDS, C_BOUNDS, H_BOUNDS, D_BOUNDS, S_BOUNDS, Z_BOUNDS, SK_BOUNDS, FK_BOUNDS, GK_BOUNDS,
    RK_BOUNDS,
];

/// Bounds as (min, max) tuples, in canonical parameter order.
pub const PARAM_BOUNDS: [(f64, f64); 10] = [
    (0.9, 1.1),
    (0.0, 1.0),
    (0.0, 0.3),
    (0.0, 1.0),
    (0.0, 0.013),
    (15.0, 150.0),
    (1.0, 240.0),
    (1.0, 240.0),
    (1200.0, 5000.0),
    (1.0, 96.0),
];
