//! Objective functions scoring a simulated flow series against observations.
//!
//! All metrics take observed and simulated slices of equal length, free of
//! NaN, and return a scalar score. A metric whose mathematical precondition
//! does not hold (empty input, zero observed variance, zero observed sum,
//! zero observed value for relative errors, non-positive flow under a log
//! transform) returns `f64::NAN`. The same rule applies to every function in
//! this module.

/// Half-width of the acceptance band of the groundwater constraint.
pub const GROUNDWATER_TOLERANCE: f64 = 0.1;

/// Objective-function column names, in scoring order.
pub const OBJECTIVE_NAMES: [&str; 13] = [
    "NSE", "lgNSE", "rtNSE", "C2M", "KGE", "KGEc", "KGEa", "KGEb", "Bias", "PBias", "RMSE", "Rho",
    "MARE",
];

/// Column name of the optional groundwater-constraint metric.
pub const GROUNDWATER_NAME: &str = "GW";

/// Objective values of one draw, in the order of [`objective_names`].
pub type ObjectiveVector = Vec<f64>;

/// Column names of the objective vector, with the groundwater metric last when enabled.
pub fn objective_names(groundwater: bool) -> Vec<String> {
    let mut names: Vec<String> = OBJECTIVE_NAMES.iter().map(|n| n.to_string()).collect();
    if groundwater {
        names.push(GROUNDWATER_NAME.to_string());
    }
    names
}

/// Compute the 13 flow metrics in [`OBJECTIVE_NAMES`] order.
pub fn score_all(observed: &[f64], simulated: &[f64]) -> ObjectiveVector {
    let k = kge_components(observed, simulated);
    vec![
        nse(observed, simulated),
        log_nse(observed, simulated),
        sqrt_nse(observed, simulated),
        bounded_nse(observed, simulated),
        k.kge,
        k.r,
        k.alpha,
        k.beta,
        bias(observed, simulated),
        pbias(observed, simulated),
        rmse(observed, simulated),
        spearman(observed, simulated),
        mare(observed, simulated),
    ]
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// True when `values` carries no spread: every value equals the first, or the
/// squared deviations vanish below rounding error relative to `Σv²`.
fn zero_spread(values: &[f64], mean: f64) -> bool {
    let Some(&first) = values.first() else {
        return true;
    };
    if values.iter().all(|&v| v == first) {
        return true;
    }
    let deviations: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let magnitude: f64 = values.iter().map(|v| v * v).sum();
    deviations < f64::EPSILON * magnitude
}

/// Population standard deviation.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Nash-Sutcliffe Efficiency. Range: (-inf, 1], 1 = perfect.
pub fn nse(observed: &[f64], simulated: &[f64]) -> f64 {
    if observed.is_empty() {
        return f64::NAN;
    }
    let mean_obs = mean(observed);
    if zero_spread(observed, mean_obs) {
        return f64::NAN;
    }
    let numerator: f64 = observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s).powi(2))
        .sum();
    let denominator: f64 = observed.iter().map(|o| (o - mean_obs).powi(2)).sum();
    1.0 - numerator / denominator
}

/// NSE on ln(x). NaN as soon as either series holds a zero or negative flow.
pub fn log_nse(observed: &[f64], simulated: &[f64]) -> f64 {
    if observed.iter().chain(simulated).any(|&v| v <= 0.0) {
        return f64::NAN;
    }
    let log_obs: Vec<f64> = observed.iter().map(|o| o.ln()).collect();
    let log_sim: Vec<f64> = simulated.iter().map(|s| s.ln()).collect();
    nse(&log_obs, &log_sim)
}

/// Square-root-transformed NSE, a compromise between high- and low-flow weighting.
pub fn sqrt_nse(observed: &[f64], simulated: &[f64]) -> f64 {
    let rt_obs: Vec<f64> = observed.iter().map(|o| o.sqrt()).collect();
    let rt_sim: Vec<f64> = simulated.iter().map(|s| s.sqrt()).collect();
    nse(&rt_obs, &rt_sim)
}

/// Bounded NSE: 1 / (2 - NSE). Range: (0, 1], 1 = perfect, 0.5 = mean-flow model.
pub fn bounded_nse(observed: &[f64], simulated: &[f64]) -> f64 {
    1.0 / (2.0 - nse(observed, simulated))
}

/// Kling-Gupta Efficiency together with its three components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KgeComponents {
    pub kge: f64,
    /// Linear correlation between simulated and observed.
    pub r: f64,
    /// Variability ratio sigma_sim / sigma_obs.
    pub alpha: f64,
    /// Bias ratio mu_sim / mu_obs.
    pub beta: f64,
}

/// Kling-Gupta Efficiency and components. Range of KGE: (-inf, 1], 1 = perfect.
///
/// `r` is NaN when either series has zero variance, `alpha` when the observed
/// series has zero variance, `beta` when the observed mean is zero. KGE is
/// NaN whenever one of its components is.
pub fn kge_components(observed: &[f64], simulated: &[f64]) -> KgeComponents {
    if observed.is_empty() {
        return KgeComponents {
            kge: f64::NAN,
            r: f64::NAN,
            alpha: f64::NAN,
            beta: f64::NAN,
        };
    }
    let n = observed.len() as f64;
    let mean_o = mean(observed);
    let mean_s = mean(simulated);
    let std_o = std_dev(observed, mean_o);
    let std_s = std_dev(simulated, mean_s);

    let flat_o = zero_spread(observed, mean_o);
    let flat_s = zero_spread(simulated, mean_s);

    let r = if flat_o || flat_s {
        f64::NAN
    } else {
        observed
            .iter()
            .zip(simulated)
            .map(|(o, s)| (o - mean_o) * (s - mean_s))
            .sum::<f64>()
            / (n * std_o * std_s)
    };
    let alpha = if flat_o { f64::NAN } else { std_s / std_o };
    let beta = if mean_o == 0.0 { f64::NAN } else { mean_s / mean_o };

    let kge = 1.0 - ((r - 1.0).powi(2) + (alpha - 1.0).powi(2) + (beta - 1.0).powi(2)).sqrt();
    KgeComponents {
        kge,
        r,
        alpha,
        beta,
    }
}

/// Kling-Gupta Efficiency alone.
pub fn kge(observed: &[f64], simulated: &[f64]) -> f64 {
    kge_components(observed, simulated).kge
}

/// Mean error obs - sim. Optimal = 0. Negative = overestimation.
pub fn bias(observed: &[f64], simulated: &[f64]) -> f64 {
    if observed.is_empty() {
        return f64::NAN;
    }
    observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| o - s)
        .sum::<f64>()
        / observed.len() as f64
}

/// Percent Bias. Optimal = 0. Positive = overestimation.
pub fn pbias(observed: &[f64], simulated: &[f64]) -> f64 {
    let sum_obs: f64 = observed.iter().sum();
    if observed.is_empty() || sum_obs == 0.0 {
        return f64::NAN;
    }
    let diff_sum: f64 = simulated
        .iter()
        .zip(observed)
        .map(|(s, o)| s - o)
        .sum();
    100.0 * diff_sum / sum_obs
}

/// Root Mean Square Error. Range: [0, inf), 0 = perfect.
pub fn rmse(observed: &[f64], simulated: &[f64]) -> f64 {
    if observed.is_empty() {
        return f64::NAN;
    }
    let mse: f64 = observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s).powi(2))
        .sum::<f64>()
        / observed.len() as f64;
    mse.sqrt()
}

/// Fractional ranks (1-based), tied values share their average rank.
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end (0-based) share ranks start+1..=end
        let avg = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg;
        }
        start = end;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let mean_x = mean(x);
    let mean_y = mean(y);
    let cov: f64 = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum();
    if zero_spread(x, mean_x) || zero_spread(y, mean_y) {
        return f64::NAN;
    }
    let var_x: f64 = x.iter().map(|a| (a - mean_x).powi(2)).sum();
    let var_y: f64 = y.iter().map(|b| (b - mean_y).powi(2)).sum();
    cov / (var_x * var_y).sqrt()
}

/// Spearman rank correlation. Range: [-1, 1], 1 = same ordering.
pub fn spearman(observed: &[f64], simulated: &[f64]) -> f64 {
    if observed.is_empty() {
        return f64::NAN;
    }
    pearson(&ranks(observed), &ranks(simulated))
}

/// Mean Absolute Relative Error: mean(|sim - obs| / obs). Range: [0, inf), 0 = perfect.
pub fn mare(observed: &[f64], simulated: &[f64]) -> f64 {
    if observed.is_empty() || observed.iter().any(|&o| o == 0.0) {
        return f64::NAN;
    }
    observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| ((s - o) / o).abs())
        .sum::<f64>()
        / observed.len() as f64
}

/// Groundwater constraint: 1.0 when the simulated diagnostic lies within
/// [`GROUNDWATER_TOLERANCE`] of the reference, 0.0 otherwise.
pub fn groundwater_constraint(reference: f64, simulated: f64) -> f64 {
    if reference.is_nan() || simulated.is_nan() {
        return f64::NAN;
    }
    if (simulated - reference).abs() <= GROUNDWATER_TOLERANCE {
        1.0
    } else {
        0.0
    }
}
