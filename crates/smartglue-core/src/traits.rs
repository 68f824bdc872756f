use crate::parameters::ParameterVector;
use crate::series::TimeSeries;

/// Output of one model run.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Simulated flow on the reporting grid.
    pub flow: TimeSeries,
    /// Scalar diagnostic compared with the groundwater-constraint reference.
    pub diagnostic: f64,
}

/// Contract between the calibration harness and a lumped rainfall-runoff model.
///
/// The harness only needs a parameter vector in, a timestamped flow series
/// and one scalar diagnostic out, plus the observed flow over the same
/// timestamp domain. Implementations must be shareable across threads since
/// draws may run in parallel.
pub trait SimulationModel: Sync {
    /// Run the model for one parameter vector.
    fn simulate(&self, params: &ParameterVector) -> Result<ModelOutput, String>;

    /// Observed flow, NaN where no observation exists.
    fn observed(&self) -> &TimeSeries;
}
