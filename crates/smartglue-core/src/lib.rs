//! smartglue-core: GLUE behavioural replay for lumped rainfall-runoff models.
//!
//! A prior Monte Carlo sample is filtered into a behavioural set with
//! threshold conditions on its objective functions. Every behavioural
//! parameter vector is then run through a [`SimulationModel`], scored
//! against the observations and written to the result file.
pub mod behavioural;
pub mod error;
pub mod forcing;
pub mod harness;
pub mod matrix;
pub mod metrics;
pub mod parameters;
pub mod sample;
pub mod sampler;
pub mod series;
pub mod settings;
pub mod smart;
pub mod traits;
pub mod writer;

pub use error::{GlueError, Result};
pub use harness::{CalibrationHarness, RunSummary};
pub use sampler::ExecutionMode;
pub use traits::{ModelOutput, SimulationModel};
