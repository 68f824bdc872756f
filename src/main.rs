//! # smartglue
//!
//! GLUE behavioural replay of the SMART model for one catchment.
//!
//! ```bash
//! # Sequential run reading ./in/wye and writing ./out/wye/wye.SMART.glue
//! smartglue wye
//!
//! # Parallel run below another project root, without the simulated series
//! smartglue wye --parallel --root /data/glue --no-series
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use smartglue::{run_catchment, CatchmentPaths, ExecutionMode, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "smartglue")]
#[command(about = "GLUE behavioural replay for the SMART rainfall-runoff model")]
#[command(version)]
struct Args {
    /// Catchment name, used for the input and output directories and file names
    catchment: String,

    /// Run the draws one after the other (default)
    #[arg(short = 's', long = "sequence", conflicts_with = "parallel")]
    sequence: bool,

    /// Spread the draws over all cores
    #[arg(short = 'p', long = "parallel")]
    parallel: bool,

    /// Project root holding the `in/` and `out/` directories
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Do not write the simulated series to the result file
    #[arg(long)]
    no_series: bool,
}

impl Args {
    fn mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let paths = CatchmentPaths::new(&args.root, &args.catchment);
    let options = RunOptions {
        mode: args.mode(),
        no_series: args.no_series,
    };
    info!(catchment = %args.catchment, mode = ?options.mode, "smartglue starting");

    match run_catchment(&paths, &options) {
        Ok(summary) => {
            info!(
                records = summary.records,
                path = %summary.path.display(),
                "done"
            );
            Ok(())
        }
        Err(err) => {
            error!("{:#}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_sequential() {
        let args = Args::try_parse_from(["smartglue", "wye"]).unwrap();
        assert_eq!(args.mode(), ExecutionMode::Sequential);
        assert_eq!(args.root, PathBuf::from("."));
        assert!(!args.no_series);
    }

    #[test]
    fn short_flags_select_mode() {
        let args = Args::try_parse_from(["smartglue", "wye", "-p"]).unwrap();
        assert_eq!(args.mode(), ExecutionMode::Parallel);
        let args = Args::try_parse_from(["smartglue", "-s", "wye"]).unwrap();
        assert_eq!(args.mode(), ExecutionMode::Sequential);
    }

    #[test]
    fn sequence_and_parallel_conflict() {
        assert!(Args::try_parse_from(["smartglue", "wye", "-s", "-p"]).is_err());
    }

    #[test]
    fn root_and_no_series() {
        let args =
            Args::try_parse_from(["smartglue", "wye", "--root", "/data", "--no-series"]).unwrap();
        assert_eq!(args.root, PathBuf::from("/data"));
        assert!(args.no_series);
    }
}
