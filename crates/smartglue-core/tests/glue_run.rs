//! End-to-end GLUE runs over a file-based prior sample with a stub model.
use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use smartglue_core::behavioural::{default_criteria, select_by_name};
use smartglue_core::metrics::objective_names;
use smartglue_core::parameters::{ParameterVector, PARAMETER_NAMES};
use smartglue_core::sample::load_sample;
use smartglue_core::series::{parse_datetime, TimeSeries};
use smartglue_core::settings::Settings;
use smartglue_core::writer::read_results;
use smartglue_core::{sampler, CalibrationHarness, ExecutionMode, GlueError, ModelOutput, SimulationModel};

/// Linear response to the T parameter; fails when T is above `fail_above`.
struct LinearModel {
    observed: TimeSeries,
    fail_above: f64,
}

impl LinearModel {
    fn new(fail_above: f64) -> Self {
        let start = parse_datetime("2001-01-01 00:00:00").unwrap();
        let observed = (0..20)
            .map(|d| {
                let q = if d == 7 { f64::NAN } else { 1.0 + (d as f64 * 0.7).sin().abs() };
                (start + chrono::Duration::days(d), q)
            })
            .collect();
        Self {
            observed,
            fail_above,
        }
    }
}

impl SimulationModel for LinearModel {
    fn simulate(&self, params: &ParameterVector) -> Result<ModelOutput, String> {
        let t = params.values()[0];
        if t > self.fail_above {
            return Err(format!("T = {} rejected", t));
        }
        let flow = self
            .observed
            .iter()
            .enumerate()
            .map(|(i, (dt, q))| {
                let base = if q.is_nan() { 1.0 } else { *q };
                (*dt, base * t + 0.01 * i as f64)
            })
            .collect();
        Ok(ModelOutput {
            flow,
            diagnostic: 0.25,
        })
    }

    fn observed(&self) -> &TimeSeries {
        &self.observed
    }
}

fn settings() -> Settings {
    Settings::from_toml(
        r#"
catchment_area = 1.0e7
gauged_area = 1.0e7
start = "2001-01-01 00:00:00"
end = "2001-01-21 00:00:00"
simulation_step = 60
report_step = 1440
warm_up = 0
gw_constraint = -999.0
"#,
    )
    .unwrap()
}

/// Prior sample with 12 rows, of which rows 0, 2, 4, ... pass the default
/// criteria. Parameter columns come first to check lookup by name.
fn write_sample(path: &Path) {
    let names = objective_names(false);
    let mut file = std::fs::File::create(path).unwrap();
    let header: Vec<String> = PARAMETER_NAMES
        .iter()
        .map(|s| s.to_string())
        .chain(names.iter().cloned())
        .collect();
    writeln!(file, "{}", header.join(",")).unwrap();
    for row in 0..12 {
        let t = 0.9 + 0.015 * row as f64;
        let params = [t, 0.5, 0.1, 0.5, 0.005, 60.0, 24.0, 48.0, 2400.0, 12.0];
        let (nse, pbias) = if row % 2 == 0 { (0.8, 2.0) } else { (0.6, 15.0) };
        let objectives: Vec<f64> = names
            .iter()
            .map(|n| match n.as_str() {
                "NSE" => nse,
                "PBias" => pbias,
                _ => 0.5,
            })
            .collect();
        let cells: Vec<String> = params
            .iter()
            .chain(&objectives)
            .map(|v| v.to_string())
            .collect();
        writeln!(file, "{}", cells.join(",")).unwrap();
    }
}

fn harness(
    dir: &Path,
    output: &str,
    fail_above: f64,
) -> CalibrationHarness<LinearModel> {
    let sample_path = dir.join("test.SMART.lhs");
    write_sample(&sample_path);
    let names = objective_names(false);
    let sample = load_sample(&sample_path, &PARAMETER_NAMES, &names).unwrap();
    let behavioural = select_by_name(
        &sample.parameters,
        &sample.objectives,
        &names,
        &default_criteria(false),
    )
    .unwrap();
    assert_eq!(behavioural.rows(), 6);
    CalibrationHarness::new(
        LinearModel::new(fail_above),
        &settings(),
        &behavioural,
        &names,
        true,
        &dir.join(output),
    )
    .unwrap()
}

#[test]
fn sequential_run_writes_one_record_per_behavioural_vector() {
    let dir = tempfile::tempdir().unwrap();
    let summary = sampler::run(harness(dir.path(), "seq.glue", 10.0), ExecutionMode::Sequential)
        .unwrap();
    assert_eq!(summary.records, 6);

    let table = read_results(&summary.path).unwrap();
    assert_eq!(table.header.len(), 13 + 10 + 20);
    assert_eq!(table.header[0], "NSE");
    assert_eq!(table.header[13], "T");
    let first_stamp: NaiveDateTime = parse_datetime(&table.header[23]).unwrap();
    assert_eq!(first_stamp, parse_datetime("2001-01-01 00:00:00").unwrap());

    // Behavioural rows are replayed in sample order.
    let ts: Vec<f64> = table.rows.iter().map(|r| r[13]).collect();
    let expected = [0.9, 0.93, 0.96, 0.99, 1.02, 1.05];
    for (got, want) in ts.iter().zip(expected) {
        assert!((got - want).abs() < 1e-6, "{got} != {want}");
    }
    // Every metric is finite despite the missing observation.
    for row in &table.rows {
        assert!(row[..13].iter().all(|v| v.is_finite()));
    }
}

#[test]
fn parallel_and_sequential_runs_write_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let seq = sampler::run(harness(dir.path(), "seq.glue", 10.0), ExecutionMode::Sequential)
        .unwrap();
    let par = sampler::run(harness(dir.path(), "par.glue", 10.0), ExecutionMode::Parallel)
        .unwrap();
    assert_eq!(seq.records, par.records);
    let seq_text = std::fs::read_to_string(&seq.path).unwrap();
    let par_text = std::fs::read_to_string(&par.path).unwrap();
    assert_eq!(seq_text, par_text);
}

#[test]
fn failing_draw_aborts_leaving_complete_lines() {
    let dir = tempfile::tempdir().unwrap();
    // Draws 0..=2 succeed (T <= 0.96), draw 3 fails.
    let err = sampler::run(harness(dir.path(), "abort.glue", 0.97), ExecutionMode::Sequential)
        .unwrap_err();
    assert!(matches!(err, GlueError::Simulation { draw: 3, .. }));

    let path = dir.path().join("abort.glue");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let table = read_results(&path).unwrap();
    assert_eq!(table.rows.len(), 3);
    assert!(table.rows.iter().all(|r| r.len() == table.header.len()));
}

#[test]
fn failing_draw_aborts_parallel_run() {
    let dir = tempfile::tempdir().unwrap();
    let err = sampler::run(harness(dir.path(), "abort.glue", 0.97), ExecutionMode::Parallel)
        .unwrap_err();
    assert!(matches!(err, GlueError::Simulation { .. }));

    let table = read_results(&dir.path().join("abort.glue")).unwrap();
    assert!(table.rows.len() <= 3);
    assert!(table.rows.iter().all(|r| r.len() == table.header.len()));
    assert!(table.rows.iter().all(|r| r[13] <= 0.97 + 1e-6));
}

#[test]
fn empty_behavioural_set_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let behavioural = smartglue_core::matrix::Matrix::from_vec(0, 10, Vec::new()).unwrap();
    let harness = CalibrationHarness::new(
        LinearModel::new(10.0),
        &settings(),
        &behavioural,
        &objective_names(false),
        false,
        &dir.path().join("empty.glue"),
    )
    .unwrap();
    let summary = sampler::run(harness, ExecutionMode::Parallel).unwrap();
    assert_eq!(summary.records, 0);
    let text = std::fs::read_to_string(&summary.path).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("NSE,lgNSE"));
}
