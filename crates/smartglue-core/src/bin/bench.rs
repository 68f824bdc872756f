/// Core benchmarks: the objective-function suite and one SMART run.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for data generation,
/// and std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use smartglue_core::metrics::score_all;
use smartglue_core::parameters::ParameterVector;
use smartglue_core::smart::params::Parameters;
use smartglue_core::smart::run;

const REPEATS: usize = 7;

/// Simple LCG PRNG for deterministic data generation.
fn make_data(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let precip: Vec<f64> = (0..n)
        .map(|_| {
            let u = next_f64();
            if u < 0.8 {
                0.0
            } else {
                (u - 0.8) * 25.0
            }
        })
        .collect();
    let pet: Vec<f64> = (0..n).map(|_| next_f64() * 0.3).collect();
    (precip, pet)
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_metrics(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let mut results = Vec::new();

    for &n in sizes {
        let (observed, noise) = make_data(n, 7);
        let observed: Vec<f64> = observed.iter().map(|q| q + 1.0).collect();
        let simulated: Vec<f64> = observed.iter().zip(&noise).map(|(q, e)| q + e).collect();

        // Warmup
        black_box(score_all(&observed, &simulated));

        let dur = median_time(|| {
            black_box(score_all(&observed, &simulated));
        });
        results.push(("score_all", n, dur));
    }
    results
}

fn bench_smart(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let vector = ParameterVector::from_slice(&[
        1.0, 0.5, 0.1, 0.5, 0.005, 60.0, 24.0, 48.0, 2400.0, 12.0,
    ])
    .unwrap();
    let params = Parameters::from_vector(&vector).unwrap();
    let mut results = Vec::new();

    for &n in sizes {
        let (precip, pet) = make_data(n, 42);

        // Warmup
        black_box(run::run(&params, &precip, &pet, 1.0, None));

        let dur = median_time(|| {
            black_box(run::run(&params, &precip, &pet, 1.0, None));
        });
        results.push(("smart (hourly)", n, dur));
    }
    results
}

fn main() {
    println!("smartglue core benchmarks");
    println!("============================================================");
    println!("{:<18} {:>6}   {:>12}", "Target", "N", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();

    all_results.extend(bench_metrics(&[3650, 36500]));
    all_results.extend(bench_smart(&[8760, 87600]));

    for (target, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>6}      {:>8.2}", target, n, ms);
    }

    println!("============================================================");
}
