//! Deterministic single-index return universe shared by the integration tests.
#![allow(dead_code, unreachable_pub)]

use ndarray::{Array1, Array2};
use portopt_primitives::{BenchmarkSeries, ReturnSeries};

pub const PERIODS: usize = 36;
pub const SYMBOLS: [&str; 4] = ["ALFA", "BRVO", "CHRL", "DLTA"];

const DRIFT: [f64; 4] = [0.006, 0.009, 0.012, 0.004];
const BETA: [f64; 4] = [0.8, 1.0, 1.3, 0.5];
const IDIO: [f64; 4] = [0.02, 0.03, 0.04, 0.015];
const FREQUENCY: [f64; 4] = [1.1, 1.9, 2.3, 2.9];

pub fn market() -> Array1<f64> {
    Array1::from_shape_fn(PERIODS, |t| 0.004 + 0.01 * (0.7 * t as f64).sin())
}

pub fn benchmark() -> BenchmarkSeries {
    BenchmarkSeries::new("MKT", market())
}

pub fn returns() -> ReturnSeries {
    let m = market();
    let values = Array2::from_shape_fn((PERIODS, SYMBOLS.len()), |(t, j)| {
        let idiosyncratic = IDIO[j] * (FREQUENCY[j] * t as f64 + j as f64).sin();
        DRIFT[j] + BETA[j] * (m[t] - 0.004) + idiosyncratic
    });
    ReturnSeries::new(SYMBOLS, values).unwrap()
}
