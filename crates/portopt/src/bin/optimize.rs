//! Portfolio optimization CLI tool.
//!
//! Runs every portfolio model on a wide returns CSV against a benchmark CSV
//! and prints each model's weights and annualized performance.
//!
//! Usage: `cargo run --features cli --bin optimize -- RETURNS.csv BENCHMARK.csv [options]`
//! Example: `cargo run --features cli --bin optimize -- stocks.csv spy.csv --target 0.01`

use std::{env, path::Path, str::FromStr};

use polars::prelude::*;
use portopt::{
    model::{PerformanceEvaluator, PortfolioOptimizer, TreynorPortfolio, treynor_portfolio},
    primitives::{BenchmarkSeries, ModelSpec, ReturnSeries, WeightVector},
    utils::{align_on_dates, split_aligned, weights_frame},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default name of the period column in both files.
const DEFAULT_DATE_COLUMN: &str = "date";

/// Default Sortino/Omega threshold.
const DEFAULT_THRESHOLD: f64 = 0.0;

/// Default CVaR confidence level.
const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Monthly data.
const DEFAULT_PERIODS_PER_YEAR: f64 = 12.0;

const USAGE: &str = "Usage: optimize RETURNS.csv BENCHMARK.csv [--date-column NAME] \
                     [--benchmark-column NAME] [--threshold H] [--confidence ALPHA] \
                     [--periods-per-year N] [--target R]";

/// Parsed command line.
struct Options {
    returns_path: String,
    benchmark_path: String,
    date_column: String,
    benchmark_column: Option<String>,
    threshold: f64,
    confidence: f64,
    periods_per_year: f64,
    target: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("{USAGE}");
        eprintln!("Example: optimize stocks.csv spy.csv --threshold 0 --confidence 0.95");
        std::process::exit(1);
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run(&options) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    Ok(Options {
        returns_path: args[1].clone(),
        benchmark_path: args[2].clone(),
        date_column: parse_flag(args, "--date-column")?
            .unwrap_or_else(|| DEFAULT_DATE_COLUMN.to_string()),
        benchmark_column: parse_flag(args, "--benchmark-column")?,
        threshold: parse_flag(args, "--threshold")?.unwrap_or(DEFAULT_THRESHOLD),
        confidence: parse_flag(args, "--confidence")?.unwrap_or(DEFAULT_CONFIDENCE),
        periods_per_year: parse_flag(args, "--periods-per-year")?
            .unwrap_or(DEFAULT_PERIODS_PER_YEAR),
        target: parse_flag(args, "--target")?,
    })
}

/// Value following `flag`, if the flag is present.
fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> Result<Option<T>, String> {
    let Some(position) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    let value = args.get(position + 1).ok_or_else(|| format!("{flag} needs a value"))?;
    value.parse().map(Some).map_err(|_| format!("invalid value '{value}' for {flag}"))
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let date_column = options.date_column.as_str();
    let returns_df = read_csv(Path::new(&options.returns_path))?;
    let benchmark_df = read_csv(Path::new(&options.benchmark_path))?;

    let benchmark_column = match &options.benchmark_column {
        Some(name) => name.clone(),
        None => benchmark_df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .find(|name| name != date_column)
            .ok_or("benchmark file has no value column")?,
    };
    let benchmark_df = benchmark_df.select([date_column, benchmark_column.as_str()])?;

    let aligned = align_on_dates(&returns_df, &benchmark_df, date_column)?;
    let (returns, benchmark) = split_aligned(&aligned, &benchmark_column, date_column)?;
    info!(
        periods = returns.n_periods(),
        assets = returns.n_assets(),
        benchmark = %benchmark.name(),
        "loaded aligned returns"
    );

    let models = model_list(options);
    let specs: Vec<ModelSpec> = models.iter().map(|(_, spec)| *spec).collect();
    let optimizer = PortfolioOptimizer::new();
    let evaluator = PerformanceEvaluator::new();

    for ((name, _), result) in models.iter().zip(optimizer.optimize_many(&returns, &specs)) {
        match result {
            Ok(allocation) => {
                let weights = &allocation.weights;
                print_allocation(name, weights, &returns, &benchmark, &evaluator, options)?;
            }
            Err(e) => println!("== {name} ==\nfailed: {e}\n"),
        }
    }

    match treynor_portfolio(&returns, &benchmark) {
        Ok(portfolio) => {
            print_ranking(&portfolio);
            let weights = &portfolio.weights;
            print_allocation("Treynor", weights, &returns, &benchmark, &evaluator, options)?;
        }
        Err(e) => println!("== Treynor ==\nfailed: {e}\n"),
    }

    Ok(())
}

fn model_list(options: &Options) -> Vec<(String, ModelSpec)> {
    let (h, alpha) = (options.threshold, options.confidence);
    let mut models = vec![
        ("Markowitz minimum variance".to_string(), ModelSpec::markowitz()),
        ("Sharpe tangency".to_string(), ModelSpec::sharpe()),
        ("Sortino minimum risk".to_string(), ModelSpec::sortino(h)),
        ("Sortino tangency".to_string(), ModelSpec::sortino_tangency(h)),
        ("Omega minimum risk".to_string(), ModelSpec::omega(h)),
        ("Omega tangency".to_string(), ModelSpec::omega_tangency(h)),
        ("CVaR minimum risk".to_string(), ModelSpec::cvar(alpha)),
        ("CVaR tangency".to_string(), ModelSpec::cvar_tangency(alpha)),
    ];
    if let Some(target) = options.target {
        models.extend([
            (format!("Markowitz frontier @ {target}"), ModelSpec::markowitz_frontier(target)),
            (format!("Sortino frontier @ {target}"), ModelSpec::sortino_frontier(target, h)),
            (format!("Omega frontier @ {target}"), ModelSpec::omega_frontier(target, h)),
            (format!("CVaR frontier @ {target}"), ModelSpec::cvar_frontier(target, alpha)),
        ]);
    }
    models
}

fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

fn print_allocation(
    name: &str,
    weights: &WeightVector,
    returns: &ReturnSeries,
    benchmark: &BenchmarkSeries,
    evaluator: &PerformanceEvaluator,
    options: &Options,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("== {name} ==");
    println!("{}", weights_frame(weights)?);
    match evaluator.evaluate_annualized(returns, benchmark, weights, options.periods_per_year) {
        Ok(report) => println!("{report}"),
        Err(e) => println!("performance unavailable: {e}\n"),
    }
    Ok(())
}

fn print_ranking(portfolio: &TreynorPortfolio) {
    println!("== Treynor ranking (cutoff C* = {:.6}) ==", portfolio.cutoff);
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>12} {:>10}",
        "symbol", "mean", "beta", "treynor", "cutoff C_k", "weight"
    );
    for asset in &portfolio.ranking {
        println!(
            "{:<10} {:>10.6} {:>10.4} {:>10.6} {:>12.6} {:>10.6}",
            asset.symbol.as_str(),
            asset.mean_return,
            asset.beta,
            asset.treynor_ratio,
            asset.cutoff_rate,
            portfolio.weights.values()[asset.column]
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Vec<String> {
        ["optimize", "stocks.csv", "spy.csv"].iter().chain(extra).map(ToString::to_string).collect()
    }

    #[test]
    fn defaults_apply_without_flags() {
        let options = parse_options(&args(&[])).unwrap();
        assert_eq!(options.date_column, DEFAULT_DATE_COLUMN);
        assert_eq!(options.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(options.periods_per_year, DEFAULT_PERIODS_PER_YEAR);
        assert!(options.benchmark_column.is_none());
        assert!(options.target.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let flags = ["--confidence", "0.99", "--target", "0.01", "--threshold", "-0.005"];
        let options = parse_options(&args(&flags)).unwrap();
        assert_eq!(options.confidence, 0.99);
        assert_eq!(options.target, Some(0.01));
        assert_eq!(options.threshold, -0.005);
    }

    #[test]
    fn malformed_number_is_reported() {
        let err = parse_options(&args(&["--confidence", "0,95"])).err().unwrap();
        assert!(err.contains("--confidence") && err.contains("0,95"), "{err}");
    }

    #[test]
    fn trailing_flag_without_value_is_reported() {
        let err = parse_options(&args(&["--target"])).err().unwrap();
        assert!(err.contains("--target"), "{err}");
    }
}
