#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/portopt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod builder;
pub use builder::ProgramBuilder;

mod solver;
pub use solver::{ClarabelSolver, SolverConfig};

mod postprocess;
pub use postprocess::{PostProcessConfig, WeightPostProcessor, normalize, round_weights};

mod optimizer;
pub use optimizer::{Allocation, FrontierPoint, OptimizerConfig, PortfolioOptimizer};

mod treynor;
pub use treynor::{AssetRanking, TreynorPortfolio, treynor_portfolio};

mod performance;
pub use performance::{
    MONTHS_PER_YEAR, PerformanceConfig, PerformanceEvaluator, portfolio_returns, wealth_curve,
};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use portopt_primitives::{
        BenchmarkSeries, ModelSpec, Objective, PerformanceReport, ReturnSeries, RiskMeasure,
        WeightVector,
    };
    pub use portopt_traits::ConvexSolver;

    pub use super::{
        Allocation, ModelError, OptimizerConfig, PerformanceEvaluator, PortfolioOptimizer,
        treynor_portfolio,
    };
}
