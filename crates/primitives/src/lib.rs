#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/portopt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod asset;
pub use asset::Symbol;

mod returns;
pub use returns::{BenchmarkSeries, ReturnSeries};

mod weights;
pub use weights::WeightVector;

mod spec;
pub use spec::{ModelSpec, Objective, RiskMeasure};

mod program;
pub use program::{ConvexProgram, LinearConstraint, SolveStatus, Solution};

mod report;
pub use report::{MetricValue, PerformanceReport};

mod error;
pub use error::SeriesError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
