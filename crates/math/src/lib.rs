#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/portopt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod statistics;
pub use statistics::{
    covariance_matrix, mean, mean_vector, sample_std, sample_variance, semi_covariance_matrix,
};

mod quantile;
pub use quantile::{percentile, tail_mean};

mod linalg;
pub use linalg::{OlsResult, RegressionFit, ordinary_least_squares, regress};

mod error;
pub use error::MathError;
