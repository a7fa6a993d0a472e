//! # portopt
//!
//! Long-only portfolio construction and evaluation on historical returns.
//!
//! This crate provides a unified interface to the portopt crates.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Return series, weights, model selection and report types
//! - `traits`: The `ConvexSolver` abstraction
//! - `math`: Return statistics, percentiles and regression
//! - `model`: Optimizer, Treynor ranking and performance evaluation
//! - `utils`: Polars data adapters
//! - `cli`: The `optimize` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use portopt::model::prelude::*;
//!
//! let optimizer = PortfolioOptimizer::new();
//! let sharpe = optimizer.optimize(&returns, &ModelSpec::sharpe())?;
//! let treynor = treynor_portfolio(&returns, &benchmark)?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use portopt_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use portopt_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use portopt_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use portopt_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use portopt_utils as utils;

