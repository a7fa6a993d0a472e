#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/portopt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod convert;
pub use convert::{benchmark_from_frame, returns_from_frame, weights_frame};

mod align;
pub use align::{align_on_dates, split_aligned};

mod error;
pub use error::UtilsError;
