//! # u-survey
//!
//! Descriptive statistics over survey tables.
//!
//! The crate turns a materialized table of typed records into two kinds of
//! summaries: a discrete distribution of observed values, and the
//! distribution of within-group pairwise differences.
//!
//! ## Modules
//!
//! - [`hist`] — Value counts
//! - [`pmf`] — Probability mass functions with mean and variance
//! - [`stats`] — Raw-sequence moments used as reference values
//! - [`group`] — Grouping and first-minus-rest pairwise differences
//! - [`record`] — Typed pregnancy and respondent records
//! - [`load`] — CSV table loading (plain or gzip)
//! - [`config`] — Analysis options
//! - [`check`] — Fatal consistency checks
//! - [`report`] — Text tables and summaries
//!
//! ## Example
//!
//! ```
//! use indexmap::IndexMap;
//! use u_survey::group::{aggregate_group_differences, summary_statistics};
//!
//! let mut groups = IndexMap::new();
//! groups.insert(1, vec![39.0, 40.0]);
//! groups.insert(2, vec![38.0]);
//!
//! let diffs = aggregate_group_differences(&groups, 2);
//! assert_eq!(diffs, vec![-1.0]);
//!
//! let summary = summary_statistics(&diffs).unwrap();
//! assert_eq!(summary.mean, -1.0);
//! assert_eq!(summary.pmf.prob(-1.0), 1.0);
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod group;
pub mod hist;
pub mod load;
pub mod pmf;
pub mod record;
pub mod report;
pub mod stats;

pub use error::StatsError;
pub use pmf::Pmf;
