//! Grouped pairwise differences.
//!
//! Records are grouped by an identifier (a respondent's `caseid`), each
//! group yields its values in encounter order, and every qualifying group
//! contributes `first − x` for each later value `x`. The flattened
//! differences are then summarized as a mean plus a [`Pmf`].
//!
//! Groups are kept in an [`IndexMap`] so iteration follows the order in
//! which identifiers were first seen, and the aggregated difference set is
//! reproducible for a given input order.

use crate::config::AnalysisConfig;
use crate::error::StatsError;
use crate::pmf::Pmf;
use crate::record::PregnancyRecord;
use crate::stats;
use indexmap::IndexMap;
use log::{debug, warn};
use std::hash::Hash;

type Result<T> = core::result::Result<T, StatsError>;

/// Mean and distribution of a difference set.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceSummary {
    pub mean: f64,
    pub pmf: Pmf,
    /// Number of differences summarized.
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Partitions `records` by `key`, returning row indices per group.
///
/// Groups appear in first-encounter order and indices within a group are
/// ascending.
///
/// # Complexity
/// Time: O(n) expected, Space: O(n)
///
/// # Examples
/// ```
/// use u_survey::group::group_by;
/// let rows = [("a", 1), ("b", 2), ("a", 3)];
/// let groups = group_by(&rows, |r| r.0);
/// assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
/// assert_eq!(groups[&"a"], vec![0, 2]);
/// ```
pub fn group_by<R, K, F>(records: &[R], key: F) -> IndexMap<K, Vec<usize>>
where
    K: Hash + Eq,
    F: Fn(&R) -> K,
{
    let mut groups: IndexMap<K, Vec<usize>> = IndexMap::new();
    for (index, record) in records.iter().enumerate() {
        groups.entry(key(record)).or_default().push(index);
    }
    groups
}

/// Maps each respondent to the row indices of their pregnancies.
pub fn make_preg_map(records: &[PregnancyRecord]) -> IndexMap<u64, Vec<usize>> {
    group_by(records, |r| r.caseid)
}

/// Keeps the records whose `field` is at least `min_valid_value`.
///
/// The bound is inclusive and record order is preserved. Dropping every
/// row is not an error here, but is logged at `warn`.
///
/// # Complexity
/// Time: O(n), Space: O(k) for the k rows kept
///
/// # Examples
/// ```
/// use u_survey::group::filter_min_value;
/// let weeks = [36.0, 37.0, 39.0, 20.0];
/// assert_eq!(filter_min_value(&weeks, |w| *w, 37.0), vec![37.0, 39.0]);
/// ```
pub fn filter_min_value<R, F>(records: &[R], field: F, min_valid_value: f64) -> Vec<R>
where
    R: Clone,
    F: Fn(&R) -> f64,
{
    let kept: Vec<R> = records
        .iter()
        .filter(|&r| field(r) >= min_valid_value)
        .cloned()
        .collect();
    debug!(
        "filter >= {min_valid_value}: kept {} of {} rows",
        kept.len(),
        records.len()
    );
    if kept.is_empty() && !records.is_empty() {
        warn!("filter >= {min_valid_value} dropped every row");
    }
    kept
}

/// Resolves grouped row indices into per-group value sequences.
///
/// Group order and the order of values within each group follow `groups`.
/// Every index in `groups` must be in bounds for `records`, which holds for
/// any map [`group_by`] built over the same slice.
///
/// # Examples
/// ```
/// use u_survey::group::{group_by, group_values};
/// let rows = [(7, 39.0), (3, 40.0), (7, 41.0)];
/// let groups = group_by(&rows, |r| r.0);
/// let values = group_values(&rows, &groups, |r| r.1);
/// assert_eq!(values[&7], vec![39.0, 41.0]);
/// assert_eq!(values[&3], vec![40.0]);
/// ```
pub fn group_values<R, K, F>(
    records: &[R],
    groups: &IndexMap<K, Vec<usize>>,
    field: F,
) -> IndexMap<K, Vec<f64>>
where
    K: Hash + Eq + Clone,
    F: Fn(&R) -> f64,
{
    groups
        .iter()
        .map(|(key, indices)| {
            let values: Vec<f64> = indices.iter().map(|&i| field(&records[i])).collect();
            (key.clone(), values)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Differences
// ---------------------------------------------------------------------------

/// Differences between the first value and each later value.
///
/// # Errors
/// [`StatsError::EmptyInput`] if `values` is empty.
///
/// # Examples
/// ```
/// use u_survey::group::pairwise_differences;
/// assert_eq!(pairwise_differences(&[5.0, 3.0, 1.0]).unwrap(), vec![2.0, 4.0]);
/// assert!(pairwise_differences(&[7.0]).unwrap().is_empty());
/// ```
pub fn pairwise_differences(values: &[f64]) -> Result<Vec<f64>> {
    let (first, others) = values
        .split_first()
        .ok_or(StatsError::EmptyInput("pairwise differences need a first value"))?;
    Ok(others.iter().map(|x| first - x).collect())
}

/// Concatenates the pairwise differences of every group with at least
/// `min_group_size` values (and never fewer than 2).
///
/// Output is grouped in map order, then in value order within a group.
/// Returns an empty vector when no group qualifies.
///
/// # Complexity
/// Time: O(n) over all grouped values, Space: O(n)
///
/// # Examples
/// ```
/// use indexmap::IndexMap;
/// use u_survey::group::aggregate_group_differences;
/// let mut groups = IndexMap::new();
/// groups.insert(1, vec![39.0, 40.0, 37.0]);
/// groups.insert(2, vec![38.0]);
/// assert_eq!(aggregate_group_differences(&groups, 2), vec![-1.0, 2.0]);
/// assert!(aggregate_group_differences(&groups, 4).is_empty());
/// ```
pub fn aggregate_group_differences<K>(
    groups: &IndexMap<K, Vec<f64>>,
    min_group_size: usize,
) -> Vec<f64> {
    let min_len = min_group_size.max(2);
    let mut diffs = Vec::new();
    for values in groups.values().filter(|v| v.len() >= min_len) {
        // Qualifying groups are never empty.
        if let Ok(group_diffs) = pairwise_differences(values) {
            diffs.extend(group_diffs);
        }
    }
    diffs
}

/// Mean and PMF of a difference set.
///
/// The mean is the raw-sequence mean of `diffs`, so it matches
/// `pmf.mean()` up to rounding.
///
/// # Complexity
/// Time: O(n log n) (building the PMF), Space: O(n)
///
/// # Errors
/// - [`StatsError::EmptyInput`] if `diffs` is empty, i.e. no group qualified.
/// - [`StatsError::NonFinite`] if any difference is NaN or infinite.
///
/// # Examples
/// ```
/// use u_survey::group::summary_statistics;
/// let summary = summary_statistics(&[-1.0, 1.0, 1.0, 3.0]).unwrap();
/// assert_eq!(summary.count, 4);
/// assert_eq!(summary.mean, 1.0);
/// assert_eq!(summary.pmf.prob(1.0), 0.5);
/// assert!(summary_statistics(&[]).is_err());
/// ```
pub fn summary_statistics(diffs: &[f64]) -> Result<DifferenceSummary> {
    if diffs.is_empty() {
        return Err(StatsError::EmptyInput("no qualifying groups"));
    }
    Ok(DifferenceSummary {
        mean: stats::mean(diffs)?,
        pmf: Pmf::from_observations(diffs)?,
        count: diffs.len(),
    })
}

// ---------------------------------------------------------------------------
// Pregnancy-length pipeline
// ---------------------------------------------------------------------------

/// Pregnancy-length differences between each respondent's first and later
/// pregnancies.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseReport {
    pub summary: DifferenceSummary,
    /// Respondents that contributed at least one difference.
    pub qualifying_groups: usize,
}

/// Runs filter → group → differences → summary over `prglngth`.
///
/// # Errors
/// [`StatsError::EmptyInput`] if no respondent has enough pregnancies left
/// after filtering.
pub fn pairwise_length_differences(
    records: &[PregnancyRecord],
    config: &AnalysisConfig,
) -> Result<PairwiseReport> {
    let kept = filter_min_value(records, |r| r.prglngth, config.min_valid_value);
    let groups = make_preg_map(&kept);
    let lengths = group_values(&kept, &groups, |r| r.prglngth);

    let min_len = config.effective_min_group_size();
    let qualifying_groups = lengths.values().filter(|v| v.len() >= min_len).count();
    debug!(
        "{} respondents, {qualifying_groups} with at least {min_len} pregnancies",
        groups.len()
    );

    let diffs = aggregate_group_differences(&lengths, min_len);
    Ok(PairwiseReport {
        summary: summary_statistics(&diffs)?,
        qualifying_groups,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
