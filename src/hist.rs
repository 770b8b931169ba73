//! Value counts.
//!
//! A [`Hist`] maps each distinct value of an observation set to the number
//! of times it occurs. Entries are kept sorted ascending by value, so
//! iteration order is deterministic regardless of input order.

use crate::error::{ensure_finite, StatsError};

/// Frequency table over distinct `f64` values.
///
/// # Examples
/// ```
/// use u_survey::hist::Hist;
/// let hist = Hist::from_values(&[1.0, 2.0, 2.0, 3.0, 5.0]).unwrap();
/// assert_eq!(hist.freq(2.0), 2);
/// assert_eq!(hist.freq(4.0), 0);
/// assert_eq!(hist.total(), 5);
/// assert_eq!(hist.mode(), Some(2.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hist {
    entries: Vec<(f64, usize)>,
    total: usize,
}

impl Hist {
    /// Counts the occurrences of each distinct value.
    ///
    /// `-0.0` and `0.0` are counted as the same value. An empty slice
    /// gives an empty histogram.
    ///
    /// # Errors
    /// [`StatsError::NonFinite`] if any value is NaN or infinite.
    pub fn from_values(values: &[f64]) -> Result<Self, StatsError> {
        ensure_finite(values)?;
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let mut entries: Vec<(f64, usize)> = Vec::new();
        for x in sorted {
            match entries.last_mut() {
                Some((value, count)) if *value == x => *count += 1,
                _ => entries.push((normalize_zero(x), 1)),
            }
        }

        Ok(Self {
            entries,
            total: values.len(),
        })
    }

    /// Number of occurrences of `value`; 0 if it never occurred.
    pub fn freq(&self, value: f64) -> usize {
        self.position(value).map_or(0, |i| self.entries[i].1)
    }

    /// Total number of observations counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(value, count)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Most frequent value. Ties resolve to the smallest value.
    pub fn mode(&self) -> Option<f64> {
        let mut best: Option<(f64, usize)> = None;
        for &(value, count) in &self.entries {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }

    /// The `n` largest values with their counts, largest first.
    pub fn largest(&self, n: usize) -> Vec<(f64, usize)> {
        self.entries.iter().rev().take(n).copied().collect()
    }

    /// The `n` smallest values with their counts, smallest first.
    pub fn smallest(&self, n: usize) -> Vec<(f64, usize)> {
        self.entries.iter().take(n).copied().collect()
    }

    fn position(&self, value: f64) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }
        let probe = normalize_zero(value);
        self.entries
            .binary_search_by(|(v, _)| v.total_cmp(&probe))
            .ok()
    }
}

/// Maps `-0.0` to `0.0` so both zeros share one key.
pub(crate) fn normalize_zero(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sorted_by_value() {
        let hist = Hist::from_values(&[40.0, 39.0, 39.0, 38.0, 39.0]).unwrap();
        let entries: Vec<_> = hist.iter().collect();
        assert_eq!(entries, vec![(38.0, 1), (39.0, 3), (40.0, 1)]);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.len(), 3);
    }

    #[test]
    fn test_empty() {
        let hist = Hist::from_values(&[]).unwrap();
        assert!(hist.is_empty());
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.mode(), None);
        assert_eq!(hist.freq(1.0), 0);
    }

    #[test]
    fn test_rejects_nan() {
        assert!(matches!(
            Hist::from_values(&[1.0, f64::NAN]),
            Err(StatsError::NonFinite(_))
        ));
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        let hist = Hist::from_values(&[-0.0, 0.0, 0.0]).unwrap();
        assert_eq!(hist.len(), 1);
        assert_eq!(hist.freq(0.0), 3);
        assert_eq!(hist.freq(-0.0), 3);
    }

    #[test]
    fn test_mode_tie_picks_smallest() {
        let hist = Hist::from_values(&[3.0, 1.0, 3.0, 1.0, 2.0]).unwrap();
        assert_eq!(hist.mode(), Some(1.0));
    }

    #[test]
    fn test_largest_smallest() {
        let hist = Hist::from_values(&[0.0, 1.0, 1.0, 2.0, 17.0, 50.0]).unwrap();
        assert_eq!(hist.largest(2), vec![(50.0, 1), (17.0, 1)]);
        assert_eq!(hist.smallest(2), vec![(0.0, 1), (1.0, 2)]);
        assert_eq!(hist.smallest(10).len(), 5);
    }
}
