//! Discrete probability mass functions.
//!
//! A [`Pmf`] is the normalized form of a [`Hist`]: each distinct observed
//! value maps to its relative frequency, and the probabilities sum to 1.
//! It is built once and never mutated afterwards.
//!
//! # Moments
//!
//! | Quantity | Definition |
//! |---|---|
//! | mean | Σ p·x |
//! | variance | Σ p·(x − mean)² (population variance) |
//!
//! For an unweighted multiset these agree with
//! [`stats::mean`](crate::stats::mean) and
//! [`stats::population_variance`](crate::stats::population_variance) over
//! the raw values.

use crate::error::StatsError;
use crate::hist::{normalize_zero, Hist};
use crate::stats::kahan_sum_iter;

/// Probability mass function over distinct `f64` values.
///
/// # Examples
/// ```
/// use u_survey::pmf::Pmf;
/// let pmf = Pmf::from_observations(&[1.0, 2.0, 2.0, 3.0, 5.0]).unwrap();
/// assert!((pmf.prob(2.0) - 0.4).abs() < 1e-12);
/// assert!((pmf.mean() - 2.6).abs() < 1e-12);
/// assert!((pmf.total() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pmf {
    entries: Vec<(f64, f64)>,
}

impl Pmf {
    /// Builds a PMF by counting each distinct value and dividing by the
    /// number of observations.
    ///
    /// # Complexity
    /// Time: O(n log n) (dominated by sort), Space: O(n)
    ///
    /// # Errors
    /// - [`StatsError::EmptyInput`] if `observations` is empty.
    /// - [`StatsError::NonFinite`] if any observation is NaN or infinite.
    pub fn from_observations(observations: &[f64]) -> Result<Self, StatsError> {
        if observations.is_empty() {
            return Err(StatsError::EmptyInput("cannot build a PMF from no observations"));
        }
        Self::from_hist(&Hist::from_values(observations)?)
    }

    /// Normalizes a histogram into a PMF.
    ///
    /// # Errors
    /// [`StatsError::EmptyInput`] if the histogram counted nothing.
    pub fn from_hist(hist: &Hist) -> Result<Self, StatsError> {
        let total = hist.total();
        if total == 0 {
            return Err(StatsError::EmptyInput("cannot normalize an empty histogram"));
        }
        let n = total as f64;
        let entries = hist
            .iter()
            .map(|(value, count)| (value, count as f64 / n))
            .collect();
        Ok(Self { entries })
    }

    /// Probability of `value`; 0.0 if it was never observed.
    pub fn prob(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let probe = normalize_zero(value);
        self.entries
            .binary_search_by(|(v, _)| v.total_cmp(&probe))
            .map_or(0.0, |i| self.entries[i].1)
    }

    /// Σ(value × probability). 0.0 for an empty PMF.
    ///
    /// # Algorithm
    /// The weighted terms are added with Neumaier summation, so the result
    /// tracks [`stats::mean`](crate::stats::mean) over the raw values even
    /// when the values share a large offset.
    ///
    /// # Complexity
    /// Time: O(k) for k distinct values, Space: O(1)
    ///
    /// # Examples
    /// ```
    /// use u_survey::pmf::Pmf;
    /// let pmf = Pmf::from_observations(&[38.0, 39.0, 39.0, 40.0]).unwrap();
    /// assert!((pmf.mean() - 39.0).abs() < 1e-12);
    /// assert_eq!(Pmf::default().mean(), 0.0);
    /// ```
    pub fn mean(&self) -> f64 {
        kahan_sum_iter(self.entries.iter().map(|&(x, p)| p * x))
    }

    /// Σ(probability × (value − mean)²), with the mean from
    /// [`mean`](Self::mean). 0.0 for an empty PMF.
    ///
    /// This is the population variance under the PMF weighting; for an
    /// unweighted multiset it equals
    /// [`stats::population_variance`](crate::stats::population_variance)
    /// of the raw values.
    ///
    /// # Complexity
    /// Time: O(k) for k distinct values, Space: O(1)
    ///
    /// # Examples
    /// ```
    /// use u_survey::pmf::Pmf;
    /// let pmf = Pmf::from_observations(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert!((pmf.variance() - 4.0).abs() < 1e-12);
    /// ```
    pub fn variance(&self) -> f64 {
        let mu = self.mean();
        kahan_sum_iter(self.entries.iter().map(|&(x, p)| {
            let d = x - mu;
            p * d * d
        }))
    }

    /// Square root of [`variance`](Self::variance).
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Most probable value. Ties resolve to the smallest value.
    pub fn mode(&self) -> Option<f64> {
        let mut best: Option<(f64, f64)> = None;
        for &(x, p) in &self.entries {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((x, p));
            }
        }
        best.map(|(x, _)| x)
    }

    /// Sum of all probabilities; 1.0 up to rounding for a built PMF.
    pub fn total(&self) -> f64 {
        kahan_sum_iter(self.entries.iter().map(|&(_, p)| p))
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(value, probability)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
