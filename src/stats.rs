//! Raw-sequence moments.
//!
//! These are the reference values a [`Pmf`](crate::pmf::Pmf) is checked
//! against: the PMF-weighted mean and variance of an unweighted multiset
//! must agree with the plain arithmetic mean and population variance
//! computed here.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier (improved Kahan) compensated summation.
//! - **Variance**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).

use crate::error::{ensure_finite, StatsError};

type Result<T> = core::result::Result<T, StatsError>;

/// Arithmetic mean of `data`.
///
/// # Algorithm
/// Neumaier summation of the values, divided by `n`.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Errors
/// - [`StatsError::EmptyInput`] if `data` is empty.
/// - [`StatsError::NonFinite`] if any value is NaN or infinite.
///
/// # Examples
/// ```
/// use u_survey::stats::mean;
/// let weeks = [39.0, 40.0, 38.0, 39.0];
/// assert!((mean(&weeks).unwrap() - 39.0).abs() < 1e-12);
/// assert!(mean(&[]).is_err());
/// ```
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(StatsError::EmptyInput("mean of an empty sequence"));
    }
    ensure_finite(data)?;
    Ok(kahan_sum(data) / data.len() as f64)
}

/// Population variance (denominator `n`).
///
/// This is the quantity a PMF built from the same values reports as its
/// variance, not the Bessel-corrected sample variance.
///
/// # Algorithm
/// Welford's single-pass update, which avoids the cancellation of the
/// naive `E[X²] − (E[X])²` formula when the mean is large.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Errors
/// - [`StatsError::EmptyInput`] if `data` is empty.
/// - [`StatsError::NonFinite`] if any value is NaN or infinite.
///
/// # Examples
/// ```
/// use u_survey::stats::population_variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
/// assert_eq!(population_variance(&[39.0]), Ok(0.0));
/// ```
pub fn population_variance(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(StatsError::EmptyInput(
            "population variance of an empty sequence",
        ));
    }
    ensure_finite(data)?;
    let mut acc = Welford::default();
    for &x in data {
        acc.update(x);
    }
    Ok(acc.population_variance())
}

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation.
///
/// Keeps a running compensation term so the low-order bits of the smaller
/// operand survive each addition, giving O(ε) error independent of `n`.
///
/// Reference: Neumaier (1974), *ZAMM* 54(1), pp. 39–51.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Examples
/// ```
/// use u_survey::stats::kahan_sum;
/// assert_eq!(kahan_sum(&[1e16, 1.0, -1e16]), 1.0);
/// ```
pub fn kahan_sum(data: &[f64]) -> f64 {
    kahan_sum_iter(data.iter().copied())
}

/// [`kahan_sum`] over an iterator, for sums of derived terms.
pub(crate) fn kahan_sum_iter(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford accumulator
// ---------------------------------------------------------------------------

/// Running mean and sum of squared deviations.
#[derive(Debug, Default)]
struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Callers guarantee at least one update.
    fn population_variance(&self) -> f64 {
        self.m2 / self.count as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
