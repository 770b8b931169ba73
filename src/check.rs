//! Consistency checks.
//!
//! Each check either passes silently or returns a [`CheckError`] that the
//! caller is expected to treat as fatal.

use crate::config::ExpectedCounts;
use crate::error::StatsError;
use crate::hist::Hist;
use crate::pmf::Pmf;
use crate::record::RespondentRecord;
use crate::stats;
use thiserror::Error;

/// A computed quantity disagreed with its expected value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("{name}: expected {expected}, got {actual} (tolerance {tolerance})")]
    ValueMismatch {
        name: String,
        expected: f64,
        actual: f64,
        tolerance: f64,
    },

    #[error("{name}: expected {expected}, got {actual}")]
    CountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Stats(#[from] StatsError),
}

type Result<T> = core::result::Result<T, CheckError>;

/// Fails unless `|expected − actual| <= tolerance × max(|expected|, 1)`.
///
/// The tolerance is relative for magnitudes above 1 and absolute below, so
/// the same setting works for a mean near zero and a variance in the
/// thousands.
///
/// # Examples
/// ```
/// use u_survey::check::check_close;
/// assert!(check_close("variance", 6256.3317681, 6256.3317692, 1e-9).is_ok());
/// assert!(check_close("mean", 0.0, 1e-6, 1e-9).is_err());
/// ```
pub fn check_close(name: &str, expected: f64, actual: f64, tolerance: f64) -> Result<()> {
    if (expected - actual).abs() <= tolerance * expected.abs().max(1.0) {
        Ok(())
    } else {
        Err(CheckError::ValueMismatch {
            name: name.to_string(),
            expected,
            actual,
            tolerance,
        })
    }
}

fn check_count(name: String, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(CheckError::CountMismatch {
            name,
            expected,
            actual,
        })
    }
}

/// PMF mean and variance must match the raw-sequence mean and population
/// variance of the observations the PMF was built from.
pub fn verify_pmf_moments(observations: &[f64], pmf: &Pmf, tolerance: f64) -> Result<()> {
    check_close("PMF mean", stats::mean(observations)?, pmf.mean(), tolerance)?;
    check_close(
        "PMF variance",
        stats::population_variance(observations)?,
        pmf.variance(),
        tolerance,
    )
}

/// Checks the respondent count and the `pregnum` value counts.
pub fn verify_respondents(records: &[RespondentRecord], expected: &ExpectedCounts) -> Result<()> {
    if let Some(count) = expected.records {
        check_count("respondent records".to_string(), count, records.len())?;
    }
    if expected.value_counts.is_empty() {
        return Ok(());
    }
    let pregnum: Vec<f64> = records.iter().map(|r| f64::from(r.pregnum)).collect();
    let hist = Hist::from_values(&pregnum)?;
    for entry in &expected.value_counts {
        check_count(
            format!("respondents with pregnum = {}", entry.value),
            entry.count,
            hist.freq(entry.value),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpectedValueCount;

    fn respondents(pregnums: &[u32]) -> Vec<RespondentRecord> {
        pregnums
            .iter()
            .enumerate()
            .map(|(i, &pregnum)| RespondentRecord {
                caseid: i as u64,
                pregnum,
            })
            .collect()
    }

    #[test]
    fn test_check_close() {
        assert!(check_close("x", 1.0, 1.0 + 1e-12, 1e-9).is_ok());
        let err = check_close("x", 1.0, 1.1, 1e-9).unwrap_err();
        assert!(matches!(err, CheckError::ValueMismatch { .. }));
        assert!(err.to_string().starts_with("x: expected 1"));
    }

    #[test]
    fn test_verify_pmf_moments_passes() {
        let weeks = [39.0, 40.0, 38.0, 39.0, 43.0];
        let pmf = Pmf::from_observations(&weeks).unwrap();
        assert!(verify_pmf_moments(&weeks, &pmf, 1e-9).is_ok());
    }

    #[test]
    fn test_check_close_scales_with_magnitude() {
        assert!(check_close("x", 1e6, 1e6 + 1e-4, 1e-9).is_ok());
        assert!(check_close("x", 1e6, 1e6 + 1e-2, 1e-9).is_err());
        assert!(check_close("x", 1e-3, 1e-3 + 2e-9, 1e-9).is_err());
    }

    #[test]
    fn test_verify_pmf_moments_large_magnitude() {
        let observations: Vec<f64> = (0..2000).map(|i| 1e6 + 0.137 * i as f64 + 0.1).collect();
        let pmf = Pmf::from_observations(&observations).unwrap();
        assert_eq!(verify_pmf_moments(&observations, &pmf, 1e-9), Ok(()));
    }

    #[test]
    fn test_verify_pmf_moments_detects_mismatch() {
        let pmf = Pmf::from_observations(&[39.0, 40.0]).unwrap();
        let err = verify_pmf_moments(&[30.0, 40.0], &pmf, 1e-9).unwrap_err();
        assert!(matches!(err, CheckError::ValueMismatch { ref name, .. } if name == "PMF mean"));
    }

    #[test]
    fn test_verify_pmf_moments_empty() {
        let err = verify_pmf_moments(&[], &Pmf::default(), 1e-9).unwrap_err();
        assert!(matches!(err, CheckError::Stats(StatsError::EmptyInput(_))));
    }

    #[test]
    fn test_verify_respondents() {
        let records = respondents(&[0, 1, 1, 2, 0, 1]);
        let expected = ExpectedCounts {
            records: Some(6),
            value_counts: vec![
                ExpectedValueCount {
                    value: 1.0,
                    count: 3,
                },
                ExpectedValueCount {
                    value: 7.0,
                    count: 0,
                },
            ],
        };
        assert!(verify_respondents(&records, &expected).is_ok());
    }

    #[test]
    fn test_verify_respondents_mismatch() {
        let records = respondents(&[0, 1, 2]);
        let wrong_total = ExpectedCounts {
            records: Some(7643),
            value_counts: Vec::new(),
        };
        assert_eq!(
            verify_respondents(&records, &wrong_total),
            Err(CheckError::CountMismatch {
                name: "respondent records".to_string(),
                expected: 7643,
                actual: 3,
            })
        );

        let wrong_count = ExpectedCounts {
            records: None,
            value_counts: vec![ExpectedValueCount {
                value: 1.0,
                count: 1267,
            }],
        };
        assert!(matches!(
            verify_respondents(&records, &wrong_count),
            Err(CheckError::CountMismatch { actual: 1, .. })
        ));
    }
}
