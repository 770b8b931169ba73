//! Error types shared by the statistics modules.

use thiserror::Error;

/// Errors produced while summarizing observation or difference sets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// A required observation or difference set was empty.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// An observation was NaN or infinite.
    #[error("non-finite observation: {0}")]
    NonFinite(f64),
}

pub(crate) fn ensure_finite(data: &[f64]) -> Result<(), StatsError> {
    match data.iter().find(|x| !x.is_finite()) {
        Some(&x) => Err(StatsError::NonFinite(x)),
        None => Ok(()),
    }
}
