//! Filter error type.

use thiserror::Error;

/// Errors a filter step can produce.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FilterError {
    /// Prediction was asked to advance by a non-positive or non-finite
    /// interval.
    #[error("time step must be positive and finite, got {dt}")]
    InvalidTimeStep { dt: f64 },

    /// The innovation covariance was not invertible, so no Kalman gain
    /// exists for the observation.
    #[error("innovation covariance is not invertible")]
    SingularInnovation,
}
