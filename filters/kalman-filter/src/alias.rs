//! Dimensioned type vocabulary for the filter.
//!
//! Every quantity the filter touches is an alias over a statically sized
//! `nalgebra` matrix, so mismatched model and measurement dimensions are
//! rejected at compile time rather than at runtime.

use nalgebra::{SMatrix, SVector};

/// State vector with `N` dimensions.
pub type State<const N: usize> = SVector<f64, N>;

/// Covariance of a state estimate.
pub type Covariance<const N: usize> = SMatrix<f64, N, N>;

/// A `(state, covariance)` pair: the currency of the pure transition
/// functions ([`crate::KalmanFilter::predict`] and
/// [`crate::KalmanFilter::update`]).
pub type CurrentState<const N: usize> = (State<N>, Covariance<N>);

/// State transition matrix. Scaled by the step duration during prediction.
pub type TransitionModel<const N: usize> = SMatrix<f64, N, N>;

/// Process noise covariance added to the state covariance each prediction.
pub type TransitionNoise<const N: usize> = SMatrix<f64, N, N>;

/// Measurement vector with `M` dimensions.
pub type Measurement<const M: usize> = SVector<f64, M>;

/// Observation matrix mapping state space into measurement space.
pub type MeasurementModel<const M: usize, const N: usize> = SMatrix<f64, M, N>;

/// Measurement noise covariance attached to a single reading.
pub type MeasurementNoise<const M: usize> = SMatrix<f64, M, M>;

/// One sensor reading together with its noise covariance.
pub type Observation<const M: usize> = (Measurement<M>, MeasurementNoise<M>);

/// Control input matrix mapping inputs into state space.
pub type InputModel<const N: usize, const U: usize> = SMatrix<f64, N, U>;

/// Control input vector with `U` dimensions.
pub type InputVector<const U: usize> = SVector<f64, U>;
