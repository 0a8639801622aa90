//! Linear Kalman filtering over statically sized state spaces.
//!
//! This crate implements the discrete linear Kalman filter on top of
//! `nalgebra`'s const-generic matrices, so state, measurement, and control
//! dimensions are checked at compile time. The design keeps a strict
//! separation:
//!
//! - **[`filter`]**: the filter itself. [`KalmanFilter::predict`] and
//!   [`KalmanFilter::update`] are pure transition functions over
//!   `(state, covariance)` pairs; [`KalmanFilter::step`] and
//!   [`KalmanFilter::advance`] commit their results to the stored belief.
//! - **[`estimate`]**: the belief representation ([`Estimate`]) the filter
//!   carries between steps.
//! - **[`alias`]**: the dimensioned type vocabulary (state vectors,
//!   covariance and model matrices) shared by every operation.
//!
//! The crate is deterministic and free of I/O; orchestration, logging, and
//! persistence belong to its consumers (see the `filter_lab` workspace
//! member).

pub mod alias;
pub mod error;
pub mod estimate;
pub mod filter;

pub use alias::{
    Covariance, CurrentState, InputModel, InputVector, Measurement, MeasurementModel,
    MeasurementNoise, Observation, State, TransitionModel, TransitionNoise,
};
pub use error::FilterError;
pub use estimate::Estimate;
pub use filter::KalmanFilter;
