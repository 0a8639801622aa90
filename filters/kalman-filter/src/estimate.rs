//! Belief representation carried by the filter between steps.

use crate::alias::{Covariance, CurrentState, State};

/// A state estimate together with its covariance: the filter's belief.
///
/// The filter stores one of these internally and commits a new one after
/// every [`step`](crate::KalmanFilter::step) or
/// [`advance`](crate::KalmanFilter::advance). With the `serde` feature the
/// belief can be persisted and restored, so a filter can resume where a
/// previous process left off.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimate<const N: usize> {
    state: State<N>,
    covariance: Covariance<N>,
}

impl<const N: usize> Estimate<N> {
    pub fn new(state: State<N>, covariance: Covariance<N>) -> Self {
        Estimate { state, covariance }
    }

    /// The estimated state vector.
    pub fn state(&self) -> State<N> {
        self.state
    }

    /// The covariance of the estimate.
    pub fn covariance(&self) -> Covariance<N> {
        self.covariance
    }

    /// Split the belief into the tuple form the pure transition functions
    /// operate on.
    pub fn into_parts(self) -> CurrentState<N> {
        (self.state, self.covariance)
    }
}

/// Uninformative prior: zero state with identity covariance.
impl<const N: usize> Default for Estimate<N> {
    fn default() -> Self {
        Estimate {
            state: State::zeros(),
            covariance: Covariance::identity(),
        }
    }
}

impl<const N: usize> From<CurrentState<N>> for Estimate<N> {
    fn from((state, covariance): CurrentState<N>) -> Self {
        Estimate { state, covariance }
    }
}

impl<const N: usize> From<Estimate<N>> for CurrentState<N> {
    fn from(estimate: Estimate<N>) -> Self {
        estimate.into_parts()
    }
}
