//! Discrete linear Kalman filter.
//!
//! [`predict`](KalmanFilter::predict) and [`update`](KalmanFilter::update)
//! are pure functions over `(state, covariance)` pairs and never touch the
//! filter's stored belief; [`step`](KalmanFilter::step) and
//! [`advance`](KalmanFilter::advance) compose them and commit the result.
//! A failed step leaves the stored belief exactly as it was.

use crate::alias::{
    Covariance, CurrentState, InputModel, InputVector, MeasurementModel, Observation, State,
    TransitionModel, TransitionNoise,
};
use crate::error::FilterError;
use crate::estimate::Estimate;

/// Linear Kalman filter over `N` state dimensions, `M` measurement
/// dimensions, and `U` control input dimensions.
///
/// The transition model is specified per unit of time and scaled by the
/// elapsed interval on every prediction; with `dt = 1` the stored model is
/// applied as-is. Process noise is added once per prediction, measurement
/// noise travels with each [`Observation`].
///
/// ```
/// use kalman_filter::{
///     KalmanFilter, Measurement, MeasurementModel, MeasurementNoise, TransitionModel,
///     TransitionNoise,
/// };
///
/// let mut filter: KalmanFilter = KalmanFilter::new(
///     TransitionModel::<1>::identity(),
///     MeasurementModel::<1, 1>::identity(),
///     TransitionNoise::<1>::identity() * 0.01,
/// );
///
/// let observation = (
///     Measurement::<1>::new(1.2),
///     MeasurementNoise::<1>::identity() * 0.1,
/// );
/// let (state, _covariance) = filter.step(1.0, observation, None)?;
/// assert!(state[0] > 0.0);
/// # Ok::<(), kalman_filter::FilterError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanFilter<const N: usize = 1, const M: usize = 1, const U: usize = 1> {
    transition_model: TransitionModel<N>,
    measurement_model: MeasurementModel<M, N>,
    transition_noise: TransitionNoise<N>,
    input_model: InputModel<N, U>,
    estimate: Estimate<N>,
}

impl<const N: usize, const M: usize, const U: usize> Default for KalmanFilter<N, M, U> {
    fn default() -> Self {
        KalmanFilter {
            transition_model: TransitionModel::identity(),
            measurement_model: MeasurementModel::zeros(),
            transition_noise: TransitionNoise::identity(),
            input_model: InputModel::zeros(),
            estimate: Estimate::default(),
        }
    }
}

impl<const N: usize, const M: usize, const U: usize> KalmanFilter<N, M, U> {
    /// Create a filter with an uninformative prior (zero state, identity
    /// covariance) and no control input.
    pub fn new(
        transition_model: TransitionModel<N>,
        measurement_model: MeasurementModel<M, N>,
        transition_noise: TransitionNoise<N>,
    ) -> Self {
        KalmanFilter {
            transition_model,
            measurement_model,
            transition_noise,
            input_model: InputModel::zeros(),
            estimate: Estimate::default(),
        }
    }

    /// Override the initial belief.
    pub fn with_state(mut self, state: State<N>, covariance: Covariance<N>) -> Self {
        self.estimate = Estimate::new(state, covariance);
        self
    }

    /// Attach a control input matrix.
    pub fn with_input_model(mut self, model: InputModel<N, U>) -> Self {
        self.input_model = model;
        self
    }

    /// The current state estimate.
    pub fn state(&self) -> State<N> {
        self.estimate.state()
    }

    /// The covariance of the current estimate.
    pub fn covariance(&self) -> Covariance<N> {
        self.estimate.covariance()
    }

    /// The current belief as one value.
    pub fn estimate(&self) -> Estimate<N> {
        self.estimate
    }

    /// A-priori step: propagate a belief through the motion model.
    ///
    /// Scales the transition model by `dt`, applies the control input (zero
    /// when `input` is `None`), and inflates the covariance by the process
    /// noise. Pure: the filter's stored belief is untouched.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidTimeStep`] when `dt` is non-positive or not
    /// finite.
    pub fn predict(
        &self,
        current: CurrentState<N>,
        dt: f64,
        input: Option<InputVector<U>>,
    ) -> Result<CurrentState<N>, FilterError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(FilterError::InvalidTimeStep { dt });
        }

        let (state, covariance) = current;
        let transition = self.transition_model * dt;
        let controlled = self.input_model * input.unwrap_or_else(InputVector::zeros);

        let state = transition * state + controlled;
        let covariance = transition * covariance * transition.transpose() + self.transition_noise;

        Ok((state, covariance))
    }

    /// A-posteriori step: correct a predicted belief with an observation.
    ///
    /// Computes the innovation `z - H·x`, weighs it by the Kalman gain, and
    /// contracts the covariance accordingly. Pure: the filter's stored
    /// belief is untouched.
    ///
    /// # Errors
    ///
    /// [`FilterError::SingularInnovation`] when the innovation covariance
    /// `H·P·Hᵀ + R` cannot be inverted.
    pub fn update(
        &self,
        current: CurrentState<N>,
        observation: Observation<M>,
    ) -> Result<CurrentState<N>, FilterError> {
        let (state, covariance) = current;
        let (measurement, noise) = observation;

        let innovation = measurement - self.measurement_model * state;
        let innovation_covariance =
            self.measurement_model * covariance * self.measurement_model.transpose() + noise;

        let gain = match innovation_covariance.try_inverse() {
            Some(inverse) => covariance * self.measurement_model.transpose() * inverse,
            None => return Err(FilterError::SingularInnovation),
        };

        let state = state + gain * innovation;
        let covariance = (Covariance::<N>::identity() - gain * self.measurement_model) * covariance;

        Ok((state, covariance))
    }

    /// Advance the stored belief by one predict-update cycle and return the
    /// committed posterior.
    pub fn step(
        &mut self,
        dt: f64,
        observation: Observation<M>,
        input: Option<InputVector<U>>,
    ) -> Result<CurrentState<N>, FilterError> {
        // a-priori
        let predicted = self.predict(self.estimate.into_parts(), dt, input)?;

        // a-posteriori
        let corrected = self.update(predicted, observation)?;

        self.estimate = corrected.into();
        Ok(corrected)
    }

    /// Advance the stored belief by prediction alone, for intervals where no
    /// measurement arrived (sensor dropout).
    pub fn advance(
        &mut self,
        dt: f64,
        input: Option<InputVector<U>>,
    ) -> Result<CurrentState<N>, FilterError> {
        let predicted = self.predict(self.estimate.into_parts(), dt, input)?;
        self.estimate = predicted.into();
        Ok(predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{Measurement, MeasurementNoise};
    use nalgebra::Vector2;

    fn scalar_filter() -> KalmanFilter {
        KalmanFilter::new(
            TransitionModel::<1>::identity() * 2.0,
            MeasurementModel::<1, 1>::identity(),
            TransitionNoise::<1>::identity() * 2.0,
        )
    }

    #[test]
    fn predict_applies_scaled_transition() -> Result<(), FilterError> {
        let filter = scalar_filter();
        let initial = (State::<1>::new(1.0), Covariance::<1>::identity());

        let (state, covariance) = filter.predict(initial, 1.0, None)?;
        assert_eq!(state, State::<1>::new(2.0));
        assert_eq!(covariance, Covariance::<1>::identity() * 6.0);

        Ok(())
    }

    /// The transition model is per unit time; halving `dt` halves the
    /// effective transition.
    #[test]
    fn predict_scales_transition_by_elapsed_time() -> Result<(), FilterError> {
        let filter = scalar_filter();
        let initial = (State::<1>::new(1.0), Covariance::<1>::identity());

        let (state, covariance) = filter.predict(initial, 0.5, None)?;
        assert_eq!(state, State::<1>::new(1.0));
        assert_eq!(covariance, Covariance::<1>::identity() * 3.0);

        Ok(())
    }

    #[test]
    fn predict_rejects_invalid_time_step() {
        let filter = scalar_filter();
        let initial = (State::<1>::new(1.0), Covariance::<1>::identity());

        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = filter.predict(initial, dt, None);
            assert!(matches!(result, Err(FilterError::InvalidTimeStep { .. })));
        }
    }

    #[test]
    fn predict_applies_input_model() -> Result<(), FilterError> {
        let filter: KalmanFilter<1, 1, 2> = KalmanFilter::new(
            TransitionModel::<1>::identity() * 2.0,
            MeasurementModel::<1, 1>::identity(),
            TransitionNoise::<1>::identity() * 2.0,
        )
        .with_input_model(InputModel::<1, 2>::new(1.0, 2.0));
        let initial = (State::<1>::new(1.0), Covariance::<1>::identity());

        // No input behaves as zero input.
        let (state, covariance) = filter.predict(initial, 1.0, None)?;
        assert_eq!(state, State::<1>::new(2.0));
        assert_eq!(covariance, Covariance::<1>::identity() * 6.0);

        let (state, covariance) =
            filter.predict(initial, 1.0, Some(InputVector::<2>::new(1.0, 1.0)))?;
        assert_eq!(state, State::<1>::new(5.0));
        assert_eq!(covariance, Covariance::<1>::identity() * 6.0);

        Ok(())
    }

    #[test]
    fn update_corrects_toward_measurement() -> Result<(), FilterError> {
        let filter: KalmanFilter<2, 1> = KalmanFilter::new(
            TransitionModel::<2>::identity() * 3.0,
            MeasurementModel::<1, 2>::new(1.0, 1.0),
            TransitionNoise::<2>::identity() * 2.0,
        );
        let current = (State::<2>::new(1.0, 2.0), Covariance::<2>::identity());
        let observation = (
            Measurement::<1>::new(2.0),
            MeasurementNoise::<1>::identity() * 2.0,
        );

        let (state, covariance) = filter.update(current, observation)?;
        assert_eq!(state, State::<2>::new(0.75, 1.75));
        assert_eq!(
            covariance,
            Covariance::<2>::from_columns(&[
                Vector2::new(0.75, -0.25),
                Vector2::new(-0.25, 0.75)
            ])
        );

        // The corrected covariance stays positive definite.
        let eigenvalues = covariance.eigenvalues().expect("real eigenvalues");
        assert!(eigenvalues.iter().all(|&value| value > 0.0));

        Ok(())
    }

    #[test]
    fn update_rejects_singular_innovation() {
        let filter: KalmanFilter = KalmanFilter::new(
            TransitionModel::<1>::identity(),
            MeasurementModel::<1, 1>::identity(),
            TransitionNoise::<1>::identity(),
        );
        let current = (State::<1>::new(1.0), Covariance::<1>::identity());

        // R = -H·P·Hᵀ makes the innovation covariance exactly zero.
        let observation = (
            Measurement::<1>::new(1.0),
            MeasurementNoise::<1>::identity() * -1.0,
        );
        assert_eq!(
            filter.update(current, observation),
            Err(FilterError::SingularInnovation)
        );
    }

    /// `step` commits the posterior; the next step starts from it.
    #[test]
    fn step_commits_posterior() -> Result<(), FilterError> {
        let mut filter: KalmanFilter = KalmanFilter::new(
            TransitionModel::<1>::identity(),
            MeasurementModel::<1, 1>::identity(),
            TransitionNoise::<1>::identity(),
        )
        .with_state(State::<1>::new(1.0), Covariance::<1>::identity());

        let noise = MeasurementNoise::<1>::identity() * 2.0;

        let (state, covariance) = filter.step(1.0, (Measurement::<1>::new(3.0), noise), None)?;
        assert_eq!(state, State::<1>::new(2.0));
        assert_eq!(covariance, Covariance::<1>::identity());
        assert_eq!(filter.state(), State::<1>::new(2.0));
        assert_eq!(filter.covariance(), Covariance::<1>::identity());

        let (state, _) = filter.step(1.0, (Measurement::<1>::new(4.0), noise), None)?;
        assert_eq!(state, State::<1>::new(3.0));

        Ok(())
    }

    /// A failed step must not move the stored belief, whether prediction or
    /// update is the phase that fails.
    #[test]
    fn failed_step_leaves_estimate_unchanged() {
        let mut filter: KalmanFilter = KalmanFilter::new(
            TransitionModel::<1>::identity(),
            MeasurementModel::<1, 1>::identity(),
            TransitionNoise::<1>::identity(),
        )
        .with_state(State::<1>::new(1.0), Covariance::<1>::identity());
        let before = filter.estimate();

        let noise = MeasurementNoise::<1>::identity() * 2.0;
        let bad_dt = filter.step(-1.0, (Measurement::<1>::new(3.0), noise), None);
        assert!(matches!(bad_dt, Err(FilterError::InvalidTimeStep { .. })));
        assert_eq!(filter.estimate(), before);

        // Predicted covariance is 2, so R = -2 zeroes the innovation
        // covariance and fails the update phase after a valid prediction.
        let singular = filter.step(
            1.0,
            (
                Measurement::<1>::new(3.0),
                MeasurementNoise::<1>::identity() * -2.0,
            ),
            None,
        );
        assert_eq!(singular, Err(FilterError::SingularInnovation));
        assert_eq!(filter.estimate(), before);
    }

    /// `advance` commits the prediction; without measurements the
    /// covariance keeps growing by the process noise.
    #[test]
    fn advance_commits_prediction() -> Result<(), FilterError> {
        let mut filter: KalmanFilter = KalmanFilter::new(
            TransitionModel::<1>::identity(),
            MeasurementModel::<1, 1>::identity(),
            TransitionNoise::<1>::identity(),
        )
        .with_state(State::<1>::new(1.0), Covariance::<1>::identity());

        let (state, covariance) = filter.advance(1.0, None)?;
        assert_eq!(state, State::<1>::new(1.0));
        assert_eq!(covariance, Covariance::<1>::identity() * 2.0);
        assert_eq!(filter.covariance(), Covariance::<1>::identity() * 2.0);

        let (_, covariance) = filter.advance(1.0, None)?;
        assert_eq!(covariance, Covariance::<1>::identity() * 3.0);

        Ok(())
    }

    #[test]
    fn default_filter_is_uninformative() {
        let filter: KalmanFilter = KalmanFilter::default();
        assert_eq!(filter.state(), State::<1>::zeros());
        assert_eq!(filter.covariance(), Covariance::<1>::identity());
    }

    #[test]
    fn with_state_overrides_prior() {
        let filter = scalar_filter().with_state(
            State::<1>::new(4.0),
            Covariance::<1>::identity() * 9.0,
        );
        assert_eq!(filter.state(), State::<1>::new(4.0));
        assert_eq!(filter.covariance(), Covariance::<1>::identity() * 9.0);
    }
}
