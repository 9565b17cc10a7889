//! Termination conditions for iterative optimization loops.

/// A model that can report its most promising prediction.
pub trait PredictiveModel {
    /// `(index, mean, variance)` of the arm or input with the highest
    /// predicted mean, or `None` if the model has no predictions yet.
    fn max_prediction(&self) -> Option<(usize, f64, f64)>;
}

/// Snapshot of an optimization loop, evaluated by [`TerminationCondition`].
#[derive(Clone, Copy, Default)]
pub struct TerminationState<'a> {
    /// Current iteration number.
    pub iteration: usize,
    /// Most recent objective value.
    pub current_value: Option<f64>,
    /// Objective value of the previous iteration.
    pub previous_value: Option<f64>,
    /// Objective gradient at the most recent input.
    pub gradient: Option<&'a [f64]>,
    /// Objective Hessian at the most recent input, row-major.
    pub hessian: Option<&'a [f64]>,
    /// Model being optimized.
    pub model: Option<&'a dyn PredictiveModel>,
}

impl<'a> TerminationState<'a> {
    /// State at `iteration` with nothing else known.
    #[must_use]
    pub fn at_iteration(iteration: usize) -> Self {
        Self {
            iteration,
            ..Self::default()
        }
    }

    /// Attach the current and previous objective values.
    #[must_use]
    pub fn with_values(mut self, current: f64, previous: f64) -> Self {
        self.current_value = Some(current);
        self.previous_value = Some(previous);
        self
    }

    /// Attach the model being optimized.
    #[must_use]
    pub fn with_model(mut self, model: &'a dyn PredictiveModel) -> Self {
        self.model = Some(model);
        self
    }
}

impl std::fmt::Debug for TerminationState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminationState")
            .field("iteration", &self.iteration)
            .field("current_value", &self.current_value)
            .field("previous_value", &self.previous_value)
            .field("gradient", &self.gradient)
            .field("hessian", &self.hessian)
            .field("model", &self.model.is_some())
            .finish()
    }
}

/// When an iterative loop should stop.
///
/// A leaf whose inputs are missing from the state reports "not satisfied".
///
/// # Example
///
/// ```
/// use grasp_sampler::{TerminationCondition, TerminationState};
///
/// let stop = TerminationCondition::Any(vec![
///     TerminationCondition::MaxIterations(100),
///     TerminationCondition::Progress { eps: 1e-6 },
/// ]);
///
/// assert!(!stop.is_satisfied(&TerminationState::at_iteration(5).with_values(1.0, 0.5)));
/// assert!(stop.is_satisfied(&TerminationState::at_iteration(5).with_values(1.0, 1.0)));
/// assert!(stop.is_satisfied(&TerminationState::at_iteration(100)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationCondition {
    /// Stop once the iteration count reaches the limit.
    MaxIterations(usize),
    /// Stop when the objective changes by less than `eps`.
    Progress {
        /// Minimum progress required to continue.
        eps: f64,
    },
    /// Stop when the model's best prediction has variance below `eps`.
    Confidence {
        /// Variance below which the model is considered confident.
        eps: f64,
    },
    /// Stop when any child condition holds.
    Any(Vec<TerminationCondition>),
    /// Stop when every child condition holds.
    All(Vec<TerminationCondition>),
}

impl TerminationCondition {
    /// Whether the loop should terminate in `state`.
    #[must_use]
    pub fn is_satisfied(&self, state: &TerminationState<'_>) -> bool {
        match self {
            Self::MaxIterations(max_iters) => state.iteration >= *max_iters,
            Self::Progress { eps } => match (state.current_value, state.previous_value) {
                (Some(cur), Some(prev)) => (cur - prev).abs() < *eps,
                _ => false,
            },
            Self::Confidence { eps } => state
                .model
                .and_then(|model| model.max_prediction())
                .is_some_and(|(_, _, variance)| variance < *eps),
            Self::Any(children) => children.iter().any(|c| c.is_satisfied(state)),
            Self::All(children) => children.iter().all(|c| c.is_satisfied(state)),
        }
    }
}
