use thiserror::Error;

/// Errors raised by parameter handling and the integrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A required coefficient was absent from the parameter mapping.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// The parameter mapping named a coefficient the model does not have.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(String),

    /// Initial state length does not match the selected model variant.
    #[error("{variant} model expects a state of length {expected}, got {found}")]
    DimensionMismatch {
        variant: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("step size must be finite and > 0, got {0}")]
    InvalidStep(f64),

    #[error("invalid time span: start={start}, end={end}")]
    InvalidTimeSpan { start: f64, end: f64 },

    /// State left the finite domain during integration.
    #[error("non-finite value in state component {component} at step {step} (t={time})")]
    NonFinite {
        step: usize,
        time: f64,
        component: usize,
    },

    #[error("run needs {required} steps but the budget is {budget}")]
    StepBudgetExceeded { required: usize, budget: usize },
}

pub type SimResult<T> = Result<T, SimError>;
