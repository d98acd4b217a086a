use derive_more::Display;
use model::ModelError;

/// Errors raised before or instead of a search. Nothing in here is produced while iterating.
#[derive(Display, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[display(fmt = "unknown operator '{}'", _0)]
    UnknownOperator(String),
    #[display(fmt = "invalid weight '{}' for operator '{}'", value, operator)]
    InvalidWeight { operator: String, value: String },
    #[display(fmt = "unknown preset '{}'", _0)]
    UnknownPreset(String),
    #[display(fmt = "invalid configuration: {}", _0)]
    InvalidConfig(String),
    #[display(fmt = "invalid locked assignment: {}", _0)]
    InvalidLock(String),
    #[display(fmt = "{}", _0)]
    Model(ModelError),
    #[display(fmt = "attempt panicked: {}", _0)]
    AttemptPanicked(String),
    /// every attempt of a multi-start run failed; holds the messages of all attempts.
    #[display(fmt = "all runs failed: {}", _0)]
    AllRunsFailed(String),
}

impl From<ModelError> for SolverError {
    fn from(error: ModelError) -> Self {
        SolverError::Model(error)
    }
}

impl std::error::Error for SolverError {}
