use thiserror::Error;

/// Failure reported by one of the engine's collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable {
        collaborator: &'static str,
        reason: String,
    },
}

impl CollaboratorError {
    pub fn scope(reason: impl Into<String>) -> Self {
        CollaboratorError::Unavailable {
            collaborator: "scope resolver",
            reason: reason.into(),
        }
    }

    pub fn oracle(reason: impl Into<String>) -> Self {
        CollaboratorError::Unavailable {
            collaborator: "oracle",
            reason: reason.into(),
        }
    }

    pub fn topics(reason: impl Into<String>) -> Self {
        CollaboratorError::Unavailable {
            collaborator: "topic source",
            reason: reason.into(),
        }
    }
}

/// Errors from an affordance computation. Any error voids the whole turn's
/// list; partial lists are never returned.
#[derive(Debug, Error)]
pub enum AffordanceError {
    #[error("affordance computation failed: {0}")]
    Collaborator(#[from] CollaboratorError),
}
