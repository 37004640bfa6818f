use thiserror::Error;

/// Every expected failure a core operation can return.
///
/// All variants are recoverable by the caller: the presentation layer
/// decides user-visible messaging. Nothing in the core panics on an
/// expected condition — the worst modeled outcome (a churned customer,
/// a failed breeding that consumed its parents) is a business result,
/// not an error.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("Insufficient {resource}: need {needed:.1}, have {available:.1}")]
    InsufficientResource {
        resource:  &'static str,
        needed:    f64,
        available: f64,
    },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Ineligible: {reason}")]
    Ineligible { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState { reason: reason.into() }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn ineligible(reason: impl Into<String>) -> Self {
        Self::Ineligible { reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
