//! Error types for oraqb

use thiserror::Error;

/// Result type alias for oraqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while building or rendering a statement.
///
/// Every error is a construction-time mistake made by the caller. Builders
/// record the first one they hit and hand it back, unchanged, from the next
/// render call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// The shape of the builder itself is wrong (term/connective mismatch,
    /// batch column mismatch, THEN without WHEN, too many aliases, ...).
    #[error("Structural error: {0}")]
    Structural(String),

    /// Unknown operator or an operator that cannot take the given value.
    #[error("Operator error: {0}")]
    Operator(String),

    /// A value has the wrong shape (BETWEEN arity, empty IN list, array where
    /// a scalar is required, unsupported literal).
    #[error("Shape error: {0}")]
    Shape(String),

    /// A chained call was applied to the wrong kind of target.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Rendering was requested before required state was set.
    #[error("Precondition error: {0}")]
    Precondition(String),
}

impl QbError {
    /// Create a structural error
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    /// Create an operator error
    pub fn operator(message: impl Into<String>) -> Self {
        Self::Operator(message.into())
    }

    /// Create a shape error
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    /// Create a contract error
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// Create a precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Check if this is a structural error
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// Check if this is an operator error
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    /// Check if this is a shape error
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape(_))
    }

    /// Check if this is a contract error
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// Check if this is a precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

/// Keep the first error recorded by a builder.
pub(crate) fn record(slot: &mut Option<QbError>, err: QbError) {
    if slot.is_none() {
        slot.replace(err);
    }
}
