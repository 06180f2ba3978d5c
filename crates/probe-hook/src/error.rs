//! Errors raised by the binding surface

/// JavaScript error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsError {
    #[error("JavaScript error: {0}")]
    Runtime(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Reference error: {0}")]
    ReferenceError(String),
}
