//! Errors raised while resolving tool names and producing scripts.

use thiserror::Error;

/// A tool name that does not address a registered operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No category carries the requested name.
    #[error("Category not found: {category}")]
    CategoryNotFound {
        /// Category part of the tool name.
        category: String,
    },

    /// The category exists but holds no operation with the requested name.
    #[error("Operation not found: {operation} (category '{category}')")]
    OperationNotFound {
        /// Category part of the tool name.
        category: String,
        /// Operation part of the tool name.
        operation: String,
    },
}

impl ResolveError {
    /// Creates a category-not-found error.
    pub fn category_not_found(category: impl Into<String>) -> Self {
        Self::CategoryNotFound {
            category: category.into(),
        }
    }

    /// Creates an operation-not-found error.
    pub fn operation_not_found(category: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::OperationNotFound {
            category: category.into(),
            operation: operation.into(),
        }
    }
}

/// Failure to turn request arguments into a script.
#[derive(Debug, Error)]
pub enum ProduceError {
    /// The arguments do not match the operation's input type.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// Description of the mismatch.
        message: String,
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// The arguments are well-formed but unusable.
    #[error("invalid arguments: {message}")]
    Rejected {
        /// Why the arguments were refused.
        message: String,
    },
}

impl ProduceError {
    /// Wraps a deserialisation failure.
    #[must_use]
    pub fn invalid_arguments(source: serde_json::Error) -> Self {
        Self::InvalidArguments {
            message: source.to_string(),
            source,
        }
    }

    /// Creates a rejection with a custom message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}
