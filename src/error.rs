//! Error types for dependency injection

use crate::{Constructor, Token};
use thiserror::Error;

/// Joins a resolution path for display, e.g. `Symbol(A) -> Symbol(B) -> Symbol(A)`.
fn fmt_cycle(path: &[Token]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors that can occur during dependency injection operations
#[derive(Error, Debug, Clone)]
pub enum DiError {
    /// No provider is registered for the token and the autowire fallback
    /// did not apply
    #[error("No provider found for token: {token}")]
    ProviderNotFound { token: Token },

    /// A token was re-entered while already on the active resolution stack.
    /// The path holds the full stack plus the revisited token, in traversal
    /// order.
    #[error("Circular dependency detected: {}", fmt_cycle(.path))]
    CircularDependency { path: Vec<Token> },

    /// A constructor parameter has neither a usable explicit nor implicit
    /// token
    #[error("Cannot infer token for parameter {position} of {constructor}")]
    TokenInference {
        constructor: &'static str,
        position: usize,
    },

    /// A registered provider matches none of the known shapes.
    ///
    /// Unreachable while `Provider` stays a closed union; kept so any
    /// future provider kind fails loudly instead of being coerced.
    #[error("Invalid provider registered for token: {token}")]
    InvalidProvider { token: Token },

    /// A constructor rejected its resolved arguments
    #[error("Failed to construct {constructor}: {reason}")]
    CreationFailed {
        constructor: &'static str,
        reason: String,
    },

    /// A token resolved successfully but not to the requested type
    #[error("Token {token} did not resolve to a {expected}")]
    TypeMismatch {
        token: Token,
        expected: &'static str,
    },
}

impl DiError {
    /// Create a ProviderNotFound error
    #[inline]
    pub fn provider_not_found(token: &Token) -> Self {
        Self::ProviderNotFound {
            token: token.clone(),
        }
    }

    /// Create a CircularDependency error from a traversal-order path
    #[inline]
    pub fn circular(path: Vec<Token>) -> Self {
        Self::CircularDependency { path }
    }

    /// Create a TokenInference error for a constructor parameter
    #[inline]
    pub fn token_inference(constructor: &Constructor, position: usize) -> Self {
        Self::TokenInference {
            constructor: constructor.name(),
            position,
        }
    }

    /// Create a CreationFailed error
    #[inline]
    pub fn creation_failed(constructor: &'static str, reason: impl Into<String>) -> Self {
        Self::CreationFailed {
            constructor,
            reason: reason.into(),
        }
    }

    /// Create a TypeMismatch error for the requested type
    #[inline]
    pub fn type_mismatch<T: 'static>(token: &Token) -> Self {
        Self::TypeMismatch {
            token: token.clone(),
            expected: std::any::type_name::<T>(),
        }
    }
}

/// Result type alias for DI operations
pub type Result<T> = std::result::Result<T, DiError>;
