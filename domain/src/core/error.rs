//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Parsers and the context assembler never produce these; they are reserved
/// for conversions at the edges of the domain (e.g. parsing user-supplied
/// enum values).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid execution mode: {0}")]
    InvalidMode(String),

    #[error("Invalid agent role: {0}")]
    InvalidRole(String),

    #[error("Invalid quality tier: {0}")]
    InvalidQualityTier(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::InvalidMode("turbo".to_string());
        assert_eq!(error.to_string(), "Invalid execution mode: turbo");
    }

    #[test]
    fn test_role_error_display() {
        let error = DomainError::InvalidRole("oracle".to_string());
        assert_eq!(error.to_string(), "Invalid agent role: oracle");
    }
}
