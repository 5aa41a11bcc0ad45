//! Workflow error types

use thiserror::Error;

/// Errors that can occur during workflow operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Step not found: {0}")]
    StepNotFound(String),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn step_not_found(id: impl Into<String>) -> Self {
        Self::StepNotFound(id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::validation("conditions cannot be empty");
        assert_eq!(err.to_string(), "Validation error: conditions cannot be empty");

        let err = WorkflowError::step_not_found("step-1");
        assert_eq!(err.to_string(), "Step not found: step-1");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            WorkflowError::validation("x"),
            WorkflowError::validation("x")
        );
        assert_ne!(
            WorkflowError::validation("x"),
            WorkflowError::validation("y")
        );
    }
}
