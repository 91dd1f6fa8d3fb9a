//! Error types shared by every tool
//!
//! Handlers return `ToolError`; the dispatcher renders it into the response
//! envelope so nothing escapes to the caller as a transport-level failure.

use std::fmt;
use thiserror::Error;

/// A single offending argument found during schema validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: String,
}

/// All argument problems found for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn push(&mut self, field: impl Into<String>, problem: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.into(),
            problem: problem.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Names of the offending fields, in the order they were found
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("`{}` {}", i.field, i.problem))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Failure taxonomy for tool invocations
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    Validation(ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error (HTTP {status_code}): {message}")]
    Backend { status_code: u16, message: String },

    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool `{0}` is already registered")]
    DuplicateTool(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Shorthand for a validation failure on one field
    pub fn validation(field: impl Into<String>, problem: impl Into<String>) -> Self {
        let mut err = ValidationError::default();
        err.push(field, problem);
        ToolError::Validation(err)
    }

    pub fn backend(status_code: u16, message: impl Into<String>) -> Self {
        ToolError::Backend {
            status_code,
            message: message.into(),
        }
    }

    /// Stable label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation",
            ToolError::NotFound(_) => "not_found",
            ToolError::Backend { .. } => "backend",
            ToolError::CacheUnavailable(_) => "cache_unavailable",
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::DuplicateTool(_) => "duplicate_tool",
            ToolError::Internal(_) => "internal",
        }
    }

    /// Whether the caller caused the failure (bad input, missing record)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ToolError::Validation(_) | ToolError::NotFound(_) | ToolError::UnknownTool(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_every_field() {
        let mut err = ValidationError::default();
        err.push("query", "is required");
        err.push("perPage", "must be at most 100");

        let rendered = ToolError::Validation(err).to_string();
        assert_eq!(
            rendered,
            "invalid arguments: `query` is required; `perPage` must be at most 100"
        );
    }

    #[test]
    fn backend_error_carries_status() {
        let err = ToolError::backend(503, "maintenance");
        assert_eq!(err.to_string(), "backend error (HTTP 503): maintenance");
        assert_eq!(err.kind(), "backend");
        assert!(!err.is_caller_error());
    }
}
