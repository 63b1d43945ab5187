//! Error types for crewdb

use thiserror::Error;

/// Result type alias for crewdb operations
pub type Result<T> = std::result::Result<T, CrewDbError>;

/// Main error type for crewdb
#[derive(Error, Debug)]
pub enum CrewDbError {
    /// Malformed tag, or a tag with an empty key/value component
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// A record field or cross-field rule was violated
    #[error("Validation failed for {record}: {rule}")]
    Validation { record: &'static str, rule: String },

    /// Stage planner called without the scope ids the stage needs
    #[error("Missing scope: {0}")]
    MissingScope(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CrewDbError {
    pub fn invalid_tag(msg: impl Into<String>) -> Self {
        CrewDbError::InvalidTag(msg.into())
    }

    pub fn validation(record: &'static str, rule: impl Into<String>) -> Self {
        CrewDbError::Validation {
            record,
            rule: rule.into(),
        }
    }

    pub fn missing_scope(msg: impl Into<String>) -> Self {
        CrewDbError::MissingScope(msg.into())
    }

    /// The violated rule, for validation errors
    pub fn rule(&self) -> Option<&str> {
        match self {
            CrewDbError::Validation { rule, .. } => Some(rule.as_str()),
            _ => None,
        }
    }

    /// Stable label for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CrewDbError::InvalidTag(_) => "invalid_tag",
            CrewDbError::Validation { .. } => "validation",
            CrewDbError::MissingScope(_) => "missing_scope",
            CrewDbError::Serialization(_) => "serialization",
        }
    }

    /// Stable numeric code, used as the CLI exit status
    pub fn code(&self) -> i32 {
        match self {
            CrewDbError::InvalidTag(_) => 10,
            CrewDbError::Validation { .. } => 11,
            CrewDbError::MissingScope(_) => 12,
            CrewDbError::Serialization(_) => 13,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_validation_carries_rule() {
        let err = CrewDbError::validation("lead_note", "lead_id is required for lead_note");
        assert_eq!(err.rule(), Some("lead_id is required for lead_note"));
        assert_eq!(err.kind(), "validation");
        assert_eq!(
            err.to_string(),
            "Validation failed for lead_note: lead_id is required for lead_note"
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = [
            CrewDbError::invalid_tag("x"),
            CrewDbError::validation("memory", "y"),
            CrewDbError::missing_scope("z"),
            CrewDbError::from(parse_err),
        ];
        let codes: HashSet<i32> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
        let kinds: HashSet<&str> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
        assert!(errors.iter().all(|e| e.rule().is_none() || e.kind() == "validation"));
    }
}
