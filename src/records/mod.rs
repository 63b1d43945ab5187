//! Validated record schemas
//!
//! Records are built in two phases: field values first (typed, or decoded
//! from JSON), then a single invariant check. A record that exists has
//! passed both, and exposes no mutating API.

mod batch;
mod memory;
mod scope;
mod vector;

pub use batch::*;
pub use memory::*;
pub use scope::*;
pub use vector::*;

use crate::error::{CrewDbError, Result};

/// True when an optional identifier holds a non-blank value
pub(crate) fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Fail with `"{field} is required for {record}"` unless the value is present
pub(crate) fn require(record: &'static str, field: &str, value: Option<&str>) -> Result<()> {
    if is_present(value) {
        Ok(())
    } else {
        Err(CrewDbError::validation(
            record,
            format!("{} is required for {}", field, record),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_present() {
        assert!(is_present(Some("A1")));
        assert!(!is_present(Some("")));
        assert!(!is_present(Some("  ")));
        assert!(!is_present(None));
    }

    #[test]
    fn test_require_names_the_rule() {
        let err = require("trace", "run_id", None).unwrap_err();
        assert_eq!(err.rule(), Some("run_id is required for trace"));
    }
}
