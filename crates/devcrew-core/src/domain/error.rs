//! Domain-level error taxonomy for DevCrew.
//!
//! Only *unexpected* failures live here. A failed validation or a failed
//! deployment is pipeline data (`valid = false`, `success = false`), not an
//! error; the pipeline carries it forward to the summarizer. A `CrewError`
//! aborts the run.

use crate::domain::message::Role;

/// DevCrew domain errors.
#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    /// A role capability raised instead of returning its contracted result.
    /// Fatal for the current run; never retried, never persisted.
    #[error("capability fault in {role}: {message}")]
    CapabilityFault { role: Role, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrewError {
    /// Wrap an arbitrary failure raised by the capability bound to `role`.
    pub fn capability(role: Role, err: impl std::fmt::Display) -> Self {
        CrewError::CapabilityFault {
            role,
            message: err.to_string(),
        }
    }
}

/// Result type for DevCrew domain operations.
pub type Result<T> = std::result::Result<T, CrewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_fault_display_names_role() {
        let err = CrewError::capability(Role::Deployer, "sandbox spawn failed");
        let msg = err.to_string();
        assert!(msg.contains("capability fault"));
        assert!(msg.contains("deployer"));
        assert!(msg.contains("sandbox spawn failed"));
    }
}
