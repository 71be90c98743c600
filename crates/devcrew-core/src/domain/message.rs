//! Inter-role message vocabulary: `Role`, `MessageKind`, `Message`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of pipeline participants.
///
/// A closed enum rather than a runtime-keyed agent map: an unknown role name
/// is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Generator,
    Validator,
    Deployer,
    Summarizer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Generator => "generator",
            Role::Validator => "validator",
            Role::Deployer => "deployer",
            Role::Summarizer => "summarizer",
        };
        write!(f, "{s}")
    }
}

/// Classification of a message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Task text, artifacts, reports.
    Data,
    /// Deployment status and other outcome signals.
    Status,
}

/// One directed handoff between two roles.
///
/// Messages are append-only and owned by a single run's `ExecutionRecord`;
/// ordering reflects call order (the pipeline is strictly sequential).
/// The timestamp is an explicit wall-clock read at append time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub sender: Role,
    pub receiver: Role,
    /// Opaque payload: text, structured report, or status.
    pub content: serde_json::Value,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current wall-clock time.
    pub fn new(sender: Role, receiver: Role, content: serde_json::Value, kind: MessageKind) -> Self {
        Self {
            sender,
            receiver,
            content,
            kind,
            timestamp: Utc::now(),
        }
    }

    /// The payload as text, when it is a plain string.
    pub fn content_text(&self) -> Option<&str> {
        self.content.as_str()
    }
}
