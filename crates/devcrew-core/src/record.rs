//! Append-only execution record for one pipeline run.

use serde_json::Value;

use crate::domain::{Message, MessageKind, Role};

/// The ordered message log for a single run.
///
/// `append` is the only mutator; there is no removal. Each run constructs
/// its own record, holds it exclusively for the run's lifetime, and hands
/// it to the caller (as `ExecutionResult.history`) on completion. Records
/// from different runs are never combined.
#[derive(Debug, Default)]
pub struct ExecutionRecord {
    messages: Vec<Message>,
}

impl ExecutionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one handoff, stamping it with the current wall-clock time.
    pub fn append(&mut self, sender: Role, receiver: Role, content: Value, kind: MessageKind) {
        self.messages.push(Message::new(sender, receiver, content, kind));
    }

    /// The full ordered sequence recorded so far.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consume the record, yielding the owned history.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_preserves_order() {
        let mut record = ExecutionRecord::new();
        record.append(Role::User, Role::Generator, json!("task"), MessageKind::Data);
        record.append(Role::Generator, Role::Validator, json!("code"), MessageKind::Data);

        let messages = record.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Role::User);
        assert_eq!(messages[1].sender, Role::Generator);
        // Append order implies non-decreasing timestamps
        assert!(messages[0].timestamp <= messages[1].timestamp);
    }

    #[test]
    fn test_into_messages_yields_everything() {
        let mut record = ExecutionRecord::new();
        record.append(Role::User, Role::Generator, json!("t"), MessageKind::Data);
        assert!(!record.is_empty());

        let messages = record.into_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content_text(), Some("t"));
    }
}
