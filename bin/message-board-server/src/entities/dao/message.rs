use chrono::{DateTime, SubsecRound, Utc};

/// A row in the `message` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: i64,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A validated message that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub name: String,
    pub text: String,
    /// Insertion instant; becomes the row's immutable `created_at`.
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Stamp a new message with the current instant, truncated to the
    /// microsecond precision the store keeps.
    pub fn now(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}
