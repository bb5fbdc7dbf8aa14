use chrono::{DateTime, Utc};

use super::ids::{ClientId, NoteId};

/// One entry of a client's note journal blob. Only identified by its position
/// in the decoded list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    /// Display string, not a sortable timestamp.
    pub date: String,
    pub content: String,
}

impl NoteEntry {
    pub fn new(date: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            content: content.into(),
        }
    }
}

/// A note stored as its own row under the client, addressed by a stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    pub id: NoteId,
    pub client_id: ClientId,
    pub created_at: DateTime<Utc>,
    pub date_stamp: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub client_id: ClientId,
    pub created_at: DateTime<Utc>,
    pub date_stamp: String,
    pub content: String,
}

impl From<&NoteRecord> for NoteEntry {
    fn from(record: &NoteRecord) -> Self {
        NoteEntry {
            date: record.date_stamp.clone(),
            content: record.content.clone(),
        }
    }
}
