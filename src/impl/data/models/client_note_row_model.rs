use chrono::{DateTime, Utc};

use crate::entities::{ClientId, NoteDraft, NoteId, NoteRecord};

/// Row of the `client_notes` table. `client_id` references `clients.id` with
/// `ON DELETE CASCADE`.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct ClientNoteRowModel {
    pub id: String,
    pub client_id: String,
    pub created_at: DateTime<Utc>,
    pub date_stamp: String,
    pub content: String,
}

impl ClientNoteRowModel {
    pub(crate) fn from_draft(id: &NoteId, draft: &NoteDraft) -> Self {
        Self {
            id: id.to_string(),
            client_id: draft.client_id.to_string(),
            created_at: draft.created_at,
            date_stamp: draft.date_stamp.clone(),
            content: draft.content.clone(),
        }
    }

    pub(crate) fn from_record(record: &NoteRecord) -> Self {
        Self {
            id: record.id.to_string(),
            client_id: record.client_id.to_string(),
            created_at: record.created_at,
            date_stamp: record.date_stamp.clone(),
            content: record.content.clone(),
        }
    }
}

impl From<ClientNoteRowModel> for NoteRecord {
    fn from(row: ClientNoteRowModel) -> Self {
        NoteRecord {
            id: NoteId(row.id),
            client_id: ClientId(row.client_id),
            created_at: row.created_at,
            date_stamp: row.date_stamp,
            content: row.content,
        }
    }
}
