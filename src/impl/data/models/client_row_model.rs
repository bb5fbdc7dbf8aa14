use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;

use crate::entities::{Client, ClientDraft, ClientId, ClientStatus, UserId};

/// Row of the `clients` table.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct ClientRowModel {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub program: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub status: String,
    pub progress: u8,
    pub session_count: u32,
    pub next_session: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ClientRowModel {
    pub(crate) fn from_draft(id: &ClientId, draft: &ClientDraft) -> Self {
        Self {
            id: id.to_string(),
            user_id: draft.user_id.to_string(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            program: draft.program.clone(),
            notes: draft.notes.clone(),
            status: draft.status.to_string(),
            progress: draft.progress,
            session_count: draft.session_count,
            next_session: draft.next_session,
            created_at: draft.created_at,
        }
    }

    pub(crate) fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.to_string(),
            user_id: client.user_id.to_string(),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            program: client.program.clone(),
            notes: client.notes.clone(),
            status: client.status.to_string(),
            progress: client.progress,
            session_count: client.session_count,
            next_session: client.next_session,
            created_at: client.created_at,
        }
    }
}

impl TryFrom<ClientRowModel> for Client {
    type Error = ServerError;
    fn try_from(row: ClientRowModel) -> Result<Self, Self::Error> {
        Ok(Client {
            status: row.status.parse::<ClientStatus>()?,
            id: ClientId(row.id),
            user_id: UserId(row.user_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            program: row.program,
            notes: row.notes,
            progress: row.progress,
            session_count: row.session_count,
            next_session: row.next_session,
            created_at: row.created_at,
        })
    }
}
