use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;

use crate::errors::InvalidClientStatus;

use super::ids::{ClientId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Paused => "paused",
            ClientStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClientStatus::Active),
            "paused" => Ok(ClientStatus::Paused),
            "completed" => Ok(ClientStatus::Completed),
            other => Err(InvalidClientStatus::new(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub program: Option<String>,
    /// Note journal blob, see [`crate::notes::NoteJournalCodec`].
    pub notes: String,
    pub status: ClientStatus,
    pub progress: u8,
    pub session_count: u32,
    pub next_session: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClientDraft {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub program: Option<String>,
    pub notes: String,
    pub status: ClientStatus,
    pub progress: u8,
    pub session_count: u32,
    pub next_session: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub program: Option<String>,
    pub status: ClientStatus,
    pub progress: u8,
    pub next_session: Option<DateTime<Utc>>,
}

impl NewClient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Field-by-field update. Notes are not patchable here; they go through the
/// note operations so the journal format stays intact.
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub program: Option<Option<String>>,
    pub status: Option<ClientStatus>,
    pub progress: Option<u8>,
    pub session_count: Option<u32>,
    pub next_session: Option<Option<DateTime<Utc>>>,
}

// --

impl Client {
    pub(crate) fn from_draft(id: ClientId, draft: ClientDraft) -> Self {
        let ClientDraft {
            user_id,
            name,
            email,
            phone,
            program,
            notes,
            status,
            progress,
            session_count,
            next_session,
            created_at,
        } = draft;
        Self {
            id,
            user_id,
            name,
            email,
            phone,
            program,
            notes,
            status,
            progress,
            session_count,
            next_session,
            created_at,
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: ClientPatch) {
        let ClientPatch {
            name,
            email,
            phone,
            program,
            status,
            progress,
            session_count,
            next_session,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(program) = program {
            self.program = program;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(progress) = progress {
            self.progress = progress;
        }
        if let Some(session_count) = session_count {
            self.session_count = session_count;
        }
        if let Some(next_session) = next_session {
            self.next_session = next_session;
        }
    }
}
