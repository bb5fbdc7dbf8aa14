use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{Client, ClientDraft, ClientId, NoteDraft, NoteId, NoteRecord, UserId};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list_clients(&self, user_id: &UserId) -> Result<Vec<Client>, ServerError>;

    /// `None` when the client doesn't exist or belongs to another user.
    async fn find_client(
        &self,
        user_id: &UserId,
        id: &ClientId,
    ) -> Result<Option<Client>, ServerError>;

    async fn insert_client(&self, draft: ClientDraft) -> Result<Client, ServerError>;

    async fn update_client(&self, client: &Client) -> Result<Client, ServerError>;

    /// Rewrites the notes column only.
    async fn update_client_notes(&self, id: &ClientId, notes: &str) -> Result<(), ServerError>;

    /// Note records go with the client through the store's cascade.
    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError>;

    // Structured note journal.

    async fn list_note_records(&self, client_id: &ClientId)
        -> Result<Vec<NoteRecord>, ServerError>;

    async fn insert_note_record(&self, draft: NoteDraft) -> Result<NoteRecord, ServerError>;

    async fn update_note_record(&self, record: &NoteRecord) -> Result<NoteRecord, ServerError>;

    async fn delete_note_record(&self, id: &NoteId) -> Result<(), ServerError>;
}

#[async_trait]
impl<T: ClientRepository + ?Sized> ClientRepository for Arc<T> {
    async fn list_clients(&self, user_id: &UserId) -> Result<Vec<Client>, ServerError> {
        (**self).list_clients(user_id).await
    }

    async fn find_client(
        &self,
        user_id: &UserId,
        id: &ClientId,
    ) -> Result<Option<Client>, ServerError> {
        (**self).find_client(user_id, id).await
    }

    async fn insert_client(&self, draft: ClientDraft) -> Result<Client, ServerError> {
        (**self).insert_client(draft).await
    }

    async fn update_client(&self, client: &Client) -> Result<Client, ServerError> {
        (**self).update_client(client).await
    }

    async fn update_client_notes(&self, id: &ClientId, notes: &str) -> Result<(), ServerError> {
        (**self).update_client_notes(id, notes).await
    }

    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError> {
        (**self).delete_client(id).await
    }

    async fn list_note_records(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<NoteRecord>, ServerError> {
        (**self).list_note_records(client_id).await
    }

    async fn insert_note_record(&self, draft: NoteDraft) -> Result<NoteRecord, ServerError> {
        (**self).insert_note_record(draft).await
    }

    async fn update_note_record(&self, record: &NoteRecord) -> Result<NoteRecord, ServerError> {
        (**self).update_note_record(record).await
    }

    async fn delete_note_record(&self, id: &NoteId) -> Result<(), ServerError> {
        (**self).delete_note_record(id).await
    }
}
