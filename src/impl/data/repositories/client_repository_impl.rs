use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use uuid::Uuid;

use crate::{
    datasources::{ClientNoteRowModel, ClientRowModel, StoreDatasource},
    entities::{Client, ClientDraft, ClientId, NoteDraft, NoteId, NoteRecord, UserId},
    repositories::ClientRepository,
};

pub struct ClientRepositoryImpl<DS: StoreDatasource> {
    datasource: Arc<DS>,
}

impl<DS: StoreDatasource> ClientRepositoryImpl<DS> {
    pub fn new(datasource: Arc<DS>) -> Self {
        Self { datasource }
    }
}

#[async_trait]
impl<DS: StoreDatasource> ClientRepository for ClientRepositoryImpl<DS> {
    async fn list_clients(&self, user_id: &UserId) -> Result<Vec<Client>, ServerError> {
        let mut clients = self
            .datasource
            .select_clients(user_id.as_str())
            .await?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clients)
    }

    async fn find_client(
        &self,
        user_id: &UserId,
        id: &ClientId,
    ) -> Result<Option<Client>, ServerError> {
        self.datasource
            .select_client(id.as_str())
            .await?
            .filter(|row| row.user_id == user_id.as_str())
            .map(Client::try_from)
            .transpose()
    }

    async fn insert_client(&self, draft: ClientDraft) -> Result<Client, ServerError> {
        let id = ClientId(Uuid::new_v4().to_string());
        self.datasource
            .insert_client(ClientRowModel::from_draft(&id, &draft))
            .await?
            .try_into()
    }

    async fn update_client(&self, client: &Client) -> Result<Client, ServerError> {
        self.datasource
            .update_client(ClientRowModel::from_client(client))
            .await?
            .try_into()
    }

    async fn update_client_notes(&self, id: &ClientId, notes: &str) -> Result<(), ServerError> {
        self.datasource.update_client_notes(id.as_str(), notes).await
    }

    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError> {
        self.datasource.delete_client(id.as_str()).await
    }

    async fn list_note_records(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<NoteRecord>, ServerError> {
        let mut records: Vec<NoteRecord> = self
            .datasource
            .select_client_notes(client_id.as_str())
            .await?
            .into_iter()
            .map(NoteRecord::from)
            .collect();
        // Newest first; ties keep insertion order reversed.
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn insert_note_record(&self, draft: NoteDraft) -> Result<NoteRecord, ServerError> {
        let id = NoteId(Uuid::new_v4().to_string());
        Ok(self
            .datasource
            .insert_client_note(ClientNoteRowModel::from_draft(&id, &draft))
            .await?
            .into())
    }

    async fn update_note_record(&self, record: &NoteRecord) -> Result<NoteRecord, ServerError> {
        Ok(self
            .datasource
            .update_client_note(ClientNoteRowModel::from_record(record))
            .await?
            .into())
    }

    async fn delete_note_record(&self, id: &NoteId) -> Result<(), ServerError> {
        self.datasource.delete_client_note(id.as_str()).await
    }
}
