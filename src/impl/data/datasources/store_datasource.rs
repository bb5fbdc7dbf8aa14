use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::datasources::{ClientNoteRowModel, ClientRowModel, InvoiceItemRowModel, InvoiceRowModel};

/// Row-oriented CRUD over the hosted backend's tables.
///
/// The store is expected to enforce the foreign keys of the item and note
/// tables (inserting under a missing parent fails) and to cascade deletes of
/// a parent row to its children.
#[async_trait]
pub trait StoreDatasource: Send + Sync {
    // invoices

    async fn insert_invoice(&self, row: InvoiceRowModel) -> Result<InvoiceRowModel, ServerError>;

    async fn select_invoices(&self, user_id: &str) -> Result<Vec<InvoiceRowModel>, ServerError>;

    async fn select_invoice(&self, id: &str) -> Result<Option<InvoiceRowModel>, ServerError>;

    async fn update_invoice(&self, row: InvoiceRowModel) -> Result<InvoiceRowModel, ServerError>;

    async fn delete_invoice(&self, id: &str) -> Result<(), ServerError>;

    // invoice_items

    async fn insert_invoice_items(
        &self,
        rows: Vec<InvoiceItemRowModel>,
    ) -> Result<Vec<InvoiceItemRowModel>, ServerError>;

    /// Ordered by `position`.
    async fn select_invoice_items(
        &self,
        invoice_id: &str,
    ) -> Result<Vec<InvoiceItemRowModel>, ServerError>;

    async fn delete_invoice_items(&self, invoice_id: &str) -> Result<(), ServerError>;

    // clients

    async fn insert_client(&self, row: ClientRowModel) -> Result<ClientRowModel, ServerError>;

    async fn select_clients(&self, user_id: &str) -> Result<Vec<ClientRowModel>, ServerError>;

    async fn select_client(&self, id: &str) -> Result<Option<ClientRowModel>, ServerError>;

    async fn update_client(&self, row: ClientRowModel) -> Result<ClientRowModel, ServerError>;

    async fn update_client_notes(&self, id: &str, notes: &str) -> Result<(), ServerError>;

    async fn delete_client(&self, id: &str) -> Result<(), ServerError>;

    // client_notes

    async fn insert_client_note(
        &self,
        row: ClientNoteRowModel,
    ) -> Result<ClientNoteRowModel, ServerError>;

    async fn select_client_notes(
        &self,
        client_id: &str,
    ) -> Result<Vec<ClientNoteRowModel>, ServerError>;

    async fn update_client_note(
        &self,
        row: ClientNoteRowModel,
    ) -> Result<ClientNoteRowModel, ServerError>;

    async fn delete_client_note(&self, id: &str) -> Result<(), ServerError>;
}
