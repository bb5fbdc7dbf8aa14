use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{
    ClientId, Invoice, InvoiceDraft, InvoiceId, InvoiceItem, InvoiceItemInput, UserId,
};

/// Invoice and line-item persistence. Each call is one store round-trip.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// All invoices of `user_id`, newest issue date first, with their items.
    async fn list_invoices(&self, user_id: &UserId) -> Result<Vec<Invoice>, ServerError>;

    /// `None` when the invoice doesn't exist or belongs to another user.
    async fn find_invoice(
        &self,
        user_id: &UserId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>, ServerError>;

    /// Inserts the invoice row only; the returned invoice has no items.
    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, ServerError>;

    /// Writes the invoice's fields; `invoice.items` is ignored.
    async fn update_invoice(&self, invoice: &Invoice) -> Result<Invoice, ServerError>;

    /// Deletes the invoice row. Item rows go with it through the store's
    /// cascade.
    async fn delete_invoice(&self, id: &InvoiceId) -> Result<(), ServerError>;

    async fn insert_items(
        &self,
        invoice_id: &InvoiceId,
        items: &[InvoiceItemInput],
    ) -> Result<Vec<InvoiceItem>, ServerError>;

    async fn delete_items(&self, invoice_id: &InvoiceId) -> Result<(), ServerError>;

    /// Whether `client_id` names a client owned by `user_id`.
    async fn client_exists(
        &self,
        user_id: &UserId,
        client_id: &ClientId,
    ) -> Result<bool, ServerError>;
}

#[async_trait]
impl<T: InvoiceRepository + ?Sized> InvoiceRepository for Arc<T> {
    async fn list_invoices(&self, user_id: &UserId) -> Result<Vec<Invoice>, ServerError> {
        (**self).list_invoices(user_id).await
    }

    async fn find_invoice(
        &self,
        user_id: &UserId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>, ServerError> {
        (**self).find_invoice(user_id, id).await
    }

    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, ServerError> {
        (**self).insert_invoice(draft).await
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<Invoice, ServerError> {
        (**self).update_invoice(invoice).await
    }

    async fn delete_invoice(&self, id: &InvoiceId) -> Result<(), ServerError> {
        (**self).delete_invoice(id).await
    }

    async fn insert_items(
        &self,
        invoice_id: &InvoiceId,
        items: &[InvoiceItemInput],
    ) -> Result<Vec<InvoiceItem>, ServerError> {
        (**self).insert_items(invoice_id, items).await
    }

    async fn delete_items(&self, invoice_id: &InvoiceId) -> Result<(), ServerError> {
        (**self).delete_items(invoice_id).await
    }

    async fn client_exists(
        &self,
        user_id: &UserId,
        client_id: &ClientId,
    ) -> Result<bool, ServerError> {
        (**self).client_exists(user_id, client_id).await
    }
}
