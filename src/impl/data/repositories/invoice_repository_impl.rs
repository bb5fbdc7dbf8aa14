use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use futures::{stream, StreamExt as _, TryStreamExt as _};
use uuid::Uuid;

use crate::{
    datasources::{InvoiceItemRowModel, InvoiceRowModel, StoreDatasource},
    entities::{
        ClientId, Invoice, InvoiceDraft, InvoiceId, InvoiceItem, InvoiceItemInput, UserId,
    },
    repositories::InvoiceRepository,
};

pub struct InvoiceRepositoryImpl<DS: StoreDatasource> {
    datasource: Arc<DS>,
}

impl<DS: StoreDatasource> InvoiceRepositoryImpl<DS> {
    pub fn new(datasource: Arc<DS>) -> Self {
        Self { datasource }
    }

    async fn load_items(&self, invoice_id: &str) -> Result<Vec<InvoiceItem>, ServerError> {
        Ok(self
            .datasource
            .select_invoice_items(invoice_id)
            .await?
            .into_iter()
            .map(InvoiceItem::from)
            .collect())
    }

    async fn hydrate(&self, row: InvoiceRowModel) -> Result<Invoice, ServerError> {
        let items = self.load_items(&row.id).await?;
        row.into_invoice(items)
    }
}

#[async_trait]
impl<DS: StoreDatasource> InvoiceRepository for InvoiceRepositoryImpl<DS> {
    async fn list_invoices(&self, user_id: &UserId) -> Result<Vec<Invoice>, ServerError> {
        let rows = self.datasource.select_invoices(user_id.as_str()).await?;
        let mut invoices: Vec<Invoice> = stream::iter(rows)
            .then(|row| self.hydrate(row))
            .try_collect()
            .await?;
        invoices.sort_by(|a, b| {
            b.issue_date
                .cmp(&a.issue_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(invoices)
    }

    async fn find_invoice(
        &self,
        user_id: &UserId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>, ServerError> {
        match self.datasource.select_invoice(id.as_str()).await? {
            Some(row) if row.user_id == user_id.as_str() => Ok(Some(self.hydrate(row).await?)),
            _ => Ok(None),
        }
    }

    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, ServerError> {
        let id = InvoiceId(Uuid::new_v4().to_string());
        let row = self
            .datasource
            .insert_invoice(InvoiceRowModel::from_draft(&id, &draft))
            .await?;
        row.into_invoice(Vec::new())
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<Invoice, ServerError> {
        let row = self
            .datasource
            .update_invoice(InvoiceRowModel::from_invoice(invoice))
            .await?;
        row.into_invoice(invoice.items.clone())
    }

    async fn delete_invoice(&self, id: &InvoiceId) -> Result<(), ServerError> {
        self.datasource.delete_invoice(id.as_str()).await
    }

    async fn insert_items(
        &self,
        invoice_id: &InvoiceId,
        items: &[InvoiceItemInput],
    ) -> Result<Vec<InvoiceItem>, ServerError> {
        let rows = items
            .iter()
            .enumerate()
            .map(|(position, input)| {
                InvoiceItemRowModel::from_input(
                    Uuid::new_v4().to_string(),
                    invoice_id,
                    position as u32,
                    input,
                )
            })
            .collect();
        Ok(self
            .datasource
            .insert_invoice_items(rows)
            .await?
            .into_iter()
            .map(InvoiceItem::from)
            .collect())
    }

    async fn delete_items(&self, invoice_id: &InvoiceId) -> Result<(), ServerError> {
        self.datasource.delete_invoice_items(invoice_id.as_str()).await
    }

    async fn client_exists(
        &self,
        user_id: &UserId,
        client_id: &ClientId,
    ) -> Result<bool, ServerError> {
        Ok(self
            .datasource
            .select_client(client_id.as_str())
            .await?
            .is_some_and(|row| row.user_id == user_id.as_str()))
    }
}
