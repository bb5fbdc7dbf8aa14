use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    datasources::{
        ClientNoteRowModel, ClientRowModel, InvoiceItemRowModel, InvoiceRowModel, StoreDatasource,
    },
    errors::{StoreConstraintViolation, StoreRowNotFound},
};

const INVOICES: &str = "invoices";
const INVOICE_ITEMS: &str = "invoice_items";
const CLIENTS: &str = "clients";
const CLIENT_NOTES: &str = "client_notes";

#[derive(Debug, Default)]
struct Tables {
    invoices: Vec<InvoiceRowModel>,
    invoice_items: Vec<InvoiceItemRowModel>,
    clients: Vec<ClientRowModel>,
    client_notes: Vec<ClientNoteRowModel>,
}

/// Store kept in process memory, with the same key, foreign-key and cascade
/// behaviour as the hosted tables. Writes are serialized by a lock.
///
/// `invoices.client_id` references `clients.id` with `ON DELETE RESTRICT`;
/// item and note rows cascade from their parent.
#[derive(Debug, Default)]
pub struct InMemoryStoreDatasource {
    tables: RwLock<Tables>,
}

impl InMemoryStoreDatasource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn invoice_count(&self) -> usize {
        self.tables.read().await.invoices.len()
    }

    pub async fn invoice_item_count(&self) -> usize {
        self.tables.read().await.invoice_items.len()
    }
}

impl Tables {
    fn check_invoice_client(&self, row: &InvoiceRowModel) -> Result<(), ServerError> {
        if !self.clients.iter().any(|c| c.id == row.client_id) {
            return Err(StoreConstraintViolation::new(
                INVOICES,
                "client_id references a missing client",
            ));
        }
        Ok(())
    }
}

fn replace_row<T, F>(rows: &mut [T], table: &str, id: &str, matches: F, row: T) -> Result<T, ServerError>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let slot = rows
        .iter_mut()
        .find(|r| matches(r))
        .ok_or_else(|| StoreRowNotFound::new(table, id))?;
    *slot = row.clone();
    Ok(row)
}

#[async_trait]
impl StoreDatasource for InMemoryStoreDatasource {
    async fn insert_invoice(&self, row: InvoiceRowModel) -> Result<InvoiceRowModel, ServerError> {
        let mut tables = self.tables.write().await;
        tables.check_invoice_client(&row)?;
        if tables.invoices.iter().any(|r| r.id == row.id) {
            return Err(StoreConstraintViolation::new(INVOICES, "duplicate primary key"));
        }
        tables.invoices.push(row.clone());
        Ok(row)
    }

    async fn select_invoices(&self, user_id: &str) -> Result<Vec<InvoiceRowModel>, ServerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .invoices
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn select_invoice(&self, id: &str) -> Result<Option<InvoiceRowModel>, ServerError> {
        let tables = self.tables.read().await;
        Ok(tables.invoices.iter().find(|r| r.id == id).cloned())
    }

    async fn update_invoice(&self, row: InvoiceRowModel) -> Result<InvoiceRowModel, ServerError> {
        let mut tables = self.tables.write().await;
        tables.check_invoice_client(&row)?;
        let id = row.id.clone();
        replace_row(&mut tables.invoices, INVOICES, &id, |r| r.id == id, row)
    }

    async fn delete_invoice(&self, id: &str) -> Result<(), ServerError> {
        let mut tables = self.tables.write().await;
        let before = tables.invoices.len();
        tables.invoices.retain(|r| r.id != id);
        if tables.invoices.len() == before {
            return Err(StoreRowNotFound::new(INVOICES, id));
        }
        let before_items = tables.invoice_items.len();
        tables.invoice_items.retain(|r| r.invoice_id != id);
        debug!(
            invoice_id = id,
            cascaded = before_items - tables.invoice_items.len(),
            "deleted invoice"
        );
        Ok(())
    }

    async fn insert_invoice_items(
        &self,
        rows: Vec<InvoiceItemRowModel>,
    ) -> Result<Vec<InvoiceItemRowModel>, ServerError> {
        let mut tables = self.tables.write().await;
        // All-or-nothing, like a single multi-row insert.
        for row in &rows {
            if !tables.invoices.iter().any(|i| i.id == row.invoice_id) {
                return Err(StoreConstraintViolation::new(
                    INVOICE_ITEMS,
                    "invoice_id references a missing invoice",
                ));
            }
            if tables.invoice_items.iter().any(|r| r.id == row.id) {
                return Err(StoreConstraintViolation::new(INVOICE_ITEMS, "duplicate primary key"));
            }
        }
        tables.invoice_items.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn select_invoice_items(
        &self,
        invoice_id: &str,
    ) -> Result<Vec<InvoiceItemRowModel>, ServerError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables
            .invoice_items
            .iter()
            .filter(|r| r.invoice_id == invoice_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.position);
        Ok(rows)
    }

    async fn delete_invoice_items(&self, invoice_id: &str) -> Result<(), ServerError> {
        let mut tables = self.tables.write().await;
        tables.invoice_items.retain(|r| r.invoice_id != invoice_id);
        Ok(())
    }

    async fn insert_client(&self, row: ClientRowModel) -> Result<ClientRowModel, ServerError> {
        let mut tables = self.tables.write().await;
        if tables.clients.iter().any(|r| r.id == row.id) {
            return Err(StoreConstraintViolation::new(CLIENTS, "duplicate primary key"));
        }
        tables.clients.push(row.clone());
        Ok(row)
    }

    async fn select_clients(&self, user_id: &str) -> Result<Vec<ClientRowModel>, ServerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn select_client(&self, id: &str) -> Result<Option<ClientRowModel>, ServerError> {
        let tables = self.tables.read().await;
        Ok(tables.clients.iter().find(|r| r.id == id).cloned())
    }

    async fn update_client(&self, row: ClientRowModel) -> Result<ClientRowModel, ServerError> {
        let mut tables = self.tables.write().await;
        let id = row.id.clone();
        replace_row(&mut tables.clients, CLIENTS, &id, |r| r.id == id, row)
    }

    async fn update_client_notes(&self, id: &str, notes: &str) -> Result<(), ServerError> {
        let mut tables = self.tables.write().await;
        let client = tables
            .clients
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreRowNotFound::new(CLIENTS, id))?;
        client.notes = notes.to_string();
        Ok(())
    }

    async fn delete_client(&self, id: &str) -> Result<(), ServerError> {
        let mut tables = self.tables.write().await;
        if tables.invoices.iter().any(|r| r.client_id == id) {
            return Err(StoreConstraintViolation::new(
                INVOICES,
                "client is still referenced by invoices",
            ));
        }
        let before = tables.clients.len();
        tables.clients.retain(|r| r.id != id);
        if tables.clients.len() == before {
            return Err(StoreRowNotFound::new(CLIENTS, id));
        }
        tables.client_notes.retain(|r| r.client_id != id);
        Ok(())
    }

    async fn insert_client_note(
        &self,
        row: ClientNoteRowModel,
    ) -> Result<ClientNoteRowModel, ServerError> {
        let mut tables = self.tables.write().await;
        if !tables.clients.iter().any(|c| c.id == row.client_id) {
            return Err(StoreConstraintViolation::new(
                CLIENT_NOTES,
                "client_id references a missing client",
            ));
        }
        if tables.client_notes.iter().any(|r| r.id == row.id) {
            return Err(StoreConstraintViolation::new(CLIENT_NOTES, "duplicate primary key"));
        }
        tables.client_notes.push(row.clone());
        Ok(row)
    }

    async fn select_client_notes(
        &self,
        client_id: &str,
    ) -> Result<Vec<ClientNoteRowModel>, ServerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .client_notes
            .iter()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn update_client_note(
        &self,
        row: ClientNoteRowModel,
    ) -> Result<ClientNoteRowModel, ServerError> {
        let mut tables = self.tables.write().await;
        let id = row.id.clone();
        replace_row(&mut tables.client_notes, CLIENT_NOTES, &id, |r| r.id == id, row)
    }

    async fn delete_client_note(&self, id: &str) -> Result<(), ServerError> {
        let mut tables = self.tables.write().await;
        let before = tables.client_notes.len();
        tables.client_notes.retain(|r| r.id != id);
        if tables.client_notes.len() == before {
            return Err(StoreRowNotFound::new(CLIENT_NOTES, id));
        }
        Ok(())
    }
}
