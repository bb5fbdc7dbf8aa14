use chrono::{DateTime, NaiveDate, Utc};
use fractic_server_error::ServerError;

use crate::entities::{
    ClientId, Invoice, InvoiceDraft, InvoiceId, InvoiceItem, InvoiceItemId, InvoiceItemInput,
    InvoiceStatus, UserId,
};

/// Row of the `invoices` table.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct InvoiceRowModel {
    pub id: String,
    pub user_id: String,
    pub client_id: String,
    pub amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub notes: Option<String>,
    pub tax_rate: f64,
    pub includes_tax: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `invoice_items` table. `invoice_id` references `invoices.id`
/// with `ON DELETE CASCADE`.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct InvoiceItemRowModel {
    pub id: String,
    pub invoice_id: String,
    pub description: String,
    pub quantity: i64,
    pub rate: f64,
    pub amount: f64,
    pub position: u32,
}

// --

impl InvoiceRowModel {
    pub(crate) fn from_draft(id: &InvoiceId, draft: &InvoiceDraft) -> Self {
        Self {
            id: id.to_string(),
            user_id: draft.user_id.to_string(),
            client_id: draft.client_id.to_string(),
            amount: draft.amount,
            issue_date: draft.issue_date,
            due_date: draft.due_date,
            status: draft.status.to_string(),
            notes: draft.notes.clone(),
            tax_rate: draft.tax_rate,
            includes_tax: draft.includes_tax,
            payment_date: draft.paid_at,
            created_at: draft.created_at,
        }
    }

    pub(crate) fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.to_string(),
            user_id: invoice.user_id.to_string(),
            client_id: invoice.client_id.to_string(),
            amount: invoice.amount,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            status: invoice.status.to_string(),
            notes: invoice.notes.clone(),
            tax_rate: invoice.tax_rate,
            includes_tax: invoice.includes_tax,
            payment_date: invoice.paid_at,
            created_at: invoice.created_at,
        }
    }

    pub(crate) fn into_invoice(self, items: Vec<InvoiceItem>) -> Result<Invoice, ServerError> {
        Ok(Invoice {
            status: self.status.parse::<InvoiceStatus>()?,
            id: InvoiceId(self.id),
            user_id: UserId(self.user_id),
            client_id: ClientId(self.client_id),
            amount: self.amount,
            issue_date: self.issue_date,
            due_date: self.due_date,
            notes: self.notes,
            tax_rate: self.tax_rate,
            includes_tax: self.includes_tax,
            paid_at: self.payment_date,
            created_at: self.created_at,
            items,
        })
    }
}

impl InvoiceItemRowModel {
    pub(crate) fn from_input(
        id: String,
        invoice_id: &InvoiceId,
        position: u32,
        input: &InvoiceItemInput,
    ) -> Self {
        Self {
            id,
            invoice_id: invoice_id.to_string(),
            description: input.description.trim().to_string(),
            quantity: input.quantity,
            rate: input.rate,
            amount: crate::billing::line_amount(input.quantity, input.rate),
            position,
        }
    }
}

impl From<InvoiceItemRowModel> for InvoiceItem {
    fn from(row: InvoiceItemRowModel) -> Self {
        InvoiceItem {
            id: InvoiceItemId(row.id),
            description: row.description,
            quantity: row.quantity,
            rate: row.rate,
            amount: row.amount,
        }
    }
}
