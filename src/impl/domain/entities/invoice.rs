use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use fractic_server_error::ServerError;

use crate::errors::InvalidInvoiceStatus;

use super::ids::{ClientId, InvoiceId, InvoiceItemId, UserId};

/// Any status is reachable from any other; nothing moves an invoice to
/// `Overdue` automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            other => Err(InvalidInvoiceStatus::new(other)),
        }
    }
}

/// A billable line as entered in the invoice form.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItemInput {
    pub description: String,
    pub quantity: i64,
    pub rate: f64,
}

impl InvoiceItemInput {
    pub fn new(description: impl Into<String>, quantity: i64, rate: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItem {
    pub id: InvoiceItemId,
    pub description: String,
    pub quantity: i64,
    pub rate: f64,
    /// Always `quantity * rate`.
    pub amount: f64,
}

impl From<&InvoiceItem> for InvoiceItemInput {
    fn from(item: &InvoiceItem) -> Self {
        Self {
            description: item.description.clone(),
            quantity: item.quantity,
            rate: item.rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub user_id: UserId,
    pub client_id: ClientId,
    /// Gross total derived from `items` at last save. Never set directly.
    pub amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub tax_rate: f64,
    pub includes_tax: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<InvoiceItem>,
}

/// Invoice row contents before the store has assigned it an id.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub user_id: UserId,
    pub client_id: ClientId,
    pub amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub tax_rate: f64,
    pub includes_tax: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub client_id: ClientId,
    pub items: Vec<InvoiceItemInput>,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    /// Falls back to the configured default rate.
    pub tax_rate: Option<f64>,
    pub includes_tax: bool,
    /// Falls back to today's date.
    pub issue_date: Option<NaiveDate>,
}

impl NewInvoice {
    pub fn new(client_id: ClientId, items: Vec<InvoiceItemInput>) -> Self {
        Self {
            client_id,
            items,
            due_date: None,
            status: InvoiceStatus::Pending,
            notes: None,
            tax_rate: None,
            includes_tax: false,
            issue_date: None,
        }
    }
}

/// Partial field update. `None` leaves a field unchanged; the nested options
/// (`due_date`, `notes`) use `Some(None)` to clear.
#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub client_id: Option<ClientId>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<Option<String>>,
    pub tax_rate: Option<f64>,
    pub includes_tax: Option<bool>,
}

impl InvoicePatch {
    pub(crate) fn changes_tax(&self) -> bool {
        self.tax_rate.is_some() || self.includes_tax.is_some()
    }
}

/// What happens to `paid_at` when an invoice leaves the `Paid` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde_derive::Deserialize)]
pub enum PaymentDatePolicy {
    #[default]
    KeepOnUnpaid,
    ClearOnUnpaid,
}

// --

impl Invoice {
    pub(crate) fn from_draft(id: InvoiceId, draft: InvoiceDraft) -> Self {
        let InvoiceDraft {
            user_id,
            client_id,
            amount,
            issue_date,
            due_date,
            status,
            notes,
            tax_rate,
            includes_tax,
            paid_at,
            created_at,
        } = draft;
        Self {
            id,
            user_id,
            client_id,
            amount,
            issue_date,
            due_date,
            status,
            notes,
            tax_rate,
            includes_tax,
            paid_at,
            created_at,
            items: Vec::new(),
        }
    }

    pub(crate) fn item_inputs(&self) -> Vec<InvoiceItemInput> {
        self.items.iter().map(InvoiceItemInput::from).collect()
    }

    /// Sets the status. Entering `Paid` stamps the payment date; leaving it
    /// follows `policy`.
    pub(crate) fn transition_to(
        &mut self,
        status: InvoiceStatus,
        now: DateTime<Utc>,
        policy: PaymentDatePolicy,
    ) {
        let was_paid = self.status == InvoiceStatus::Paid;
        match status {
            InvoiceStatus::Paid if !was_paid || self.paid_at.is_none() => {
                self.paid_at = Some(now);
            }
            InvoiceStatus::Paid => {}
            _ => {
                if policy == PaymentDatePolicy::ClearOnUnpaid {
                    self.paid_at = None;
                }
            }
        }
        self.status = status;
    }

    pub(crate) fn apply_patch(
        &mut self,
        patch: &InvoicePatch,
        now: DateTime<Utc>,
        policy: PaymentDatePolicy,
    ) {
        if let Some(client_id) = &patch.client_id {
            self.client_id = client_id.clone();
        }
        if let Some(issue_date) = patch.issue_date {
            self.issue_date = issue_date;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(tax_rate) = patch.tax_rate {
            self.tax_rate = tax_rate;
        }
        if let Some(includes_tax) = patch.includes_tax {
            self.includes_tax = includes_tax;
        }
        if let Some(status) = patch.status {
            if status != self.status {
                self.transition_to(status, now, policy);
            }
        }
    }
}
