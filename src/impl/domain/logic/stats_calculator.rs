use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};

use crate::entities::{Invoice, InvoiceStats, InvoiceStatus, YearMonth};

/// Dashboard aggregates over already-fetched invoices.
pub fn summarize_invoices(invoices: &[Invoice], as_of: NaiveDate) -> InvoiceStats {
    let mut count_by_status = BTreeMap::new();
    let mut paid_by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();
    let mut total_billed = 0.0;
    let mut total_paid = 0.0;
    let mut total_outstanding = 0.0;
    let mut past_due_pending = 0;

    for invoice in invoices {
        *count_by_status.entry(invoice.status).or_insert(0) += 1;
        total_billed += invoice.amount;
        match invoice.status {
            InvoiceStatus::Paid => {
                total_paid += invoice.amount;
                // Older rows may be paid without a stamp; bucket them by issue date.
                let paid_on = invoice
                    .paid_at
                    .map(|t| t.date_naive())
                    .unwrap_or(invoice.issue_date);
                let key = YearMonth {
                    year: paid_on.year(),
                    month: paid_on.month(),
                };
                *paid_by_month.entry(key).or_insert(0.0) += invoice.amount;
            }
            InvoiceStatus::Pending => {
                total_outstanding += invoice.amount;
                if invoice.due_date.is_some_and(|due| due < as_of) {
                    past_due_pending += 1;
                }
            }
            InvoiceStatus::Overdue => {
                total_outstanding += invoice.amount;
            }
        }
    }

    InvoiceStats {
        as_of,
        invoice_count: invoices.len(),
        count_by_status,
        total_billed,
        total_paid,
        total_outstanding,
        past_due_pending,
        paid_by_month,
    }
}
