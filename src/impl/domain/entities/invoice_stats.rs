use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::invoice::InvoiceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceStats {
    pub as_of: NaiveDate,
    pub invoice_count: usize,
    pub count_by_status: BTreeMap<InvoiceStatus, usize>,
    /// Gross amounts, all statuses.
    pub total_billed: f64,
    pub total_paid: f64,
    /// Pending and overdue.
    pub total_outstanding: f64,
    /// Pending invoices whose due date is before `as_of`. They are reported
    /// here but their status is left alone.
    pub past_due_pending: usize,
    /// Paid gross per month of the payment date.
    pub paid_by_month: BTreeMap<YearMonth, f64>,
}
