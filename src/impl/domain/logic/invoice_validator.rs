use fractic_server_error::ServerError;

use crate::{
    entities::{ClientId, InvoiceItemInput},
    errors::{EmptyInvoiceItems, InvalidClientReference, InvalidInvoiceItem, InvalidTaxRate},
};

/// Values the client picker submits when nothing was selected.
const PLACEHOLDER_CLIENT_IDS: &[&str] = &["none", "placeholder", "select", "undefined", "null"];

/// Form-level checks that run before any store call.
pub(crate) struct InvoiceValidator;

impl InvoiceValidator {
    pub(crate) fn validate_client(client_id: &ClientId) -> Result<(), ServerError> {
        let raw = client_id.as_str().trim();
        if raw.is_empty()
            || PLACEHOLDER_CLIENT_IDS
                .iter()
                .any(|p| p.eq_ignore_ascii_case(raw))
        {
            return Err(InvalidClientReference::new(client_id.as_str()));
        }
        Ok(())
    }

    pub(crate) fn validate_items(items: &[InvoiceItemInput]) -> Result<(), ServerError> {
        if items.is_empty() {
            return Err(EmptyInvoiceItems::new());
        }
        for (i, item) in items.iter().enumerate() {
            // 1-based, matching what the form shows.
            let position = i + 1;
            if item.description.trim().is_empty() {
                return Err(InvalidInvoiceItem::new(position, "description is empty"));
            }
            if item.quantity <= 0 {
                return Err(InvalidInvoiceItem::new(
                    position,
                    "quantity must be greater than zero",
                ));
            }
            if !item.rate.is_finite() || item.rate < 0.0 {
                return Err(InvalidInvoiceItem::new(
                    position,
                    "rate must be a non-negative number",
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn validate_tax_rate(tax_rate: f64) -> Result<(), ServerError> {
        if !tax_rate.is_finite() || tax_rate < 0.0 {
            return Err(InvalidTaxRate::new(tax_rate));
        }
        Ok(())
    }

    pub(crate) fn validate_new(
        client_id: &ClientId,
        items: &[InvoiceItemInput],
        tax_rate: f64,
    ) -> Result<(), ServerError> {
        Self::validate_client(client_id)?;
        Self::validate_items(items)?;
        Self::validate_tax_rate(tax_rate)
    }
}
