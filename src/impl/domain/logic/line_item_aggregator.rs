use crate::entities::InvoiceItemInput;

/// Amount of a single line.
pub fn line_amount(quantity: i64, rate: f64) -> f64 {
    quantity as f64 * rate
}

/// Sum of `quantity * rate` over all lines, in order. Inputs are expected to
/// be validated already.
pub fn subtotal(items: &[InvoiceItemInput]) -> f64 {
    items
        .iter()
        .fold(0.0, |acc, item| acc + line_amount(item.quantity, item.rate))
}
