use crate::{
    domain::logic::line_item_aggregator::subtotal,
    entities::{InvoiceItemInput, TaxBreakdown, TaxMode},
};

/// Derives net, tax and gross from a subtotal.
///
/// With tax added on top, the subtotal is the net amount. With tax-inclusive
/// pricing the subtotal is already gross and the net is back-calculated, so
/// the two modes are inverses of each other (up to floating-point error).
///
/// Negative subtotals are not rejected and simply yield negative amounts.
pub fn compute_amounts(subtotal: f64, tax_rate_percent: f64, includes_tax: bool) -> TaxBreakdown {
    match TaxMode::from_includes_tax(includes_tax) {
        TaxMode::Exclusive => {
            let net = subtotal;
            let tax = subtotal * tax_rate_percent / 100.0;
            TaxBreakdown {
                net,
                tax,
                gross: net + tax,
            }
        }
        TaxMode::Inclusive => {
            let gross = subtotal;
            let net = subtotal / (1.0 + tax_rate_percent / 100.0);
            TaxBreakdown {
                net,
                tax: gross - net,
                gross,
            }
        }
    }
}

/// Live preview of an invoice form: aggregates the lines, then applies tax.
pub fn compute_invoice_amounts(
    items: &[InvoiceItemInput],
    tax_rate_percent: f64,
    includes_tax: bool,
) -> TaxBreakdown {
    compute_amounts(subtotal(items), tax_rate_percent, includes_tax)
}
