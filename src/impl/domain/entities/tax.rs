/// Whether the quoted subtotal already contains tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxMode {
    /// Tax is added on top of the subtotal.
    Exclusive,
    /// The subtotal is already gross; net and tax are back-calculated.
    Inclusive,
}

impl TaxMode {
    pub fn from_includes_tax(includes_tax: bool) -> Self {
        if includes_tax {
            TaxMode::Inclusive
        } else {
            TaxMode::Exclusive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBreakdown {
    pub net: f64,
    pub tax: f64,
    pub gross: f64,
}
