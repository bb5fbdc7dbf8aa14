use chrono::format::{Item, StrftimeItems};
use fractic_server_error::ServerError;
use ron::from_str;

use crate::{
    domain::logic::invoice_validator::InvoiceValidator,
    entities::{LanguageTag, PaymentDatePolicy},
    errors::{InvalidNoteStampFormat, InvalidRon},
    notes::DEFAULT_NOTE_STAMP_FORMAT,
};

/// Settings shared by the usecases. Typically loaded once from RON, e.g.:
///
/// ```ron
/// (
///     default_tax_rate: 8.0,
///     default_language: ja,
///     note_stamp_format: "%Y-%m-%d %H:%M",
///     payment_date_policy: KeepOnUnpaid,
/// )
/// ```
///
/// Omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct CoachlyticConfig {
    /// Percentage applied when an invoice doesn't specify one.
    pub default_tax_rate: f64,
    pub default_language: LanguageTag,
    /// chrono format used to stamp journal notes.
    pub note_stamp_format: String,
    pub payment_date_policy: PaymentDatePolicy,
}

impl Default for CoachlyticConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: 10.0,
            default_language: LanguageTag::default(),
            note_stamp_format: DEFAULT_NOTE_STAMP_FORMAT.to_string(),
            payment_date_policy: PaymentDatePolicy::default(),
        }
    }
}

impl CoachlyticConfig {
    pub fn from_ron(s: &str) -> Result<Self, ServerError> {
        let config: CoachlyticConfig =
            from_str(s).map_err(|e| InvalidRon::with_debug("CoachlyticConfig", &e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        InvoiceValidator::validate_tax_rate(self.default_tax_rate)?;

        let format = self.note_stamp_format.as_str();
        if format.trim().is_empty() {
            return Err(InvalidNoteStampFormat::new(format, "format is empty"));
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(InvalidNoteStampFormat::new(
                format,
                "not a valid chrono format string",
            ));
        }
        // Brackets would collide with the journal's stamp delimiters.
        if format.contains(['[', ']']) || format.contains('\n') {
            return Err(InvalidNoteStampFormat::new(
                format,
                "must not contain brackets or newlines",
            ));
        }
        Ok(())
    }
}
