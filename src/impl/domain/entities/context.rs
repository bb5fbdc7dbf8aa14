use iso_currency::Currency;
use num_format::Locale;

use super::ids::UserId;

/// Display language, each bound to exactly one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde_derive::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    #[default]
    En,
    Ja,
}

impl LanguageTag {
    /// Resolves a BCP 47 style tag ("ja", "ja-JP", "en-US", ...). Anything that
    /// is not Japanese falls through to the default.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ja" => LanguageTag::Ja,
            _ => LanguageTag::default(),
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            LanguageTag::En => Currency::USD,
            LanguageTag::Ja => Currency::JPY,
        }
    }

    /// Display symbol of the bound currency.
    pub fn symbol(&self) -> &'static str {
        match self {
            LanguageTag::En => "$",
            LanguageTag::Ja => "¥",
        }
    }

    pub(crate) fn locale(&self) -> Locale {
        match self {
            LanguageTag::En => Locale::en,
            LanguageTag::Ja => Locale::ja,
        }
    }
}

/// The authenticated caller of a usecase, passed explicitly into every call.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: UserId,
    pub language: LanguageTag,
}

impl SessionContext {
    pub fn new(user_id: UserId, language: LanguageTag) -> Self {
        Self { user_id, language }
    }
}
