use iso_currency::Currency;
use num_format::ToFormattedString as _;

use crate::entities::LanguageTag;

/// Standard number decimal places for the given currency
/// (ex. JPY = 0, USD = 2).
fn decimal_places(currency: Currency) -> u32 {
    currency.exponent().unwrap_or(0) as u32
}

pub fn currency_symbol(language: LanguageTag) -> &'static str {
    language.symbol()
}

/// Formats an amount in the currency bound to `language`, using that
/// locale's grouping (ex. "$1,234.50", "-¥1,235").
///
/// Rounds half away from zero to the currency's minor unit. A value that
/// rounds to zero is shown without a sign.
pub fn format_currency(amount: f64, language: LanguageTag) -> String {
    let currency = language.currency();
    let locale = language.locale();
    let decimal_places = decimal_places(currency);
    let scale = 10_i64.pow(decimal_places);

    let minor_units = (amount.abs() * scale as f64).round() as i64;
    let sign = if amount < 0.0 && minor_units != 0 {
        "-"
    } else {
        ""
    };
    let integer_part = (minor_units / scale).to_formatted_string(&locale);

    if decimal_places == 0 {
        format!("{}{}{}", sign, language.symbol(), integer_part)
    } else {
        format!(
            "{}{}{}{}{:0width$}",
            sign,
            language.symbol(),
            integer_part,
            locale.decimal(),
            minor_units % scale,
            width = decimal_places as usize,
        )
    }
}
