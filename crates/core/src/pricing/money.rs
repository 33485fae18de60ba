use rust_decimal::{Decimal, RoundingStrategy};

use super::round_foreign;

pub const LOCAL_SUFFIX: &str = "L";

/// Whole lek with `,` thousands separators: `1300 -> "1,300L"`.
pub fn format_local(amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if whole < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{}{LOCAL_SUFFIX}", group_thousands(&whole.abs().trunc().to_string()))
}

/// Two decimals, grouped, followed by the currency code: `"1,234.50 EUR"`.
pub fn format_foreign(amount: Decimal, currency_code: &str) -> String {
    let rounded = round_foreign(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("{sign}{}.{cents} {currency_code}", group_thousands(whole))
}

/// PayPal `amount.value`: no grouping, exactly two decimals.
pub fn to_paypal_value(amount: Decimal) -> String {
    format!("{:.2}", round_foreign(amount))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
