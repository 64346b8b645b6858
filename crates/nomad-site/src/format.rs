//! Display formatting for listing values.

/// Currency symbol prefixed to income amounts.
pub const CURRENCY_SYMBOL: &str = "€";

/// Format a monthly income with thousands separators and the currency symbol.
///
/// Whole amounts print without decimals; any fraction prints as two decimals.
///
/// ```
/// assert_eq!(nomad_site::format_income(2500.0), "€2,500");
/// assert_eq!(nomad_site::format_income(1234567.5), "€1,234,567.50");
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_income(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let sign = if amount < 0.0 && cents != 0 { "-" } else { "" };
    let decimals = if fraction == 0 {
        String::new()
    } else {
        format!(".{fraction:02}")
    };

    format!("{sign}{CURRENCY_SYMBOL}{}{decimals}", group_thousands(whole))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
