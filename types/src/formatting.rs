//! Display formatting helpers shared by catalog UIs.

/// Format a price in dollars with two decimals and thousands separators.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    // Insert thousands separators into the whole part.
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}
