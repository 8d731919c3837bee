use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a raw cell value into a number, tolerating currency symbols,
/// thousands separators and stray characters.
///
/// Handles inputs like:
/// - "1234" -> 1234
/// - "Rs. 1,234.50" -> 1234.50
/// - "-12.5" -> -12.5
/// - "1.234.56" -> 1.23456 (first point is the separator, later points
///   are dropped; deliberate policy, see DESIGN.md)
/// - "" / "n/a" / "--" -> None
///
/// Returns None (the "absent" marker) when no usable number remains; never
/// errors. A point seen before any digit is treated as stray punctuation
/// (the dot in "Rs.") rather than a decimal separator.
pub fn clean(raw: &str) -> Option<Decimal> {
    let mut cleaned = String::with_capacity(raw.len());
    let mut seen_digit = false;
    let mut seen_point = false;

    for c in raw.trim().chars() {
        match c {
            '0'..='9' => {
                cleaned.push(c);
                seen_digit = true;
            }
            '.' if seen_digit && !seen_point => {
                cleaned.push('.');
                seen_point = true;
            }
            '-' if cleaned.is_empty() => cleaned.push('-'),
            _ => {}
        }
    }

    // Trailing separator with nothing after it: "12." -> "12"
    if cleaned.ends_with('.') {
        cleaned.pop();
    }

    if !seen_digit {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
