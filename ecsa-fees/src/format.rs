//! Display formatting for rand amounts and percentages, and lenient parsing
//! of user-typed numbers.

use crate::error::ParseAmountError;

/// Insert `separator` between groups of three digits.
///
/// `digits` must be a plain run of ASCII digits, optionally with a leading
/// `-`.
pub fn group_digits(digits: &str, separator: char) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a rand amount, e.g. `R 1 234 567.89`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("R {value}");
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("R {sign}{}.{cents}", group_digits(whole, ' '))
}

/// Format a percentage with up to two decimals, e.g. `12.5%`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}%");
    }

    let fixed = format!("{:.2}", value.abs());
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (trimmed, None),
    };
    let sign = if value < 0.0 && trimmed != "0" { "-" } else { "" };

    match fraction {
        Some(fraction) => format!("{sign}{}.{fraction}%", group_digits(whole, ',')),
        None => format!("{sign}{}%", group_digits(whole, ',')),
    }
}

/// Format an adjustment multiplier with three decimals.
pub fn format_multiplier(value: f64) -> String {
    format!("{value:.3}")
}

/// Read a number out of free-form text such as `"R 1,250,000.50"`.
///
/// Everything except digits, `.` and `-` is discarded first. Text with no
/// digits left is zero.
pub fn parse_number(text: &str) -> Result<f64, ParseAmountError> {
    let normalized: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();

    if normalized.is_empty() {
        return Ok(0.0);
    }

    normalized
        .parse::<f64>()
        .map_err(|_| ParseAmountError::Malformed(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("0", ' '), "0");
        assert_eq!(group_digits("999", ' '), "999");
        assert_eq!(group_digits("1000", ' '), "1 000");
        assert_eq!(group_digits("1000000", ','), "1,000,000");
        assert_eq!(group_digits("-12345", ','), "-12,345");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "R 0.00");
        assert_eq!(format_currency(255_000.0), "R 255 000.00");
        assert_eq!(format_currency(1_234_567.891), "R 1 234 567.89");
        assert_eq!(format_currency(243_843.75), "R 243 843.75");
        assert_eq!(format_currency(-1_500.5), "R -1 500.50");
        assert_eq!(format_currency(-0.001), "R 0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.0), "10%");
        assert_eq!(format_percent(12.5), "12.5%");
        assert_eq!(format_percent(33.333), "33.33%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(1_250.0), "1,250%");
        assert_eq!(format_percent(-5.25), "-5.25%");
    }

    #[test]
    fn test_format_multiplier() {
        assert_eq!(format_multiplier(1.0), "1.000");
        assert_eq!(format_multiplier(0.33), "0.330");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("").unwrap(), 0.0);
        assert_eq!(parse_number("R").unwrap(), 0.0);
        assert_eq!(parse_number("1500000").unwrap(), 1_500_000.0);
        assert_eq!(parse_number("R 1,250,000.50").unwrap(), 1_250_000.5);
        assert_eq!(parse_number("R 1 234 567.89").unwrap(), 1_234_567.89);
        assert_eq!(parse_number("-20").unwrap(), -20.0);
        assert_eq!(
            parse_number("1.2.3"),
            Err(ParseAmountError::Malformed("1.2.3".to_string()))
        );
        assert!(parse_number("-").is_err());
    }

    #[test]
    fn test_currency_output_parses_back() {
        let value = 9_876_543.21;
        assert_eq!(parse_number(&format_currency(value)).unwrap(), value);
    }
}
