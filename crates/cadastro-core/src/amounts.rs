//! Parsing and formatting of monetary amounts.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount written either Brazilian style ("1.500,00") or plain
/// ("1500.00").
///
/// When both separators appear, the one that comes last is the decimal
/// separator. A lone dot followed by exactly three digits ("1.500") is read
/// as a thousands separator, as are repeated dots ("1.250.000").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let negative = s.trim_start().starts_with('-');
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        (None, Some(d)) => {
            let dots = cleaned.matches('.').count();
            if dots > 1 || cleaned.len() - d - 1 == 3 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Format an amount with two decimals and comma thousands separators
/// (1,234.56).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2).abs());
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}.{}", formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.500,00"), Some(dec("1500.00")));
        assert_eq!(parse_amount("R$ 1.234.567,89"), Some(dec("1234567.89")));
        assert_eq!(parse_amount("1500.50"), Some(dec("1500.50")));
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("250,5"), Some(dec("250.5")));
        assert_eq!(parse_amount("1.500"), Some(dec("1500")));
        assert_eq!(parse_amount("1.250.000"), Some(dec("1250000")));
        assert_eq!(parse_amount("-10,00"), Some(dec("-10.00")));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1500")), "1,500.00");
        assert_eq!(format_amount(dec("12345678.9")), "12,345,678.90");
        assert_eq!(format_amount(dec("999.999")), "1,000.00");
        assert_eq!(format_amount(dec("0.5")), "0.50");
        assert_eq!(format_amount(dec("-2500")), "-2,500.00");
    }
}
