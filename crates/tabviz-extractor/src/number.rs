//! Numeric literal normalization

use crate::error::ExtractorError;

/// Parse a numeric-looking substring into a finite `f64`.
///
/// Strips currency symbols (`$`, `£`, `€`), thousands separators and
/// surrounding whitespace. Anything else that is not a plain float literal
/// is rejected with [`ExtractorError::UnparsableNumber`]; callers treat that
/// as "skip this candidate".
pub fn normalize_number(raw: &str) -> Result<f64, ExtractorError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ','))
        .collect();
    let cleaned = cleaned.trim();

    // Rust also parses "inf" and "NaN"; only digits count as numbers here
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(ExtractorError::UnparsableNumber(raw.to_string()));
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ExtractorError::UnparsableNumber(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(normalize_number("42").unwrap(), 42.0);
        assert_eq!(normalize_number(" 3.5 ").unwrap(), 3.5);
        assert_eq!(normalize_number("-7").unwrap(), -7.0);
    }

    #[test]
    fn test_currency_and_separators() {
        assert_eq!(normalize_number("$10,000").unwrap(), 10_000.0);
        assert_eq!(normalize_number("£1,234.50").unwrap(), 1_234.5);
        assert_eq!(normalize_number("€ 99").unwrap(), 99.0);
        assert_eq!(normalize_number("-$5").unwrap(), -5.0);
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert!(matches!(
            normalize_number("abc"),
            Err(ExtractorError::UnparsableNumber(s)) if s == "abc"
        ));
        assert!(normalize_number("").is_err());
        assert!(normalize_number("$").is_err());
        assert!(normalize_number("1.2.3").is_err());
        assert!(normalize_number("inf").is_err());
        assert!(normalize_number("NaN").is_err());
        assert!(normalize_number("1e999").is_err());
    }
}
