/// Turn a shelf price such as `"Kz 1.000,50"` into a number.
///
/// Only digits, `,` and `.` are kept. When both separators appear, the one
/// appearing later is the decimal separator and the other groups thousands;
/// a lone comma is a decimal separator. Anything that still fails to parse
/// becomes `0.0`.
pub fn clean_price(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = match (kept.rfind(','), kept.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => kept.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => kept.replace(',', ""),
        (Some(_), None) => kept.replace(',', "."),
        _ => kept,
    };

    normalized.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_price_plain_values() {
        assert_eq!(clean_price("99.99"), 99.99);
        assert_eq!(clean_price("1500"), 1500.0);
    }

    #[test]
    fn test_clean_price_mixed_separators() {
        assert_eq!(clean_price("1.000,50"), 1000.50);
        assert_eq!(clean_price("Kz 12.345,00"), 12345.0);
        assert_eq!(clean_price("1,000.50 AKZ"), 1000.50);
    }

    #[test]
    fn test_clean_price_lone_comma_is_decimal() {
        assert_eq!(clean_price("2 499,90 Kz"), 2499.90);
    }

    #[test]
    fn test_clean_price_unparseable_is_zero() {
        assert_eq!(clean_price(""), 0.0);
        assert_eq!(clean_price("garbage"), 0.0);
        assert_eq!(clean_price("1.000.000"), 0.0);
        assert_eq!(clean_price("Kz"), 0.0);
    }
}
