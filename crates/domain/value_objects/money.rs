/// Renders an amount stored in minor currency units as a major-unit string with two decimals
/// and `,` thousands separators, e.g. `123456` -> `"1,234.56"`.
///
/// Integer-only so no rounding mode is involved.
pub fn format_minor_units(amount: i64) -> String {
    let negative = amount < 0;
    let abs = amount.unsigned_abs();
    let major = abs / 100;
    let minor = abs % 100;

    let digits = major.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}.{minor:02}")
    } else {
        format!("{grouped}.{minor:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_amounts() {
        assert_eq!(format_minor_units(0), "0.00");
        assert_eq!(format_minor_units(5), "0.05");
        assert_eq!(format_minor_units(1000), "10.00");
        assert_eq!(format_minor_units(1999), "19.99");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_minor_units(123_456), "1,234.56");
        assert_eq!(format_minor_units(100_000_000), "1,000,000.00");
        assert_eq!(format_minor_units(9_999_999), "99,999.99");
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(format_minor_units(-250), "-2.50");
        assert_eq!(format_minor_units(-123_456), "-1,234.56");
    }

    #[test]
    fn handles_extremes() {
        assert_eq!(format_minor_units(i64::MIN), "-92,233,720,368,547,758.08");
    }
}
