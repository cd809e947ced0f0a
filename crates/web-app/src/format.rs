/// Format an amount of Vietnamese dong, e.g. `1.234.000 đ`.
#[must_use]
pub fn format_vnd(amount: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{grouped} đ")
    } else {
        format!("{grouped} đ")
    }
}

/// Format a weight given in grams.
#[must_use]
pub fn format_weight(grams: u32) -> String {
    if grams >= 1000 {
        format!("{:.1} kg", f64::from(grams) / 1000.0)
    } else {
        format!("{grams} g")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, "0 đ")]
    #[case(999.0, "999 đ")]
    #[case(1000.0, "1.000 đ")]
    #[case(35_000.0, "35.000 đ")]
    #[case(1_234_567.4, "1.234.567 đ")]
    #[case(-12_500.0, "-12.500 đ")]
    fn test_format_vnd(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_vnd(amount), expected);
    }

    #[rstest]
    #[case(200, "200 g")]
    #[case(1000, "1.0 kg")]
    #[case(1550, "1.6 kg")]
    fn test_format_weight(#[case] grams: u32, #[case] expected: &str) {
        assert_eq!(format_weight(grams), expected);
    }
}
