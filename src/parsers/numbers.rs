/// Parse the integer at the start of `input`, ignoring leading whitespace
/// and anything after the digits. `"12th"` gives 12, `"-3"` gives -3 and
/// `"abc"` gives `None`.
pub fn leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// BWF points are printed with thousands separators ("110,397")
pub fn parse_points(raw: &str) -> Option<i64> {
    leading_int(&raw.replace(',', ""))
}

/// Integer column of a pasted row; unparseable cells count as 0
pub fn int_column(raw: &str) -> i32 {
    leading_int(raw)
        .and_then(|value| i32::try_from(value).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_leading_digits() {
        assert_eq!(leading_int("42"), Some(42));
        assert_eq!(leading_int("  7 pts"), Some(7));
        assert_eq!(leading_int("+5"), Some(5));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("1.9"), Some(1));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int("n/a"), None);
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_points("110,397"), Some(110_397));
        assert_eq!(parse_points("1,002,003"), Some(1_002_003));
        assert_eq!(parse_points("n/a"), None);
    }

    #[test]
    fn blank_integer_column_is_zero() {
        assert_eq!(int_column(""), 0);
        assert_eq!(int_column("12"), 12);
        assert_eq!(int_column("99999999999"), 0);
    }
}
