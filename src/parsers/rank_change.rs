use super::numbers::leading_int;

const UP_ARROW: &str = "▲";
const DOWN_ARROW: &str = "▼";

/// Signed rank movement from the change column.
///
/// `-` and empty mean no movement. Arrow glyphs stand in for the sign.
/// Anything that still is not a number after cleanup counts as 0.
pub fn parse_rank_change(token: &str) -> i32 {
    let token = token.trim();
    if token.is_empty() || token == "-" {
        return 0;
    }

    let cleaned = token.replacen(UP_ARROW, "", 1).replacen(DOWN_ARROW, "-", 1);
    leading_int(&cleaned)
        .and_then(|value| i32::try_from(value).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_empty_are_zero() {
        assert_eq!(parse_rank_change("-"), 0);
        assert_eq!(parse_rank_change(""), 0);
        assert_eq!(parse_rank_change("   "), 0);
    }

    #[test]
    fn arrows_set_the_sign() {
        assert_eq!(parse_rank_change("▲5"), 5);
        assert_eq!(parse_rank_change("▼5"), -5);
        assert_eq!(parse_rank_change("▲ 2"), 2);
    }

    #[test]
    fn plain_signed_numbers() {
        assert_eq!(parse_rank_change("-3"), -3);
        assert_eq!(parse_rank_change("+4"), 4);
        assert_eq!(parse_rank_change("7"), 7);
    }

    #[test]
    fn garbage_is_zero() {
        assert_eq!(parse_rank_change("new"), 0);
        assert_eq!(parse_rank_change("▲"), 0);
    }
}
