use crate::config::settings::ImportSettings;
use crate::domain::{DetectionResult, DoublesRow, ImportFormat, ParsedRows, SinglesRow};
use crate::errors::DetectionError;

use super::numbers::int_column;

/// Column count at which a row is read as a doubles pair
pub const DOUBLES_COLUMNS: usize = 11;
/// Column count at which a row is read as a singles player
pub const SINGLES_COLUMNS: usize = 8;

/// Classify pasted ranking text and parse every usable row.
///
/// The format is decided by the column count of the first data line only.
/// Rows shorter than the chosen format are dropped.
pub fn detect_and_parse(
    raw: &str,
    settings: &ImportSettings,
) -> Result<DetectionResult, DetectionError> {
    let lines: Vec<&str> = raw.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(DetectionError::NotEnoughLines);
    }

    let data_lines = &lines[first_data_line_index(&lines)..];
    if split_columns(data_lines[0]).len() >= DOUBLES_COLUMNS {
        Ok(parse_doubles(data_lines, settings.doubles_preview))
    } else {
        Ok(parse_singles(data_lines, settings.singles_preview))
    }
}

/// A first line that does not start with a rank is a header
fn first_data_line_index(lines: &[&str]) -> usize {
    let starts_with_digit = lines[0]
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());
    if starts_with_digit { 0 } else { 1 }
}

fn split_columns(line: &str) -> Vec<&str> {
    line.split('\t').map(str::trim).collect()
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

fn parse_doubles(lines: &[&str], preview_len: usize) -> DetectionResult {
    let rows: Vec<DoublesRow> = lines
        .iter()
        .map(|line| split_columns(line))
        .filter(|columns| columns.len() >= DOUBLES_COLUMNS)
        .map(|c| DoublesRow {
            rank: int_column(c[0]),
            ranking_change: or_default(c[1], "-").to_string(),
            player1_url: c[2].to_string(),
            player1_last_name: c[3].to_string(),
            player1_first_name: c[4].to_string(),
            player2_url: c[5].to_string(),
            player2_last_name: c[6].to_string(),
            player2_first_name: c[7].to_string(),
            country_flag_url: c[8].to_string(),
            tournaments: int_column(c[9]),
            points: or_default(c[10], "0").to_string(),
        })
        .collect();

    let preview = rows.iter().take(preview_len).map(DoublesRow::pair_name).collect();

    DetectionResult {
        format: ImportFormat::Doubles,
        players_found: rows.len() * 2,
        preview,
        data: ParsedRows::Doubles(rows),
    }
}

fn parse_singles(lines: &[&str], preview_len: usize) -> DetectionResult {
    let rows: Vec<SinglesRow> = lines
        .iter()
        .map(|line| split_columns(line))
        .filter(|columns| columns.len() >= SINGLES_COLUMNS)
        .map(|c| SinglesRow {
            rank: int_column(c[0]),
            ranking_change: or_default(c[1], "-").to_string(),
            player_url: c[2].to_string(),
            last_name: c[3].to_string(),
            first_name: c[4].to_string(),
            country_flag_url: c[5].to_string(),
            tournaments: int_column(c[6]),
            points: or_default(c[7], "0").to_string(),
        })
        .collect();

    let preview = rows.iter().take(preview_len).map(SinglesRow::full_name).collect();

    DetectionResult {
        format: ImportFormat::Singles,
        players_found: rows.len(),
        preview,
        data: ParsedRows::Singles(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLES: &str = "1\t-\thttps://bwfbadminton.com/player/57945/shi-yu-qi/\tSHI\tYu Qi\thttps://extranet.bwf.sport/docs/flags-svg/china.svg\t12\t110,397\n\
2\t-\thttps://bwfbadminton.com/player/91554/anders-antonsen/\tANTONSEN\tAnders\thttps://extranet.bwf.sport/docs/flags-svg/denmark.svg\t16\t98,613";

    const DOUBLES_ROW: &str = "3\t▲1\thttps://x/player/111/a/\tLIANG\tWei Keng\thttps://x/player/222/b/\tWANG\tChang\thttps://x/flags-svg/china.svg\t14\t95,120";

    fn detect(raw: &str) -> Result<DetectionResult, DetectionError> {
        detect_and_parse(raw, &ImportSettings::default())
    }

    #[test]
    fn eight_columns_is_singles() {
        let result = detect(SINGLES).unwrap();

        assert_eq!(result.format, ImportFormat::Singles);
        assert_eq!(result.players_found, 2);
        assert_eq!(result.preview, vec!["Yu Qi SHI", "Anders ANTONSEN"]);

        let ParsedRows::Singles(rows) = result.data else {
            panic!("expected singles rows");
        };
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].first_name, "Yu Qi");
        assert_eq!(rows[0].last_name, "SHI");
        assert_eq!(rows[0].tournaments, 12);
        assert_eq!(rows[0].points, "110,397");
    }

    #[test]
    fn eleven_columns_is_doubles() {
        let raw = format!("{DOUBLES_ROW}\n{DOUBLES_ROW}");
        let result = detect(&raw).unwrap();

        assert_eq!(result.format, ImportFormat::Doubles);
        assert_eq!(result.players_found, 4);
        assert_eq!(result.preview[0], "Wei Keng LIANG & Chang WANG");

        let ParsedRows::Doubles(rows) = result.data else {
            panic!("expected doubles rows");
        };
        assert_eq!(rows[0].ranking_change, "▲1");
        assert_eq!(rows[0].player2_url, "https://x/player/222/b/");
        assert_eq!(rows[0].points, "95,120");
    }

    #[test]
    fn non_numeric_first_line_is_header() {
        let raw = "Rank\tChange\tPlayer\n1\t-\thttps://x/player/1/a/\tA\tB\thttps://x/flags-svg/japan.svg\t3\t1,000";
        let result = detect(raw).unwrap();

        assert_eq!(result.format, ImportFormat::Singles);
        assert_eq!(result.players_found, 1);
        assert_eq!(result.preview, vec!["B A"]);
    }

    #[test]
    fn fewer_than_two_lines_fails() {
        assert_eq!(detect(""), Err(DetectionError::NotEnoughLines));
        assert_eq!(
            detect("1\t-\turl\tA\tB\tflag\t1\t10\n\n"),
            Err(DetectionError::NotEnoughLines)
        );
    }

    #[test]
    fn short_rows_are_skipped() {
        let raw = format!("{SINGLES}\n3\t-\tincomplete");
        let result = detect(&raw).unwrap();
        assert_eq!(result.players_found, 2);
    }

    #[test]
    fn blank_cells_get_defaults() {
        let raw = "1\t\thttps://x/player/1/a/\tA\tB\tflag\t\t\n2\t-\thttps://x/player/2/a/\tC\tD\tflag\t1\t5";
        let result = detect(raw).unwrap();
        let ParsedRows::Singles(rows) = result.data else {
            panic!("expected singles rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ranking_change, "-");
        assert_eq!(rows[0].tournaments, 0);
        assert_eq!(rows[0].points, "0");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let raw = SINGLES.replace('\n', "\r\n");
        let result = detect(&raw).unwrap();
        let ParsedRows::Singles(rows) = result.data else {
            panic!("expected singles rows");
        };
        assert_eq!(rows[0].points, "110,397");
    }

    #[test]
    fn preview_is_capped() {
        let line = "1\t-\thttps://x/player/1/a/\tA\tB\tflag\t1\t10";
        let raw = vec![line; 15].join("\n");
        let result = detect(&raw).unwrap();
        assert_eq!(result.players_found, 15);
        assert_eq!(result.preview.len(), 10);
    }
}
