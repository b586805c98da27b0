use serde::{Deserialize, Serialize};

/// One row of a singles ranking table, pasted or posted as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglesRow {
    pub rank: i32,
    pub ranking_change: String,
    pub player_url: String,
    pub first_name: String,
    pub last_name: String,
    pub country_flag_url: String,
    pub tournaments: i32,
    pub points: String,
}

impl SinglesRow {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One row of a pasted doubles ranking table (a pair sharing one flag)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoublesRow {
    pub rank: i32,
    pub ranking_change: String,
    pub player1_url: String,
    pub player1_first_name: String,
    pub player1_last_name: String,
    pub player2_url: String,
    pub player2_first_name: String,
    pub player2_last_name: String,
    pub country_flag_url: String,
    pub tournaments: i32,
    pub points: String,
}

impl DoublesRow {
    pub fn player1_full_name(&self) -> String {
        format!("{} {}", self.player1_first_name, self.player1_last_name)
    }

    pub fn player2_full_name(&self) -> String {
        format!("{} {}", self.player2_first_name, self.player2_last_name)
    }

    pub fn pair_name(&self) -> String {
        format!("{} & {}", self.player1_full_name(), self.player2_full_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Singles,
    Doubles,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::Singles => "singles",
            ImportFormat::Doubles => "doubles",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedRows {
    Singles(Vec<SinglesRow>),
    Doubles(Vec<DoublesRow>),
}

impl ParsedRows {
    pub fn len(&self) -> usize {
        match self {
            ParsedRows::Singles(rows) => rows.len(),
            ParsedRows::Doubles(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of format detection over pasted text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub format: ImportFormat,
    /// Individual players; a doubles row counts twice
    pub players_found: usize,
    pub preview: Vec<String>,
    pub data: ParsedRows,
}
