use serde::Serialize;

use crate::database::{DoublesPair, Player};
use crate::domain::ImportFormat;
use crate::errors::RowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    Created,
    Updated,
    Skipped,
}

/// What happened to one imported player or pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetail {
    pub player_name: String,
    pub action: ImportAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub player: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub current_rank: i32,
    pub rank_change: i32,
    pub bwf_points: i64,
    pub fantasy_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPair {
    pub pair: DoublesPair,
    pub player1: Player,
    pub player2: Player,
    pub current_rank: i32,
    pub rank_change: i32,
    pub bwf_points: i64,
    pub fantasy_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProcessedEntry {
    Player(ProcessedPlayer),
    Pair(ProcessedPair),
}

/// A successfully imported row
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub name: String,
    pub action: ImportAction,
    pub changes: Vec<String>,
    pub entry: ProcessedEntry,
}

impl RowOutcome {
    fn detail(&self) -> ChangeDetail {
        let (changes, reason) = match self.action {
            ImportAction::Created => (None, None),
            ImportAction::Updated => (Some(self.changes.clone()), None),
            ImportAction::Skipped => (None, Some("No changes detected".to_string())),
        };

        ChangeDetail {
            player_name: self.name.clone(),
            action: self.action,
            changes,
            reason,
        }
    }
}

/// Tallies of one import run. Doubles runs also carry the pair counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub players_processed: usize,
    pub players_created: usize,
    pub players_updated: usize,
    pub players_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs_created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs_updated: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs_skipped: Option<usize>,
    pub changes: Vec<ChangeDetail>,
    pub errors: Vec<RowFailure>,
}

impl ImportSummary {
    pub fn new(format: ImportFormat, rows: usize) -> Self {
        match format {
            ImportFormat::Singles => Self {
                players_processed: rows,
                ..Self::default()
            },
            ImportFormat::Doubles => Self {
                pairs_processed: Some(rows),
                pairs_created: Some(0),
                pairs_updated: Some(0),
                pairs_skipped: Some(0),
                ..Self::default()
            },
        }
    }

    pub fn created(&self) -> usize {
        self.pairs_created.unwrap_or(self.players_created)
    }

    pub fn updated(&self) -> usize {
        self.pairs_updated.unwrap_or(self.players_updated)
    }

    pub fn skipped(&self) -> usize {
        self.pairs_skipped.unwrap_or(self.players_skipped)
    }

    fn count(&mut self, action: ImportAction) {
        let doubles = self.pairs_processed.is_some();
        let counter = match (action, doubles) {
            (ImportAction::Created, false) => &mut self.players_created,
            (ImportAction::Updated, false) => &mut self.players_updated,
            (ImportAction::Skipped, false) => &mut self.players_skipped,
            (ImportAction::Created, true) => self.pairs_created.get_or_insert(0),
            (ImportAction::Updated, true) => self.pairs_updated.get_or_insert(0),
            (ImportAction::Skipped, true) => self.pairs_skipped.get_or_insert(0),
        };
        *counter += 1;
    }
}

/// Result of a committed import
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub format: ImportFormat,
    pub summary: ImportSummary,
    pub players: Vec<ProcessedEntry>,
    pub processed_count: usize,
    pub error_count: usize,
}

impl ImportReport {
    /// Fold per-row results, keyed by display name, into a report
    pub fn collect<I>(format: ImportFormat, results: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<RowOutcome, RowError>)>,
    {
        let results: Vec<_> = results.into_iter().collect();
        let mut summary = ImportSummary::new(format, results.len());
        let mut players = Vec::new();

        for (name, result) in results {
            match result {
                Ok(outcome) => {
                    summary.count(outcome.action);
                    summary.changes.push(outcome.detail());
                    players.push(outcome.entry);
                }
                Err(e) => summary.errors.push(RowFailure {
                    player: name,
                    error: e.to_string(),
                }),
            }
        }

        Self {
            format,
            processed_count: summary.pairs_processed.unwrap_or(summary.players_processed),
            error_count: summary.errors.len(),
            summary,
            players,
        }
    }

    pub fn message(&self) -> String {
        let noun = match self.format {
            ImportFormat::Doubles => "pairs",
            ImportFormat::Singles => "players",
        };
        format!(
            "Successfully processed {} {} ({} created, {} updated, {} skipped)",
            self.processed_count,
            noun,
            self.summary.created(),
            self.summary.updated(),
            self.summary.skipped()
        )
    }
}
