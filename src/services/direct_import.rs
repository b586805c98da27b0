use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::config::settings::AppConfig;
use crate::database::{players, rankings, stats, DbConn, PlayerFields, SnapshotOwner};
use crate::domain::{Category, SinglesRow};
use crate::errors::RowError;
use crate::parsers::{CountryResolver, ProfileUrlParser};

use super::import::snapshot_values;
use super::summary::{ProcessedPlayer, RowFailure};

/// Result of importing already structured singles rows
#[derive(Debug, Clone, PartialEq)]
pub struct DirectImportReport {
    pub players: Vec<ProcessedPlayer>,
    pub errors: Vec<RowFailure>,
}

impl DirectImportReport {
    pub fn message(&self) -> String {
        format!("Successfully processed {} players", self.players.len())
    }
}

/// Upserts players keyed by BWF id only, with no name matching and no
/// change detection. Seeds each player's fantasy points from BWF points.
pub struct DirectImportService {
    config: AppConfig,
    urls: ProfileUrlParser,
    countries: CountryResolver,
}

impl DirectImportService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            config,
            urls: ProfileUrlParser::new()?,
            countries: CountryResolver::new()?,
        })
    }

    pub fn import(&self, conn: &mut DbConn, rows: &[SinglesRow], category: Category, today: NaiveDate) -> DirectImportReport {
        let mut report = DirectImportReport {
            players: Vec::new(),
            errors: Vec::new(),
        };

        for row in rows {
            let name = row.full_name();
            match self.import_row(conn, row, category, today) {
                Ok(player) => {
                    debug!("{}: upserted as player {}", name, player.player.id);
                    report.players.push(player);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", name, e);
                    report.errors.push(RowFailure {
                        player: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Direct import finished: {} players, {} errors",
            report.players.len(),
            report.errors.len()
        );
        report
    }

    fn import_row(&self, conn: &mut DbConn, row: &SinglesRow, category: Category, today: NaiveDate) -> Result<ProcessedPlayer, RowError> {
        let bwf_id = self.urls.bwf_id(&row.player_url).ok_or_else(|| RowError::MissingBwfId {
            url: row.player_url.clone(),
        })?;
        let (country, country_code) = self.countries.resolve(&row.country_flag_url);
        let ranking = snapshot_values(&self.config.pricing, row.rank, &row.ranking_change, &row.points, row.tournaments, category)?;

        let fields = PlayerFields {
            bwf_id,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            full_name: row.full_name(),
            country,
            country_code,
            category,
            gender: category.gender(),
            profile_url: row.player_url.clone(),
        };

        let player = players::upsert_by_bwf_id(conn, &fields)?;
        rankings::upsert_snapshot(conn, SnapshotOwner::Player(player.id), today, &ranking)?;
        stats::upsert_fantasy_points(conn, player.id, ranking.bwf_points)?;

        Ok(ProcessedPlayer {
            player,
            current_rank: ranking.rank,
            rank_change: ranking.rank_change,
            bwf_points: ranking.bwf_points,
            fantasy_price: ranking.fantasy_price,
        })
    }
}
