use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::config::settings::{AppConfig, PricingSettings};
use crate::database::{pairs, players, rankings, DbConn, PlayerFields, SnapshotOwner, SnapshotValues};
use crate::domain::{Category, DoublesRow, Gender, ImportFormat, ParsedRows, SinglesRow};
use crate::errors::RowError;
use crate::parsers::{parse_points, parse_rank_change, CountryResolver, ProfileUrlParser};
use crate::pricing::fantasy_price;
use crate::reconcile::{resolve_pair, resolve_player, ChangeDetector, PairCandidate, PlayerCandidate};

use super::summary::{ImportAction, ImportReport, ProcessedEntry, ProcessedPair, ProcessedPlayer, RowOutcome};

/// Reconciles parsed ranking rows with the stored players, pairs and
/// ranking history, one row at a time.
pub struct ImportService {
    config: AppConfig,
    urls: ProfileUrlParser,
    countries: CountryResolver,
    detector: ChangeDetector,
}

impl ImportService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let detector = ChangeDetector::new(config.import.price_tolerance);
        Ok(Self {
            config,
            urls: ProfileUrlParser::new()?,
            countries: CountryResolver::new()?,
            detector,
        })
    }

    /// Import every row for `category`, recording snapshots dated `today`.
    /// A failing row is reported in the summary and the rest carry on.
    pub fn import(&self, conn: &mut DbConn, rows: &ParsedRows, category: Category, today: NaiveDate) -> ImportReport {
        info!("Importing {} rows for {} ({})", rows.len(), category, today);

        let report = match rows {
            ParsedRows::Singles(rows) => {
                let results = rows
                    .iter()
                    .map(|row| (row.full_name(), self.import_player(conn, row, category, today)))
                    .inspect(log_row)
                    .collect::<Vec<_>>();
                ImportReport::collect(ImportFormat::Singles, results)
            }
            ParsedRows::Doubles(rows) => {
                let results = rows
                    .iter()
                    .map(|row| (row.pair_name(), self.import_pair(conn, row, category, today)))
                    .inspect(log_row)
                    .collect::<Vec<_>>();
                ImportReport::collect(ImportFormat::Doubles, results)
            }
        };

        info!(
            "Import finished: {} processed, {} created, {} updated, {} skipped, {} errors",
            report.processed_count,
            report.summary.created(),
            report.summary.updated(),
            report.summary.skipped(),
            report.error_count
        );
        report
    }

    fn import_player(&self, conn: &mut DbConn, row: &SinglesRow, category: Category, today: NaiveDate) -> Result<RowOutcome, RowError> {
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

        let candidate = PlayerCandidate {
            bwf_id: &fields.bwf_id,
            full_name: &fields.full_name,
            category,
        };

        let (player, action, changes) = match resolve_player(conn, &candidate)? {
            None => (players::insert_player(conn, &fields)?, ImportAction::Created, Vec::new()),
            Some(found) => {
                let changes = self.detector.player_changes(&found.existing, &fields, &ranking);
                if changes.is_empty() {
                    (found.existing.player, ImportAction::Skipped, changes)
                } else {
                    debug!("{} matched by {:?}", fields.full_name, found.matched_by);
                    let updated = players::update_player(conn, found.existing.player.id, &fields)?;
                    (updated, ImportAction::Updated, changes)
                }
            }
        };

        // Recorded even when the player itself is unchanged
        rankings::upsert_snapshot(conn, SnapshotOwner::Player(player.id), today, &ranking)?;

        Ok(RowOutcome {
            name: fields.full_name,
            action,
            changes,
            entry: ProcessedEntry::Player(ProcessedPlayer {
                player,
                current_rank: ranking.rank,
                rank_change: ranking.rank_change,
                bwf_points: ranking.bwf_points,
                fantasy_price: ranking.fantasy_price,
            }),
        })
    }

    fn import_pair(&self, conn: &mut DbConn, row: &DoublesRow, category: Category, today: NaiveDate) -> Result<RowOutcome, RowError> {
        let (Some(bwf_id1), Some(bwf_id2)) = (self.urls.bwf_id(&row.player1_url), self.urls.bwf_id(&row.player2_url)) else {
            return Err(RowError::MissingPairBwfIds);
        };
        let (country, country_code) = self.countries.resolve(&row.country_flag_url);
        let ranking = snapshot_values(&self.config.pricing, row.rank, &row.ranking_change, &row.points, row.tournaments, category)?;
        let (gender1, gender2) = category.pair_genders();

        let name1 = row.player1_full_name();
        let name2 = row.player2_full_name();
        let candidate = PairCandidate {
            bwf_ids: [bwf_id1.as_str(), bwf_id2.as_str()],
            full_names: [name1.as_str(), name2.as_str()],
            category,
        };

        let resolution = resolve_pair(conn, &candidate)?;
        let (pair, player1, player2, action, changes) = match resolution.matched {
            Some(found) => {
                let changes = self.detector.ranking_changes(found.existing.latest.as_ref(), &ranking);
                let action = if changes.is_empty() {
                    ImportAction::Skipped
                } else {
                    ImportAction::Updated
                };
                let existing = found.existing;
                (existing.pair, existing.player1, existing.player2, action, changes)
            }
            None => {
                let member = |bwf_id: &str, first: &str, last: &str, full_name: &str, gender: Gender, url: &str| PlayerFields {
                    bwf_id: bwf_id.to_string(),
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    full_name: full_name.to_string(),
                    country: country.clone(),
                    country_code: country_code.clone(),
                    category,
                    gender,
                    profile_url: url.to_string(),
                };

                let player1 = match resolution.player1 {
                    Some(player) => player,
                    None => players::insert_player(
                        conn,
                        &member(&bwf_id1, &row.player1_first_name, &row.player1_last_name, &name1, gender1, &row.player1_url),
                    )?,
                };
                let player2 = match resolution.player2 {
                    Some(player) => player,
                    None => players::insert_player(
                        conn,
                        &member(&bwf_id2, &row.player2_first_name, &row.player2_last_name, &name2, gender2, &row.player2_url),
                    )?,
                };
                let pair = pairs::insert_pair(conn, player1.id, player2.id, category)?;
                (pair, player1, player2, ImportAction::Created, Vec::new())
            }
        };

        rankings::upsert_snapshot(conn, SnapshotOwner::Pair(pair.id), today, &ranking)?;

        Ok(RowOutcome {
            name: row.pair_name(),
            action,
            changes,
            entry: ProcessedEntry::Pair(ProcessedPair {
                pair,
                player1,
                player2,
                current_rank: ranking.rank,
                rank_change: ranking.rank_change,
                bwf_points: ranking.bwf_points,
                fantasy_price: ranking.fantasy_price,
            }),
        })
    }
}

/// Snapshot values of a row, with previous rank derived from the change
pub(super) fn snapshot_values(
    pricing: &PricingSettings,
    rank: i32,
    change_token: &str,
    points: &str,
    tournaments: i32,
    category: Category,
) -> Result<SnapshotValues, RowError> {
    let bwf_points = parse_points(points).ok_or_else(|| RowError::InvalidPoints {
        raw: points.to_string(),
    })?;
    let rank_change = parse_rank_change(change_token);
    let previous_rank = rank.checked_sub(rank_change).filter(|previous| *previous > 0);

    Ok(SnapshotValues {
        rank,
        previous_rank,
        rank_change,
        bwf_points,
        tournaments_played: tournaments,
        fantasy_price: fantasy_price(rank, category, pricing),
    })
}

fn log_row((name, result): &(String, Result<RowOutcome, RowError>)) {
    match result {
        Ok(outcome) => debug!("{}: {:?} {:?}", name, outcome.action, outcome.changes),
        Err(e) => warn!("Skipping {}: {}", name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_connection, open_memory};
    use crate::parsers::detect_and_parse;

    const SINGLES: &str = "1\t-\thttps://x/player/57945/a/\tSHI\tYu Qi\thttps://x/flags-svg/china.svg\t12\t110,397";

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn creates_player_with_snapshot() {
        let config = AppConfig::new();
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let detection = detect_and_parse(&format!("Rank\tChange\n{SINGLES}"), &config.import).unwrap();
        let service = ImportService::new(config).unwrap();

        let report = service.import(&mut conn, &detection.data, Category::MS, day());

        assert_eq!(report.summary.players_created, 1);
        let player = players::find_by_bwf_id(&mut conn, "57945").unwrap().unwrap();
        assert_eq!(player.full_name, "Yu Qi SHI");
        assert_eq!(player.country_code, "CHN");
        let latest = rankings::get_latest(&mut conn, SnapshotOwner::Player(player.id)).unwrap().unwrap();
        assert_eq!(latest.bwf_points, 110_397);
        assert_eq!(latest.fantasy_price, 20.0);
        assert_eq!(latest.previous_rank, Some(1));
    }

    #[test]
    fn rank_improvement_is_an_update() {
        let config = AppConfig::new();
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let service = ImportService::new(config.clone()).unwrap();
        let first = detect_and_parse(&format!("h\n{SINGLES}"), &config.import).unwrap();
        service.import(&mut conn, &first.data, Category::MS, day());

        let moved = SINGLES.replacen("1\t-", "7\t▼6", 1);
        let second = detect_and_parse(&format!("h\n{moved}"), &config.import).unwrap();
        let later = day().succ_opt().unwrap();
        let report = service.import(&mut conn, &second.data, Category::MS, later);

        assert_eq!(report.summary.players_updated, 1);
        let changes = report.summary.changes[0].changes.clone().unwrap();
        assert_eq!(changes, vec!["rank: 1 → 7".to_string(), "price: $20 → $18".to_string()]);
        let player = players::find_by_bwf_id(&mut conn, "57945").unwrap().unwrap();
        let latest = rankings::get_latest(&mut conn, SnapshotOwner::Player(player.id)).unwrap().unwrap();
        assert_eq!(latest.rank_change, -6);
        assert_eq!(latest.previous_rank, Some(13));
    }

    #[test]
    fn unparseable_points_fail_only_that_row() {
        let config = AppConfig::new();
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let bad = "2\t-\thttps://x/player/2/b/\tB\tBee\thttps://x/flags-svg/japan.svg\t3\tn/a";
        let detection = detect_and_parse(&format!("h\n{SINGLES}\n{bad}"), &config.import).unwrap();
        let service = ImportService::new(config).unwrap();

        let report = service.import(&mut conn, &detection.data, Category::MS, day());

        assert_eq!(report.processed_count, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.summary.errors[0].player, "Bee B");
        assert_eq!(report.summary.errors[0].error, "Invalid points value: \"n/a\"");
    }

    #[test]
    fn mixed_pair_gets_one_male_one_female() {
        let config = AppConfig::new();
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let row = "1\t▲2\thttps://x/player/1/a/\tJIANG\tZhen Bang\thttps://x/player/2/b/\tWEI\tYa Xin\thttps://x/flags-svg/china.svg\t15\t98,000";
        let detection = detect_and_parse(&format!("h\n{row}"), &config.import).unwrap();
        let service = ImportService::new(config).unwrap();

        let report = service.import(&mut conn, &detection.data, Category::XD, day());

        assert_eq!(report.summary.pairs_created, Some(1));
        let first = players::find_by_bwf_id(&mut conn, "1").unwrap().unwrap();
        let second = players::find_by_bwf_id(&mut conn, "2").unwrap().unwrap();
        assert_eq!(first.gender, Gender::Male);
        assert_eq!(second.gender, Gender::Female);
        let pair = pairs::find_active_by_player_ids(&mut conn, first.id, second.id, Category::XD).unwrap().unwrap();
        let latest = rankings::get_latest(&mut conn, SnapshotOwner::Pair(pair.id)).unwrap().unwrap();
        assert_eq!(latest.fantasy_price, 16.0);
        assert_eq!(latest.rank_change, 2);
        assert_eq!(latest.previous_rank, None);
    }

    #[test]
    fn extreme_rank_change_leaves_previous_rank_empty() {
        let pricing = PricingSettings::default();

        let values = snapshot_values(&pricing, 1, "-2147483648", "10", 1, Category::MS).unwrap();
        assert_eq!(values.rank_change, i32::MIN);
        assert_eq!(values.previous_rank, None);

        let values = snapshot_values(&pricing, i32::MAX, "▼5", "10", 1, Category::MS).unwrap();
        assert_eq!(values.previous_rank, None);
        assert_eq!(values.fantasy_price, 5.0);
    }
}
