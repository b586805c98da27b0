use std::cmp::Ordering;

use anyhow::Result;
use serde::Serialize;

use crate::database::{pairs, players, DbConn, PairWithLatest, PlayerWithLatest, SortColumn, SortOrder};
use crate::domain::{Category, ImportFormat};

const SINGLES: [Category; 2] = [Category::MS, Category::WS];
const DOUBLES: [Category; 3] = [Category::MD, Category::WD, Category::XD];

#[derive(Debug, Clone)]
pub struct EnhancedQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub limit: usize,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairMember {
    pub full_name: String,
    pub bwf_id: Option<String>,
}

/// A ranked singles player or doubles pair, flattened with its latest snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedEntry {
    #[serde(rename = "type")]
    pub kind: ImportFormat,
    pub id: i64,
    pub category: Category,
    pub rank: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_rank: Option<i32>,
    pub rank_change: i32,
    pub bwf_points: i64,
    pub fantasy_price: f64,
    pub tournaments_played: i32,
    pub country: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bwf_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player1: Option<PairMember>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player2: Option<PairMember>,
}

/// Active players (singles) and pairs (doubles) per category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryCounts {
    #[serde(rename = "MS")]
    pub ms: i64,
    #[serde(rename = "WS")]
    pub ws: i64,
    #[serde(rename = "MD")]
    pub md: i64,
    #[serde(rename = "WD")]
    pub wd: i64,
    #[serde(rename = "XD")]
    pub xd: i64,
    /// Entries matched before the limit was applied
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedListing {
    pub entries: Vec<EnhancedEntry>,
    pub counts: CategoryCounts,
}

fn singles_entry(row: PlayerWithLatest) -> Option<EnhancedEntry> {
    let latest = row.latest?;
    let player = row.player;
    Some(EnhancedEntry {
        kind: ImportFormat::Singles,
        id: player.id,
        category: player.category,
        rank: latest.rank,
        previous_rank: latest.previous_rank,
        rank_change: latest.rank_change,
        bwf_points: latest.bwf_points,
        fantasy_price: latest.fantasy_price,
        tournaments_played: latest.tournaments_played,
        country: player.country,
        country_code: player.country_code,
        full_name: Some(player.full_name),
        bwf_id: player.bwf_id,
        pair_name: None,
        player1: None,
        player2: None,
    })
}

fn doubles_entry(row: PairWithLatest) -> Option<EnhancedEntry> {
    let latest = row.latest?;
    let pair_name = format!("{} & {}", row.player1.full_name, row.player2.full_name);
    Some(EnhancedEntry {
        kind: ImportFormat::Doubles,
        id: row.pair.id,
        category: row.pair.category,
        rank: latest.rank,
        previous_rank: latest.previous_rank,
        rank_change: latest.rank_change,
        bwf_points: latest.bwf_points,
        fantasy_price: latest.fantasy_price,
        tournaments_played: latest.tournaments_played,
        // A pair is listed under its first player's country
        country: row.player1.country,
        country_code: row.player1.country_code,
        full_name: None,
        bwf_id: None,
        pair_name: Some(pair_name),
        player1: Some(PairMember {
            full_name: row.player1.full_name,
            bwf_id: row.player1.bwf_id,
        }),
        player2: Some(PairMember {
            full_name: row.player2.full_name,
            bwf_id: row.player2.bwf_id,
        }),
    })
}

fn pair_matches(row: &PairWithLatest, needle: &str) -> bool {
    let pair_name = format!("{} & {}", row.player1.full_name, row.player2.full_name);
    [pair_name.as_str(), row.player1.country.as_str(), row.player2.country.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &EnhancedEntry, b: &EnhancedEntry, sort_by: SortColumn) -> Ordering {
    match sort_by {
        SortColumn::Rank => a.rank.cmp(&b.rank),
        SortColumn::Price => a.fantasy_price.total_cmp(&b.fantasy_price),
        SortColumn::Points => a.bwf_points.cmp(&b.bwf_points),
    }
}

fn scoped(category: Option<Category>, group: &[Category]) -> Vec<Category> {
    match category {
        Some(category) if group.contains(&category) => vec![category],
        Some(_) => Vec::new(),
        None => group.to_vec(),
    }
}

/// Ranked singles players and doubles pairs in one list
pub fn enhanced_listing(conn: &mut DbConn, query: &EnhancedQuery) -> Result<EnhancedListing> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let mut entries: Vec<EnhancedEntry> = Vec::new();

    let singles = scoped(query.category, &SINGLES);
    if !singles.is_empty() {
        let rows = players::list_ranked(conn, &singles, search)?;
        entries.extend(rows.into_iter().filter_map(singles_entry));
    }

    let doubles = scoped(query.category, &DOUBLES);
    if !doubles.is_empty() {
        let needle = search.map(str::to_lowercase);
        let rows = pairs::list_ranked(conn, &doubles)?;
        entries.extend(
            rows.into_iter()
                .filter(|row| needle.as_deref().is_none_or(|needle| pair_matches(row, needle)))
                .filter_map(doubles_entry),
        );
    }

    entries.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let counts = CategoryCounts {
        ms: players::count_active(conn, Category::MS)?,
        ws: players::count_active(conn, Category::WS)?,
        md: pairs::count_active(conn, Category::MD)?,
        wd: pairs::count_active(conn, Category::WD)?,
        xd: pairs::count_active(conn, Category::XD)?,
        total: entries.len(),
    };
    entries.truncate(query.limit);

    Ok(EnhancedListing { entries, counts })
}
