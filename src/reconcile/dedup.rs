use anyhow::Result;

use crate::database::{pairs, players, DbConn, DoublesPair, PairWithLatest, Player, PlayerWithLatest};
use crate::domain::Category;

/// Which lookup produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    BwfId,
    Name,
    PlayerIds,
    PlayerNames,
}

/// Identity of an imported singles row
#[derive(Debug, Clone, Copy)]
pub struct PlayerCandidate<'a> {
    pub bwf_id: &'a str,
    pub full_name: &'a str,
    pub category: Category,
}

/// Identity of an imported doubles row, in source order
#[derive(Debug, Clone, Copy)]
pub struct PairCandidate<'a> {
    pub bwf_ids: [&'a str; 2],
    pub full_names: [&'a str; 2],
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct PlayerMatch {
    pub existing: PlayerWithLatest,
    pub matched_by: MatchedBy,
}

#[derive(Debug, Clone)]
pub struct PairMatch {
    pub existing: PairWithLatest,
    pub matched_by: MatchedBy,
}

/// Outcome of a pair lookup. The two players are whatever their BWF ids
/// resolved to, whether or not a pair was found.
#[derive(Debug, Clone)]
pub struct PairResolution {
    pub matched: Option<PairMatch>,
    pub player1: Option<Player>,
    pub player2: Option<Player>,
}

struct PairContext<'a> {
    candidate: &'a PairCandidate<'a>,
    player_ids: Option<(i64, i64)>,
}

type PlayerLookup = fn(&mut DbConn, &PlayerCandidate<'_>) -> Result<Option<Player>>;
type PairLookup = fn(&mut DbConn, &PairContext<'_>) -> Result<Option<DoublesPair>>;

// Tried in order; the first hit wins.
const PLAYER_LOOKUPS: [(MatchedBy, PlayerLookup); 2] = [
    (MatchedBy::BwfId, player_by_bwf_id),
    (MatchedBy::Name, player_by_name),
];

const PAIR_LOOKUPS: [(MatchedBy, PairLookup); 2] = [
    (MatchedBy::PlayerIds, pair_by_player_ids),
    (MatchedBy::PlayerNames, pair_by_names),
];

fn player_by_bwf_id(conn: &mut DbConn, candidate: &PlayerCandidate<'_>) -> Result<Option<Player>> {
    players::find_by_bwf_id(conn, candidate.bwf_id)
}

fn player_by_name(conn: &mut DbConn, candidate: &PlayerCandidate<'_>) -> Result<Option<Player>> {
    players::find_active_by_name(conn, candidate.full_name, candidate.category)
}

fn pair_by_player_ids(conn: &mut DbConn, context: &PairContext<'_>) -> Result<Option<DoublesPair>> {
    match context.player_ids {
        Some((a, b)) => pairs::find_active_by_player_ids(conn, a, b, context.candidate.category),
        None => Ok(None),
    }
}

fn pair_by_names(conn: &mut DbConn, context: &PairContext<'_>) -> Result<Option<DoublesPair>> {
    let [a, b] = context.candidate.full_names;
    pairs::find_active_by_names(conn, a, b, context.candidate.category)
}

/// Find the stored player an imported singles row refers to.
///
/// BWF id first, then case-insensitive full name within the category
/// among active players. The name fallback merges two different people
/// who share a name in one category. Never creates anything.
pub fn resolve_player(conn: &mut DbConn, candidate: &PlayerCandidate<'_>) -> Result<Option<PlayerMatch>> {
    for (matched_by, lookup) in PLAYER_LOOKUPS.iter() {
        if let Some(player) = lookup(conn, candidate)? {
            let existing = players::with_latest(conn, player)?;
            return Ok(Some(PlayerMatch {
                existing,
                matched_by: *matched_by,
            }));
        }
    }

    Ok(None)
}

/// Find the stored pair an imported doubles row refers to.
///
/// Both players are looked up by BWF id. When both exist, the pair is
/// searched by their ids in either order; otherwise, or when that fails,
/// by the two player names in either order. Never creates anything.
pub fn resolve_pair(conn: &mut DbConn, candidate: &PairCandidate<'_>) -> Result<PairResolution> {
    let [id1, id2] = candidate.bwf_ids;
    let player1 = players::find_by_bwf_id(conn, id1)?;
    let player2 = players::find_by_bwf_id(conn, id2)?;

    let context = PairContext {
        candidate,
        player_ids: match (&player1, &player2) {
            (Some(a), Some(b)) => Some((a.id, b.id)),
            _ => None,
        },
    };

    let mut matched = None;
    for (matched_by, lookup) in PAIR_LOOKUPS.iter() {
        if let Some(pair) = lookup(conn, &context)? {
            matched = Some(PairMatch {
                existing: pairs::with_latest(conn, pair)?,
                matched_by: *matched_by,
            });
            break;
        }
    }

    Ok(PairResolution {
        matched,
        player1,
        player2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_connection, open_memory, PlayerFields};

    fn insert(conn: &mut DbConn, bwf_id: &str, full_name: &str, category: Category) -> Player {
        let (first, last) = full_name.split_once(' ').unwrap();
        let fields = PlayerFields {
            bwf_id: bwf_id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            full_name: full_name.to_string(),
            country: "Korea".to_string(),
            country_code: "KOR".to_string(),
            category,
            gender: category.gender(),
            profile_url: format!("https://x/player/{bwf_id}/p/"),
        };
        players::insert_player(conn, &fields).unwrap()
    }

    #[test]
    fn bwf_id_wins_over_name() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        insert(&mut conn, "1", "Se Young AN", Category::WS);
        let by_id = insert(&mut conn, "2", "Someone ELSE", Category::WS);

        let candidate = PlayerCandidate {
            bwf_id: "2",
            full_name: "Se Young AN",
            category: Category::WS,
        };
        let found = resolve_player(&mut conn, &candidate).unwrap().unwrap();

        assert_eq!(found.matched_by, MatchedBy::BwfId);
        assert_eq!(found.existing.player.id, by_id.id);
    }

    #[test]
    fn unknown_id_falls_back_to_name_and_can_merge_namesakes() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let stored = insert(&mut conn, "1", "Wei CHEN", Category::MS);

        // A different person with the same name and a new BWF id resolves to
        // the stored player. Known collision risk of the name fallback.
        let candidate = PlayerCandidate {
            bwf_id: "999",
            full_name: "wei chen",
            category: Category::MS,
        };
        let found = resolve_player(&mut conn, &candidate).unwrap().unwrap();

        assert_eq!(found.matched_by, MatchedBy::Name);
        assert_eq!(found.existing.player.id, stored.id);
    }

    #[test]
    fn no_match_creates_nothing() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let candidate = PlayerCandidate {
            bwf_id: "1",
            full_name: "Nobody HERE",
            category: Category::MS,
        };

        assert!(resolve_player(&mut conn, &candidate).unwrap().is_none());
        assert_eq!(players::count_active(&mut conn, Category::MS).unwrap(), 0);
    }

    #[test]
    fn pair_resolves_by_ids_in_either_order() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let a = insert(&mut conn, "10", "Seo Seung JAE", Category::MD);
        let b = insert(&mut conn, "11", "Kang Min HYUK", Category::MD);
        let pair = pairs::insert_pair(&mut conn, a.id, b.id, Category::MD).unwrap();

        let candidate = PairCandidate {
            bwf_ids: ["11", "10"],
            full_names: ["Kang Min HYUK", "Seo Seung JAE"],
            category: Category::MD,
        };
        let resolution = resolve_pair(&mut conn, &candidate).unwrap();
        let matched = resolution.matched.unwrap();

        assert_eq!(matched.matched_by, MatchedBy::PlayerIds);
        assert_eq!(matched.existing.pair.id, pair.id);
        assert_eq!(resolution.player1.map(|p| p.id), Some(b.id));
    }

    #[test]
    fn pair_falls_back_to_names_when_ids_are_new() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let a = insert(&mut conn, "10", "Seo Seung JAE", Category::MD);
        let b = insert(&mut conn, "11", "Kang Min HYUK", Category::MD);
        let pair = pairs::insert_pair(&mut conn, a.id, b.id, Category::MD).unwrap();

        let candidate = PairCandidate {
            bwf_ids: ["20", "21"],
            full_names: ["KANG MIN HYUK", "seo seung jae"],
            category: Category::MD,
        };
        let resolution = resolve_pair(&mut conn, &candidate).unwrap();

        assert!(resolution.player1.is_none());
        let matched = resolution.matched.unwrap();
        assert_eq!(matched.matched_by, MatchedBy::PlayerNames);
        assert_eq!(matched.existing.pair.id, pair.id);
    }
}
