use crate::database::{PlayerFields, PlayerWithLatest, RankingSnapshot, SnapshotValues};

/// Diffs stored entities against freshly imported values.
/// An empty change list means the entity can be left alone.
#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector {
    price_tolerance: f64,
}

impl ChangeDetector {
    pub fn new(price_tolerance: f64) -> Self {
        Self { price_tolerance }
    }

    /// Player fields first, then the ranking against the latest snapshot
    pub fn player_changes(
        &self,
        existing: &PlayerWithLatest,
        candidate: &PlayerFields,
        ranking: &SnapshotValues,
    ) -> Vec<String> {
        let player = &existing.player;
        let mut changes = Vec::new();

        quoted(&mut changes, "firstName", &player.first_name, &candidate.first_name);
        quoted(&mut changes, "lastName", &player.last_name, &candidate.last_name);
        quoted(&mut changes, "fullName", &player.full_name, &candidate.full_name);
        quoted(&mut changes, "country", &player.country, &candidate.country);
        quoted(&mut changes, "countryCode", &player.country_code, &candidate.country_code);

        if player.profile_url.as_deref() != Some(candidate.profile_url.as_str()) {
            changes.push("profileUrl updated".to_string());
        }

        let stored_id = player.bwf_id.as_deref().unwrap_or_default();
        if player.bwf_id.as_deref() != Some(candidate.bwf_id.as_str()) {
            changes.push(format!("bwfId: \"{}\" → \"{}\"", stored_id, candidate.bwf_id));
        }

        changes.extend(self.ranking_changes(existing.latest.as_ref(), ranking));
        changes
    }

    /// Ranking fields only; pairs have nothing else that an import changes
    pub fn ranking_changes(&self, latest: Option<&RankingSnapshot>, ranking: &SnapshotValues) -> Vec<String> {
        let Some(latest) = latest else {
            return vec!["New ranking data added".to_string()];
        };

        let mut changes = Vec::new();
        if latest.rank != ranking.rank {
            changes.push(format!("rank: {} → {}", latest.rank, ranking.rank));
        }
        if latest.bwf_points != ranking.bwf_points {
            changes.push(format!("bwfPoints: {} → {}", latest.bwf_points, ranking.bwf_points));
        }
        if latest.tournaments_played != ranking.tournaments_played {
            changes.push(format!(
                "tournaments: {} → {}",
                latest.tournaments_played, ranking.tournaments_played
            ));
        }
        if (latest.fantasy_price - ranking.fantasy_price).abs() > self.price_tolerance {
            changes.push(format!("price: ${} → ${}", latest.fantasy_price, ranking.fantasy_price));
        }
        changes
    }
}

fn quoted(changes: &mut Vec<String>, field: &str, stored: &str, incoming: &str) {
    if stored != incoming {
        changes.push(format!("{field}: \"{stored}\" → \"{incoming}\""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Player;
    use crate::domain::{Category, Gender};
    use chrono::NaiveDate;

    fn stored(latest: Option<RankingSnapshot>) -> PlayerWithLatest {
        PlayerWithLatest {
            player: Player {
                id: 1,
                bwf_id: Some("57945".to_string()),
                first_name: "Yu Qi".to_string(),
                last_name: "SHI".to_string(),
                full_name: "Yu Qi SHI".to_string(),
                country: "China".to_string(),
                country_code: "CHN".to_string(),
                category: Category::MS,
                gender: Gender::Male,
                profile_url: Some("https://x/player/57945/a/".to_string()),
                image_url: None,
                is_active: true,
                created_at: None,
                updated_at: None,
            },
            latest,
        }
    }

    fn fields() -> PlayerFields {
        PlayerFields {
            bwf_id: "57945".to_string(),
            first_name: "Yu Qi".to_string(),
            last_name: "SHI".to_string(),
            full_name: "Yu Qi SHI".to_string(),
            country: "China".to_string(),
            country_code: "CHN".to_string(),
            category: Category::MS,
            gender: Gender::Male,
            profile_url: "https://x/player/57945/a/".to_string(),
        }
    }

    fn values(rank: i32, price: f64) -> SnapshotValues {
        SnapshotValues {
            rank,
            previous_rank: None,
            rank_change: 0,
            bwf_points: 110_397,
            tournaments_played: 12,
            fantasy_price: price,
        }
    }

    fn snapshot(rank: i32, price: f64) -> RankingSnapshot {
        RankingSnapshot {
            id: 1,
            owner_id: 1,
            rank,
            previous_rank: None,
            rank_change: 0,
            bwf_points: 110_397,
            tournaments_played: 12,
            fantasy_price: price,
            recorded_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn identical_data_has_no_changes() {
        let detector = ChangeDetector::new(0.1);
        let existing = stored(Some(snapshot(1, 20.0)));

        assert!(detector.player_changes(&existing, &fields(), &values(1, 20.0)).is_empty());
    }

    #[test]
    fn missing_snapshot_is_a_change() {
        let detector = ChangeDetector::new(0.1);
        let changes = detector.player_changes(&stored(None), &fields(), &values(1, 20.0));

        assert_eq!(changes, vec!["New ranking data added".to_string()]);
    }

    #[test]
    fn reports_each_differing_field() {
        let detector = ChangeDetector::new(0.1);
        let mut incoming = fields();
        incoming.country = "Chinese Taipei".to_string();
        incoming.country_code = "TPE".to_string();
        incoming.profile_url = "https://x/player/57945/b/".to_string();

        let changes = detector.player_changes(&stored(Some(snapshot(3, 20.0))), &incoming, &values(6, 18.0));

        assert_eq!(
            changes,
            vec![
                "country: \"China\" → \"Chinese Taipei\"".to_string(),
                "countryCode: \"CHN\" → \"TPE\"".to_string(),
                "profileUrl updated".to_string(),
                "rank: 3 → 6".to_string(),
                "price: $20 → $18".to_string(),
            ]
        );
    }

    #[test]
    fn price_noise_within_tolerance_is_ignored() {
        let detector = ChangeDetector::new(0.1);
        let latest = snapshot(1, 16.0);

        assert!(detector.ranking_changes(Some(&latest), &values(1, 16.05)).is_empty());
        assert_eq!(detector.ranking_changes(Some(&latest), &values(1, 16.2)).len(), 1);
        assert!(ChangeDetector::new(1.0).ranking_changes(Some(&latest), &values(1, 16.9)).is_empty());
    }

    #[test]
    fn bwf_id_change_is_reported() {
        let detector = ChangeDetector::new(0.1);
        let mut incoming = fields();
        incoming.bwf_id = "60000".to_string();
        incoming.profile_url = "https://x/player/60000/a/".to_string();

        let changes = detector.player_changes(&stored(Some(snapshot(1, 20.0))), &incoming, &values(1, 20.0));

        assert_eq!(
            changes,
            vec![
                "profileUrl updated".to_string(),
                "bwfId: \"57945\" → \"60000\"".to_string(),
            ]
        );
    }
}
