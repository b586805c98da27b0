//! Fantasy price derived from a BWF rank.

use crate::config::settings::PricingSettings;
use crate::domain::Category;

/// Price for a 1-based rank in a category.
///
/// The tier price steps down from `base_price` by rank bracket, is scaled
/// by the doubles multiplier, rounded to a whole amount and never drops
/// below `floor_price`.
pub fn fantasy_price(rank: i32, category: Category, settings: &PricingSettings) -> f64 {
    let tier_price = tier_price(rank, settings);
    let scaled = (tier_price * settings.multiplier_for(category)).round();
    scaled.max(settings.floor_price)
}

fn tier_price(rank: i32, settings: &PricingSettings) -> f64 {
    settings
        .tiers
        .iter()
        .find(|tier| rank <= tier.max_rank)
        .map(|tier| settings.base_price - tier.discount)
        .unwrap_or(settings.floor_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(rank: i32, category: Category) -> f64 {
        fantasy_price(rank, category, &PricingSettings::default())
    }

    #[test]
    fn top_five_get_base_price() {
        for rank in 1..=5 {
            assert_eq!(price(rank, Category::MS), 20.0);
            assert_eq!(price(rank, Category::MD), 16.0);
        }
    }

    #[test]
    fn steps_down_by_bracket() {
        let expected = [
            (6, 18.0),
            (10, 18.0),
            (11, 16.0),
            (20, 16.0),
            (21, 14.0),
            (30, 14.0),
            (50, 12.0),
            (75, 10.0),
            (76, 8.0),
            (100, 8.0),
        ];
        for (rank, value) in expected {
            assert_eq!(price(rank, Category::WS), value, "rank {rank}");
        }
    }

    #[test]
    fn past_hundred_is_floor() {
        assert_eq!(price(101, Category::MS), 5.0);
        assert_eq!(price(999, Category::XD), 5.0);
    }

    #[test]
    fn doubles_is_rounded_fraction_of_singles_with_same_floor() {
        let settings = PricingSettings::default();
        for rank in 1..=120 {
            let singles = fantasy_price(rank, Category::MS, &settings);
            let doubles = fantasy_price(rank, Category::WD, &settings);
            let expected = (singles * 0.8).round().max(settings.floor_price);
            assert_eq!(doubles, expected, "rank {rank}");
        }
    }

    #[test]
    fn respects_custom_floor() {
        let settings = PricingSettings {
            floor_price: 9.0,
            ..PricingSettings::default()
        };
        assert_eq!(fantasy_price(80, Category::MD, &settings), 9.0);
    }
}
