/// Country names as they appear after title-casing a BWF flag slug,
/// mapped to the codes shown in the rankings.
///
/// Names missing from this table fall back to the first three letters
/// of the name, uppercased.
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("China", "CHN"),
    ("Denmark", "DEN"),
    ("Thailand", "THA"),
    ("Indonesia", "INA"),
    ("Chinese Taipei", "TPE"),
    ("France", "FRA"),
    ("Singapore", "SGP"),
    ("Japan", "JPN"),
    ("India", "IND"),
    ("Malaysia", "MAS"),
    ("Korea", "KOR"),
    ("South Korea", "KOR"),
    ("England", "ENG"),
    ("Germany", "GER"),
    ("Spain", "ESP"),
    ("Netherlands", "NED"),
    ("Canada", "CAN"),
    ("USA", "USA"),
    ("Hong Kong", "HKG"),
];

/// Get the 3-letter code for a display country name
pub fn country_code(country: &str) -> String {
    COUNTRY_CODES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or_else(|| fallback_code(country))
}

fn fallback_code(country: &str) -> String {
    country.chars().take(3).collect::<String>().to_uppercase()
}
