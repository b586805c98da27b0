pub mod country;
pub mod format;
pub mod numbers;
pub mod profile_url;
pub mod rank_change;

pub use country::CountryResolver;
pub use format::detect_and_parse;
pub use numbers::{leading_int, parse_points};
pub use profile_url::ProfileUrlParser;
pub use rank_change::parse_rank_change;
