//! Matching imported rows against stored players and pairs, and deciding
//! whether a match needs an update.

pub mod changes;
pub mod dedup;

pub use changes::ChangeDetector;
pub use dedup::{resolve_pair, resolve_player, MatchedBy, PairCandidate, PairMatch, PairResolution, PlayerCandidate, PlayerMatch};
