use anyhow::{Context, Result};
use regex::Regex;

/// Extracts the BWF player id from profile links such as
/// `https://bwfbadminton.com/player/57945/shi-yu-qi/`
pub struct ProfileUrlParser {
    player_id_regex: Regex,
}

impl ProfileUrlParser {
    pub fn new() -> Result<Self> {
        let player_id_regex = Self::compile_regex()?;
        Ok(Self { player_id_regex })
    }

    pub fn bwf_id(&self, url: &str) -> Option<String> {
        self.player_id_regex
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn compile_regex() -> Result<Regex> {
        Regex::new(r"/player/(\d+)/").context("Failed to compile player id regex")
    }
}
