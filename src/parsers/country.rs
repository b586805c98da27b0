use std::borrow::Cow;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::config::country_code;

const FLAG_PREFIX: &str = "flags-svg/";
const FLAG_SUFFIX: &str = ".svg";

pub const UNKNOWN_COUNTRY: &str = "Unknown";
pub const UNKNOWN_CODE: &str = "UNK";

/// Resolves `(country, code)` from BWF flag image URLs such as
/// `https://extranet.bwf.sport/docs/flags-svg/chinese-taipei.svg`.
///
/// URLs without a flag slug resolve to `("Unknown", "UNK")`.
pub struct CountryResolver {
    word_start_regex: Regex,
}

impl CountryResolver {
    pub fn new() -> Result<Self> {
        let word_start_regex = Self::compile_regex()?;
        Ok(Self { word_start_regex })
    }

    pub fn resolve(&self, flag_url: &str) -> (String, String) {
        match flag_slug(flag_url) {
            Some(slug) => {
                let country = self.title_case(&decode_slug(slug).replace('-', " "));
                let code = country_code(&country);
                (country, code)
            }
            None => (UNKNOWN_COUNTRY.to_string(), UNKNOWN_CODE.to_string()),
        }
    }

    /// Uppercase the first character of every word, leaving the rest alone
    fn title_case(&self, text: &str) -> String {
        self.word_start_regex
            .replace_all(text, |caps: &Captures| caps[0].to_uppercase())
            .into_owned()
    }

    fn compile_regex() -> Result<Regex> {
        Regex::new(r"\b\w").context("Failed to compile word start regex")
    }
}

fn flag_slug(url: &str) -> Option<&str> {
    let start = url.find(FLAG_PREFIX)? + FLAG_PREFIX.len();
    let rest = &url[start..];
    let end = rest.rfind(FLAG_SUFFIX)?;
    Some(&rest[..end]).filter(|slug| !slug.is_empty())
}

fn decode_slug(slug: &str) -> Cow<'_, str> {
    urlencoding::decode(slug).unwrap_or(Cow::Borrowed(slug))
}
