use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// BWF competition class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    MS,
    WS,
    MD,
    WD,
    XD,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::MS,
        Category::WS,
        Category::MD,
        Category::WD,
        Category::XD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MS => "MS",
            Category::WS => "WS",
            Category::MD => "MD",
            Category::WD => "WD",
            Category::XD => "XD",
        }
    }

    /// Doubles and mixed doubles
    pub fn is_doubles(&self) -> bool {
        matches!(self, Category::MD | Category::WD | Category::XD)
    }

    /// Gender recorded for a singles import in this category.
    /// Mixed doubles has no single answer and falls back to male.
    pub fn gender(&self) -> Gender {
        match self {
            Category::WS | Category::WD => Gender::Female,
            Category::MS | Category::MD | Category::XD => Gender::Male,
        }
    }

    /// Genders for the (first, second) player of a pair in this category.
    pub fn pair_genders(&self) -> (Gender, Gender) {
        match self {
            Category::WD => (Gender::Female, Gender::Female),
            Category::XD => (Gender::Male, Gender::Female),
            _ => (Gender::Male, Gender::Male),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0} (expected one of MS, WS, MD, WD, XD)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MS" => Ok(Category::MS),
            "WS" => Ok(Category::WS),
            "MD" => Ok(Category::MD),
            "WD" => Ok(Category::WD),
            "XD" => Ok(Category::XD),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender: {0}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}
