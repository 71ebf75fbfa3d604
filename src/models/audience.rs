use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Intended readership of a book. Stored as its key (`YOUNG_ADULT`), shown
/// by its label ("Young Adult").
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Audience {
    #[sea_orm(string_value = "CHILDREN")]
    Children,
    #[sea_orm(string_value = "YOUNG_ADULT")]
    YoungAdult,
    #[sea_orm(string_value = "ADULT")]
    Adult,
    #[sea_orm(string_value = "ALL")]
    All,
}

impl Audience {
    pub fn key(self) -> &'static str {
        match self {
            Audience::Children => "CHILDREN",
            Audience::YoungAdult => "YOUNG_ADULT",
            Audience::Adult => "ADULT",
            Audience::All => "ALL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Audience::Children => "Children",
            Audience::YoungAdult => "Young Adult",
            Audience::Adult => "Adult",
            Audience::All => "All",
        }
    }

    /// `(key, label)` pairs in declaration order, for select boxes.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Audience::iter().map(|a| (a.key(), a.label())).collect()
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Audience::iter()
            .find(|a| a.key() == s)
            .ok_or_else(|| format!("Unknown audience: {}", s))
    }
}
