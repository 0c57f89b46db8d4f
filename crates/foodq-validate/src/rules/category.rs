use std::fmt;

use serde::{Deserialize, Serialize};

/// Grouping of consistency rules, used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nutrition,
    Images,
    Allergens,
    Ratios,
    Additives,
}

impl Category {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Nutrition,
            Self::Images,
            Self::Allergens,
            Self::Ratios,
            Self::Additives,
        ]
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Nutrition => "Nutrition",
            Self::Images => "Images",
            Self::Allergens => "Allergens",
            Self::Ratios => "Ratios",
            Self::Additives => "Additives",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
