//! Review sort keys.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::CoreError;

/// Sort options understood by the reviews API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    /// Most recent first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Highest rating first.
    RatingHigh,
    /// Lowest rating first.
    RatingLow,
    /// Most helpful marks first.
    Helpful,
}

impl ReviewSort {
    /// All sort options, in the order they are offered to the user.
    pub const ALL: [ReviewSort; 5] = [
        ReviewSort::Newest,
        ReviewSort::Oldest,
        ReviewSort::RatingHigh,
        ReviewSort::RatingLow,
        ReviewSort::Helpful,
    ];

    /// Value of the `sortBy` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSort::Newest => "newest",
            ReviewSort::Oldest => "oldest",
            ReviewSort::RatingHigh => "rating_high",
            ReviewSort::RatingLow => "rating_low",
            ReviewSort::Helpful => "helpful",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReviewSort::Newest => "Newest",
            ReviewSort::Oldest => "Oldest",
            ReviewSort::RatingHigh => "Highest rated",
            ReviewSort::RatingLow => "Lowest rated",
            ReviewSort::Helpful => "Most helpful",
        }
    }
}

impl FromStr for ReviewSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSort(s.to_string()))
    }
}

impl std::fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_sort_key() {
        for sort in ReviewSort::ALL {
            assert_eq!(sort.as_str().parse::<ReviewSort>().unwrap(), sort);
        }
    }

    #[test]
    fn test_unknown_sort() {
        assert_eq!(
            "price".parse::<ReviewSort>(),
            Err(CoreError::UnknownSort("price".to_string()))
        );
    }

    #[test]
    fn test_default_is_newest() {
        assert_eq!(ReviewSort::default(), ReviewSort::Newest);
    }
}
