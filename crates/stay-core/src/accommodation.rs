//! Accommodation type discriminator.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::CoreError;

/// Kind of accommodation a review belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccommodationType {
    Hotel,
    Apartment,
}

impl AccommodationType {
    /// Path segment used by the reviews API.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationType::Hotel => "hotel",
            AccommodationType::Apartment => "apartment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AccommodationType::Hotel => "Hotel",
            AccommodationType::Apartment => "Apartment",
        }
    }
}

impl FromStr for AccommodationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hotel" | "hotels" => Ok(AccommodationType::Hotel),
            "apartment" | "apartments" => Ok(AccommodationType::Apartment),
            other => Err(CoreError::UnknownAccommodationType(other.to_string())),
        }
    }
}

impl std::fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
