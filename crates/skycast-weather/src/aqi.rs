//! Air-quality index labels.
//!
//! The pollution API reports a 1 (best) to 5 (worst) index.

use serde::{Deserialize, Serialize};

/// Severity bucket for an AQI reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "#4CAF50",
            Self::Fair => "#CDDC39",
            Self::Moderate => "#FFC107",
            Self::Poor => "#FF7043",
            Self::VeryPoor => "#F44336",
            Self::Unknown => "#999",
        }
    }
}

/// What the AQI region shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiDisplay {
    Reading { index: i64, level: AqiLevel },
    Unavailable,
}

impl AqiDisplay {
    /// Map an optional upstream index; a missing one is unavailable
    pub fn from_index(index: Option<i64>) -> Self {
        match index {
            Some(index) => Self::Reading {
                index,
                level: AqiLevel::from_index(index),
            },
            None => Self::Unavailable,
        }
    }

    /// Only indices 1..=5 count as a real reading
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Reading { level, .. } if *level != AqiLevel::Unknown)
    }

    pub fn value_text(&self) -> String {
        match self {
            Self::Reading { index, .. } => index.to_string(),
            Self::Unavailable => "--".to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Reading { level, .. } => level.label(),
            Self::Unavailable => "AQI N/A",
        }
    }

    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Reading { level, .. } => Some(level.color()),
            Self::Unavailable => None,
        }
    }
}
