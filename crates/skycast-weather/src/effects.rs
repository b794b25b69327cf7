//! Condition backgrounds and rain/snow particles.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const RAIN_DROPS: usize = 130;
pub const SNOWFLAKES: usize = 90;

/// Page background picked from the condition category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Shown after a failed lookup
    Neutral,
    Rain,
    Snow,
    Cloud,
    Clear,
    Default,
}

impl Background {
    /// Case-insensitive substring match, checked rain, snow, cloud, clear
    pub fn for_condition(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        if condition.contains("rain") {
            Self::Rain
        } else if condition.contains("snow") {
            Self::Snow
        } else if condition.contains("cloud") {
            Self::Cloud
        } else if condition.contains("clear") {
            Self::Clear
        } else {
            Self::Default
        }
    }

    pub fn gradient(&self) -> &'static str {
        match self {
            Self::Neutral => "linear-gradient(to right,#232526,#414345)",
            Self::Rain => "linear-gradient(90deg,#373B44,#4286f4)",
            Self::Snow => "linear-gradient(90deg,#83a4d4,#b6fbff)",
            Self::Cloud => "linear-gradient(90deg,#757F9A,#D7DDE8)",
            Self::Clear => "linear-gradient(90deg,#f7971e,#ffd200)",
            Self::Default => "linear-gradient(90deg,#1d2671,#c33764)",
        }
    }
}

/// One animated drop or flake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Horizontal position in viewport-width units
    pub left_vw: f32,
    pub duration_secs: f32,
    pub opacity: f32,
    /// Flake diameter; rain drops use the stylesheet size
    pub size_px: Option<f32>,
}

/// Precipitation animation state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Precipitation {
    #[default]
    None,
    Rain(Vec<Particle>),
    Snow(Vec<Particle>),
}

impl Precipitation {
    pub fn rain<R: Rng>(count: usize, rng: &mut R) -> Self {
        let drops = (0..count)
            .map(|_| Particle {
                left_vw: rng.gen_range(0.0..100.0),
                duration_secs: rng.gen_range(0.6..1.4),
                opacity: rng.gen_range(0.4..1.0),
                size_px: None,
            })
            .collect();
        Self::Rain(drops)
    }

    pub fn snow<R: Rng>(count: usize, rng: &mut R) -> Self {
        let flakes = (0..count)
            .map(|_| Particle {
                left_vw: rng.gen_range(0.0..100.0),
                duration_secs: rng.gen_range(3.0..7.0),
                opacity: rng.gen_range(0.6..1.0),
                size_px: Some(rng.gen_range(4.0..12.0)),
            })
            .collect();
        Self::Snow(flakes)
    }

    /// Animation that goes with a background
    pub fn for_background<R: Rng>(background: Background, rng: &mut R) -> Self {
        match background {
            Background::Rain => Self::rain(RAIN_DROPS, rng),
            Background::Snow => Self::snow(SNOWFLAKES, rng),
            _ => Self::None,
        }
    }

    pub fn particle_count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Rain(p) | Self::Snow(p) => p.len(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.particle_count() > 0
    }
}
