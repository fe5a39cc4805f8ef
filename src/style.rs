//! Style interpretation: coordinates → one of nine named regions.
//!
//! Each axis is classified independently into negative / neutral / positive
//! using a fixed neutral half-width. The sign pair selects a region:
//!
//! ```text
//!                 y+
//!   quadrant2  borderNorth  quadrant1
//! x- borderWest   center    borderEast x+
//!   quadrant3  borderSouth  quadrant4
//!                 y-
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AssessmentConfig;
use crate::scoring::Coordinates;

/// Half-width of the neutral band on each axis. `|v| <= NEUTRAL_THRESHOLD` is neutral.
pub const NEUTRAL_THRESHOLD: f64 = 0.1;

/// Which side of an axis a value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSign {
    Negative,
    Neutral,
    Positive,
}

/// Classify one coordinate component.
pub fn classify_axis(value: f64) -> AxisSign {
    if value.abs() <= NEUTRAL_THRESHOLD {
        AxisSign::Neutral
    } else if value > 0.0 {
        AxisSign::Positive
    } else {
        AxisSign::Negative
    }
}

/// The nine fixed regions of the coordinate plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StylePosition {
    Quadrant1,
    Quadrant2,
    Quadrant3,
    Quadrant4,
    BorderNorth,
    BorderSouth,
    BorderEast,
    BorderWest,
    Center,
}

impl StylePosition {
    pub const ALL: [StylePosition; 9] = [
        StylePosition::Quadrant1,
        StylePosition::Quadrant2,
        StylePosition::Quadrant3,
        StylePosition::Quadrant4,
        StylePosition::BorderNorth,
        StylePosition::BorderSouth,
        StylePosition::BorderEast,
        StylePosition::BorderWest,
        StylePosition::Center,
    ];

    /// Config key for this region (`"quadrant1"`, `"borderNorth"`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Self::Quadrant1 => "quadrant1",
            Self::Quadrant2 => "quadrant2",
            Self::Quadrant3 => "quadrant3",
            Self::Quadrant4 => "quadrant4",
            Self::BorderNorth => "borderNorth",
            Self::BorderSouth => "borderSouth",
            Self::BorderEast => "borderEast",
            Self::BorderWest => "borderWest",
            Self::Center => "center",
        }
    }

    pub fn from_signs(x: AxisSign, y: AxisSign) -> Self {
        use AxisSign::*;
        match (x, y) {
            (Neutral, Neutral) => Self::Center,
            (Neutral, Positive) => Self::BorderNorth,
            (Neutral, Negative) => Self::BorderSouth,
            (Negative, Neutral) => Self::BorderWest,
            (Positive, Neutral) => Self::BorderEast,
            (Positive, Positive) => Self::Quadrant1,
            (Negative, Positive) => Self::Quadrant2,
            (Negative, Negative) => Self::Quadrant3,
            (Positive, Negative) => Self::Quadrant4,
        }
    }

    /// Inverse of [`StylePosition::from_signs`].
    pub fn signs(self) -> (AxisSign, AxisSign) {
        use AxisSign::*;
        match self {
            Self::Center => (Neutral, Neutral),
            Self::BorderNorth => (Neutral, Positive),
            Self::BorderSouth => (Neutral, Negative),
            Self::BorderWest => (Negative, Neutral),
            Self::BorderEast => (Positive, Neutral),
            Self::Quadrant1 => (Positive, Positive),
            Self::Quadrant2 => (Negative, Positive),
            Self::Quadrant3 => (Negative, Negative),
            Self::Quadrant4 => (Positive, Negative),
        }
    }

    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self::from_signs(classify_axis(coordinates.x), classify_axis(coordinates.y))
    }
}

impl fmt::Display for StylePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StylePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| format!("unknown style position '{s}'"))
    }
}

/// A resolved style: the region plus its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleInterpretation {
    pub position: StylePosition,
    pub style: String,
    pub description: String,
    pub traits: Vec<String>,
}

/// Map coordinates to a style region and resolve its metadata from config.
///
/// A region with no definition in the config degrades to its raw key as the
/// display name, with empty description and traits.
pub fn interpret(coordinates: Coordinates, config: &AssessmentConfig) -> StyleInterpretation {
    let position = StylePosition::from_coordinates(coordinates);
    match config.style_definitions.get(position) {
        Some(def) => StyleInterpretation {
            position,
            style: def.name.clone(),
            description: def.description.clone(),
            traits: def.traits.clone(),
        },
        None => StyleInterpretation {
            position,
            style: position.key().to_string(),
            description: String::new(),
            traits: Vec::new(),
        },
    }
}
