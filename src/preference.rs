//! Slider responses and their resolution into signed preferences.

use serde::{Deserialize, Serialize};

use crate::error::ResponseError;
use crate::generator::GeneratedScenario;

/// Slider midpoint; a response here expresses no preference.
pub const SLIDER_MIDPOINT: u8 = 5;
/// Largest slider value. The smallest is 0.
pub const SLIDER_MAX: u8 = 10;
/// Largest possible preference strength.
pub const MAX_STRENGTH: u8 = SLIDER_MAX - SLIDER_MIDPOINT;

/// One respondent answer, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    #[serde(alias = "questionId")]
    pub scenario_id: String,
    pub value: i64,
}

impl RawResponse {
    pub fn new(scenario_id: impl Into<String>, value: i64) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            value,
        }
    }
}

/// A slider position known to lie in `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SliderValue(u8);

impl SliderValue {
    pub fn new(value: i64) -> Result<Self, ResponseError> {
        if (0..=i64::from(SLIDER_MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ResponseError::SliderOutOfRange { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for SliderValue {
    type Error = ResponseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Which pole a response favored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum Preference {
    Neutral,
    Category(String),
}

impl Preference {
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Neutral => None,
            Self::Category(c) => Some(c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPreference {
    pub scenario_id: String,
    pub value: u8,
    pub preferred: Preference,
    /// Distance of the slider from its midpoint, `0..=5`.
    pub strength: u8,
    pub left_category: String,
    pub right_category: String,
    pub dimension: String,
}

/// Resolve one slider position against the scenario it answered.
pub fn resolve_preference(scenario: &GeneratedScenario, slider: SliderValue) -> ResolvedPreference {
    let value = slider.get();
    let (preferred, strength) = if value < SLIDER_MIDPOINT {
        (
            Preference::Category(scenario.left_category.clone()),
            SLIDER_MIDPOINT - value,
        )
    } else if value > SLIDER_MIDPOINT {
        (
            Preference::Category(scenario.right_category.clone()),
            value - SLIDER_MIDPOINT,
        )
    } else {
        (Preference::Neutral, 0)
    };

    ResolvedPreference {
        scenario_id: scenario.id.clone(),
        value,
        preferred,
        strength,
        left_category: scenario.left_category.clone(),
        right_category: scenario.right_category.clone(),
        dimension: scenario.dimension.clone(),
    }
}
