//! Aggregation: slider responses → category scores → dimension balance → coordinates.
//!
//! Three ordered passes over the resolved responses:
//!
//! 1. **Category pass**: every configured category starts at zero. Each
//!    non-neutral preference adds its strength to the favored category. A
//!    category's `appearances` counts the responses that offered it on either
//!    pole, whether or not it was chosen. `normalizedScore = raw / (appearances * 5)`.
//! 2. **Dimension pass**: `balance = (scoreB - scoreA) / (scoreA + scoreB)`,
//!    or 0 when both scores are 0.
//! 3. **Coordinate pass**: `x` is the first dimension's balance, `y` the
//!    second's; `(0, 0)` when fewer than two dimensions are configured.
//!
//! Sums run in response-list order, so a given input always produces the
//! same floating-point output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AssessmentConfig;
use crate::error::ResponseError;
use crate::generator::GeneratedScenario;
use crate::hooks::{ScoringEvent, ScoringObserver};
use crate::preference::{
    resolve_preference, RawResponse, ResolvedPreference, SliderValue, MAX_STRENGTH,
};

// =============================================================================
// Score types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub dimension: String,
    /// Sum of strengths of responses that favored this category.
    pub raw_score: f64,
    /// Responses that offered this category on either pole.
    pub appearances: usize,
    /// `raw_score / (appearances * 5)`, in `[0, 1]`; 0 with no appearances.
    pub normalized_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    pub dimension: String,
    pub category_a: String,
    pub category_b: String,
    pub score_a: f64,
    pub score_b: f64,
    /// `(score_b - score_a) / (score_a + score_b)`, in `[-1, 1]`.
    pub balance: f64,
    pub total_questions: usize,
}

impl DimensionScore {
    /// False when neither pole received any preference, i.e. `balance` is
    /// the zero default rather than a measured neutrality.
    pub fn has_preferences(&self) -> bool {
        self.score_a + self.score_b > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentScore {
    pub assessment_id: String,
    pub category_scores: Vec<CategoryScore>,
    pub dimension_scores: Vec<DimensionScore>,
    pub coordinates: Coordinates,
    pub total_questions: usize,
}

impl AssessmentScore {
    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.category_scores.iter().find(|c| c.category == name)
    }

    pub fn dimension(&self, name: &str) -> Option<&DimensionScore> {
        self.dimension_scores.iter().find(|d| d.dimension == name)
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Score a complete set of responses against the scenarios they answered.
///
/// Every scenario must come from `config`'s pools. Every response must
/// reference one of `scenarios` and carry a slider value in `0..=10`; the
/// first violation aborts with an error. Responses are not
/// required to cover every scenario.
pub fn aggregate(
    config: &AssessmentConfig,
    scenarios: &[GeneratedScenario],
    responses: &[RawResponse],
    observer: &dyn ScoringObserver,
) -> Result<AssessmentScore, ResponseError> {
    check_scenarios(config, scenarios)?;
    let resolved = resolve_responses(scenarios, responses)?;
    for pref in &resolved {
        notify(observer, ScoringEvent::Preference(pref.clone()));
    }

    let category_scores = category_scores(&resolved, config);
    for score in &category_scores {
        notify(observer, ScoringEvent::Category(score.clone()));
    }

    let dimension_scores = dimension_scores(&category_scores, config);
    for score in &dimension_scores {
        notify(observer, ScoringEvent::Dimension(score.clone()));
    }

    let coordinates = coordinates(&dimension_scores, config);
    notify(observer, ScoringEvent::Coordinates(coordinates));

    Ok(AssessmentScore {
        assessment_id: config.id.clone(),
        category_scores,
        dimension_scores,
        coordinates,
        total_questions: responses.len(),
    })
}

fn notify(observer: &dyn ScoringObserver, event: ScoringEvent) {
    if let Err(err) = observer.on_event(&event) {
        warn!(error = %err, "Scoring observer failed; continuing");
    }
}

/// Every scenario must come from one of `config`'s templates, on the same dimension.
pub fn check_scenarios(
    config: &AssessmentConfig,
    scenarios: &[GeneratedScenario],
) -> Result<(), ResponseError> {
    let known: HashMap<&str, &str> = config
        .scenario_sets
        .iter()
        .flat_map(|set| set.scenarios.iter())
        .map(|t| (t.id.as_str(), t.dimension.as_str()))
        .collect();

    match scenarios
        .iter()
        .find(|s| known.get(s.id.as_str()) != Some(&s.dimension.as_str()))
    {
        Some(foreign) => Err(ResponseError::ForeignScenario {
            scenario_id: foreign.id.clone(),
            assessment_id: config.id.clone(),
        }),
        None => Ok(()),
    }
}

/// Validate each response and resolve it against its scenario, preserving order.
pub fn resolve_responses(
    scenarios: &[GeneratedScenario],
    responses: &[RawResponse],
) -> Result<Vec<ResolvedPreference>, ResponseError> {
    // First occurrence wins on repeated ids.
    let mut by_id: HashMap<&str, &GeneratedScenario> = HashMap::with_capacity(scenarios.len());
    for scenario in scenarios {
        by_id.entry(scenario.id.as_str()).or_insert(scenario);
    }

    responses
        .iter()
        .map(|response| {
            let scenario = by_id.get(response.scenario_id.as_str()).ok_or_else(|| {
                ResponseError::UnknownScenario {
                    scenario_id: response.scenario_id.clone(),
                }
            })?;
            let slider = SliderValue::new(response.value)?;
            Ok(resolve_preference(scenario, slider))
        })
        .collect()
}

/// Category pass. Output follows config declaration order.
pub fn category_scores(
    resolved: &[ResolvedPreference],
    config: &AssessmentConfig,
) -> Vec<CategoryScore> {
    let mut scores: Vec<CategoryScore> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for dim in &config.dimensions {
        for cat in &dim.categories {
            match index.get(cat.as_str()) {
                // A repeated name takes the later dimension, as a keyed map would.
                Some(&i) => scores[i].dimension = dim.name.clone(),
                None => {
                    index.insert(cat.as_str(), scores.len());
                    scores.push(CategoryScore {
                        category: cat.clone(),
                        dimension: dim.name.clone(),
                        raw_score: 0.0,
                        appearances: 0,
                        normalized_score: 0.0,
                    });
                }
            }
        }
    }

    for pref in resolved {
        if let Some(&i) = pref.preferred.category().and_then(|c| index.get(c)) {
            scores[i].raw_score += f64::from(pref.strength);
        }
    }

    for score in &mut scores {
        score.appearances = resolved
            .iter()
            .filter(|r| r.left_category == score.category || r.right_category == score.category)
            .count();
        let max_possible = score.appearances as f64 * f64::from(MAX_STRENGTH);
        score.normalized_score = if max_possible > 0.0 {
            score.raw_score / max_possible
        } else {
            0.0
        };
    }

    scores
}

/// Dimension pass. A category without a score counts as 0.
pub fn dimension_scores(
    category_scores: &[CategoryScore],
    config: &AssessmentConfig,
) -> Vec<DimensionScore> {
    let lookup = |name: Option<&String>| {
        name.and_then(|n| category_scores.iter().find(|c| &c.category == n))
    };

    config
        .dimensions
        .iter()
        .map(|dim| {
            let a = lookup(dim.categories.first());
            let b = lookup(dim.categories.get(1));
            let score_a = a.map_or(0.0, |c| c.normalized_score);
            let score_b = b.map_or(0.0, |c| c.normalized_score);
            let total_questions =
                a.map_or(0, |c| c.appearances) + b.map_or(0, |c| c.appearances);

            DimensionScore {
                dimension: dim.name.clone(),
                category_a: dim.categories.first().cloned().unwrap_or_default(),
                category_b: dim.categories.get(1).cloned().unwrap_or_default(),
                score_a,
                score_b,
                balance: balance(score_a, score_b),
                total_questions,
            }
        })
        .collect()
}

/// `(b - a) / (a + b)`, or 0 when both are 0.
pub fn balance(score_a: f64, score_b: f64) -> f64 {
    let total = score_a + score_b;
    if total > 0.0 {
        (score_b - score_a) / total
    } else {
        0.0
    }
}

/// Coordinate pass.
pub fn coordinates(dimension_scores: &[DimensionScore], config: &AssessmentConfig) -> Coordinates {
    if config.dimensions.len() < 2 {
        return Coordinates::default();
    }
    let balance_of = |name: &str| {
        dimension_scores
            .iter()
            .find(|d| d.dimension == name)
            .map_or(0.0, |d| d.balance)
    };
    Coordinates {
        x: balance_of(&config.dimensions[0].name),
        y: balance_of(&config.dimensions[1].name),
    }
}
