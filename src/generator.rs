//! Scenario generation: pick and orient a run's scenarios from the config pools.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{AssessmentConfig, ScenarioTemplate};
use crate::error::ConfigError;

/// A scenario as presented in one run.
///
/// Same content as its template, except that the left/right options and
/// categories may have been swapped so that neither pole is systematically
/// shown on the left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScenario {
    pub id: String,
    pub stem: String,
    pub left_option: String,
    pub right_option: String,
    pub left_category: String,
    pub right_category: String,
    pub dimension: String,
    /// Whether left and right were swapped relative to the template.
    #[serde(default)]
    pub flipped: bool,
}

impl GeneratedScenario {
    pub fn from_template(template: &ScenarioTemplate, flipped: bool) -> Self {
        let (left_option, right_option, left_category, right_category) = if flipped {
            (
                &template.right_option,
                &template.left_option,
                &template.right_category,
                &template.left_category,
            )
        } else {
            (
                &template.left_option,
                &template.right_option,
                &template.left_category,
                &template.right_category,
            )
        };
        Self {
            id: template.id.clone(),
            stem: template.stem.clone(),
            left_option: left_option.clone(),
            right_option: right_option.clone(),
            left_category: left_category.clone(),
            right_category: right_category.clone(),
            dimension: template.dimension.clone(),
            flipped,
        }
    }

    /// True if `category` is offered on either pole.
    pub fn offers(&self, category: &str) -> bool {
        self.left_category == category || self.right_category == category
    }
}

/// Produce the ordered scenario sequence for one run.
///
/// For each dimension, in declaration order, the whole pool is shuffled and
/// the first `questionsPerDimension` templates are kept; each kept template
/// gets an independent fair coin for its orientation. All scenarios of the
/// first dimension precede those of the second.
pub fn generate_scenarios<R: Rng + ?Sized>(
    config: &AssessmentConfig,
    rng: &mut R,
) -> Result<Vec<GeneratedScenario>, ConfigError> {
    let count = config.questions_per_dimension();
    let sets = config
        .dimensions
        .iter()
        .map(|dim| {
            let set = config
                .scenario_set(&dim.name)
                .ok_or_else(|| ConfigError::MissingScenarioSet {
                    dimension: dim.name.clone(),
                })?;
            if set.scenarios.len() < count {
                return Err(ConfigError::PoolTooSmall {
                    dimension: dim.name.clone(),
                    available: set.scenarios.len(),
                    requested: count,
                });
            }
            Ok(set)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Every pool holds at least `count`, so the total is bounded by real data.
    let mut generated = Vec::with_capacity(config.total_questions());
    for set in sets {
        let mut pool: Vec<&ScenarioTemplate> = set.scenarios.iter().collect();
        pool.shuffle(rng);
        for template in pool.into_iter().take(count) {
            let flipped = rng.gen_bool(0.5);
            generated.push(GeneratedScenario::from_template(template, flipped));
        }
    }

    Ok(generated)
}

/// [`generate_scenarios`] with a `StdRng` seeded from `seed`.
pub fn generate_scenarios_seeded(
    config: &AssessmentConfig,
    seed: u64,
) -> Result<Vec<GeneratedScenario>, ConfigError> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_scenarios(config, &mut rng)
}
