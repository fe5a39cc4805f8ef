//! Assessment definitions: shape, loading, and validation.
//!
//! An assessment is a JSON document (camelCase keys) declaring two bipolar
//! dimensions, one scenario pool per dimension, how many scenarios to draw
//! from each pool, and the nine style definitions. A registry index lists
//! the available assessments and where their documents live.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::style::{AxisSign, StylePosition};

// =============================================================================
// Assessment document
// =============================================================================

/// A named bipolar axis. `categories[0]` is the negative pole, `categories[1]`
/// the positive pole.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<String>,
    /// Axis label for the negative end.
    pub left_label: String,
    /// Axis label for the positive end.
    pub right_label: String,
}

impl Dimension {
    /// The (negative, positive) pole names, if the dimension is well-formed.
    pub fn poles(&self) -> Option<(&str, &str)> {
        match self.categories.as_slice() {
            [a, b] => Some((a.as_str(), b.as_str())),
            _ => None,
        }
    }
}

/// A forced-choice prompt as written in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTemplate {
    pub id: String,
    pub stem: String,
    pub left_option: String,
    pub right_option: String,
    pub left_category: String,
    pub right_category: String,
    pub dimension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub dimension: String,
    pub scenarios: Vec<ScenarioTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSettings {
    pub questions_per_dimension: usize,
}

/// Declared sign pair of a style region, as written in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCoordinates {
    pub x: AxisSign,
    pub y: AxisSign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<StyleCoordinates>,
    #[serde(default)]
    pub traits: Vec<String>,
}

/// Style definitions keyed by region.
///
/// Keys are parsed into [`StylePosition`] when the document is read; keys
/// that name no region are dropped with a warning. Regions may be missing,
/// in which case interpretation falls back to the raw key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, StyleDefinition>",
    into = "BTreeMap<String, StyleDefinition>"
)]
pub struct StyleDefinitions(BTreeMap<StylePosition, StyleDefinition>);

impl StyleDefinitions {
    pub fn get(&self, position: StylePosition) -> Option<&StyleDefinition> {
        self.0.get(&position)
    }

    pub fn insert(&mut self, position: StylePosition, def: StyleDefinition) {
        self.0.insert(position, def);
    }

    pub fn remove(&mut self, position: StylePosition) -> Option<StyleDefinition> {
        self.0.remove(&position)
    }

    pub fn missing(&self) -> Vec<StylePosition> {
        StylePosition::ALL
            .into_iter()
            .filter(|p| !self.0.contains_key(p))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StylePosition, &StyleDefinition)> {
        self.0.iter().map(|(p, d)| (*p, d))
    }
}

impl From<BTreeMap<String, StyleDefinition>> for StyleDefinitions {
    fn from(raw: BTreeMap<String, StyleDefinition>) -> Self {
        let mut out = BTreeMap::new();
        for (key, def) in raw {
            match key.parse::<StylePosition>() {
                Ok(position) => {
                    out.insert(position, def);
                }
                Err(_) => warn!(key = %key, "Ignoring style definition for unknown position"),
            }
        }
        Self(out)
    }
}

impl From<StyleDefinitions> for BTreeMap<String, StyleDefinition> {
    fn from(defs: StyleDefinitions) -> Self {
        defs.0
            .into_iter()
            .map(|(p, d)| (p.key().to_string(), d))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentMetadata {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub description: String,
}

/// A complete assessment definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    pub dimensions: Vec<Dimension>,
    pub scenario_sets: Vec<ScenarioSet>,
    pub assessment_settings: AssessmentSettings,
    #[serde(default)]
    pub style_definitions: StyleDefinitions,
    #[serde(default)]
    pub metadata: AssessmentMetadata,
}

impl AssessmentConfig {
    pub fn questions_per_dimension(&self) -> usize {
        self.assessment_settings.questions_per_dimension
    }

    /// Number of scenarios a run presents. Saturates on absurd settings.
    pub fn total_questions(&self) -> usize {
        self.questions_per_dimension()
            .saturating_mul(self.dimensions.len())
    }

    pub fn scenario_set(&self, dimension: &str) -> Option<&ScenarioSet> {
        self.scenario_sets.iter().find(|s| s.dimension == dimension)
    }

    /// Check every load-time precondition the engine relies on.
    ///
    /// Missing style definitions and declared style coordinates that disagree
    /// with their region are reported with `warn!` but do not fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions.len() != 2 {
            return Err(ConfigError::WrongDimensionCount {
                found: self.dimensions.len(),
            });
        }

        let mut seen_categories = HashSet::new();
        for dim in &self.dimensions {
            if dim.categories.len() != 2 {
                return Err(ConfigError::WrongCategoryCount {
                    dimension: dim.name.clone(),
                    found: dim.categories.len(),
                });
            }
            for cat in &dim.categories {
                if !seen_categories.insert(cat.as_str()) {
                    return Err(ConfigError::DuplicateCategory {
                        category: cat.clone(),
                    });
                }
            }
        }

        let requested = self.questions_per_dimension();
        if requested == 0 {
            return Err(ConfigError::InvalidQuestionCount { found: requested });
        }

        let dims: HashMap<&str, &Dimension> = self
            .dimensions
            .iter()
            .map(|d| (d.name.as_str(), d))
            .collect();
        let mut seen_sets = HashSet::new();
        for set in &self.scenario_sets {
            if !dims.contains_key(set.dimension.as_str()) {
                return Err(ConfigError::UnknownDimension {
                    dimension: set.dimension.clone(),
                });
            }
            if !seen_sets.insert(set.dimension.as_str()) {
                return Err(ConfigError::DuplicateScenarioSet {
                    dimension: set.dimension.clone(),
                });
            }
        }

        let mut seen_ids = HashSet::new();
        for dim in &self.dimensions {
            let set = self
                .scenario_set(&dim.name)
                .ok_or_else(|| ConfigError::MissingScenarioSet {
                    dimension: dim.name.clone(),
                })?;
            if set.scenarios.len() < requested {
                return Err(ConfigError::PoolTooSmall {
                    dimension: dim.name.clone(),
                    available: set.scenarios.len(),
                    requested,
                });
            }
            for template in &set.scenarios {
                validate_template(template, dim)?;
                if !seen_ids.insert(template.id.as_str()) {
                    return Err(ConfigError::DuplicateScenarioId {
                        scenario_id: template.id.clone(),
                    });
                }
            }
        }

        for position in self.style_definitions.missing() {
            warn!(
                assessment = %self.id,
                position = %position,
                "No style definition; results in this region will show the raw key"
            );
        }
        for (position, def) in self.style_definitions.iter() {
            if let Some(declared) = def.coordinates {
                if (declared.x, declared.y) != position.signs() {
                    warn!(
                        assessment = %self.id,
                        position = %position,
                        "Style definition declares coordinates that do not match its region"
                    );
                }
            }
        }

        Ok(())
    }
}

fn validate_template(template: &ScenarioTemplate, dim: &Dimension) -> Result<(), ConfigError> {
    if template.dimension != dim.name {
        return Err(ConfigError::TemplateDimensionMismatch {
            scenario_id: template.id.clone(),
            expected: dim.name.clone(),
            found: template.dimension.clone(),
        });
    }
    let poles_match = match dim.poles() {
        Some((a, b)) => {
            (template.left_category == a && template.right_category == b)
                || (template.left_category == b && template.right_category == a)
        }
        None => false,
    };
    if !poles_match {
        return Err(ConfigError::TemplateCategoryMismatch {
            scenario_id: template.id.clone(),
            dimension: dim.name.clone(),
            left: template.left_category.clone(),
            right: template.right_category.clone(),
        });
    }
    Ok(())
}

/// Read, parse, and validate an assessment document.
pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<AssessmentConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
    let config: AssessmentConfig = serde_json::from_str(&raw)
        .map_err(|e| ConfigError::parse(path.display().to_string(), e))?;
    config.validate()?;
    Ok(config)
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Path of the assessment document, relative to the registry file.
    pub config_file: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub question_count: usize,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryMetadata {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub total_assessments: usize,
    #[serde(default)]
    pub version: String,
}

/// Index of the assessments available to a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRegistry {
    pub assessments: Vec<RegistryEntry>,
    pub default_assessment: String,
    #[serde(default)]
    pub metadata: RegistryMetadata,
}

impl AssessmentRegistry {
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.assessments.iter().find(|a| a.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.assessments.iter().filter(|a| a.is_active)
    }

    pub fn default_entry(&self) -> Option<&RegistryEntry> {
        self.get(&self.default_assessment)
    }
}

pub fn load_registry_from_path(path: impl AsRef<Path>) -> Result<AssessmentRegistry, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
    let registry: AssessmentRegistry = serde_json::from_str(&raw)
        .map_err(|e| ConfigError::parse(path.display().to_string(), e))?;
    if registry.default_entry().is_none() {
        warn!(
            default = %registry.default_assessment,
            "Registry default assessment has no entry"
        );
    }
    Ok(registry)
}

/// Resolve an entry's document path against the registry file's directory.
pub fn entry_config_path(registry_path: &Path, entry: &RegistryEntry) -> PathBuf {
    registry_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&entry.config_file)
}

/// Load an assessment by id through the registry at `registry_path`.
pub fn load_config_by_id(
    registry_path: impl AsRef<Path>,
    id: &str,
) -> Result<AssessmentConfig, ConfigError> {
    let registry_path = registry_path.as_ref();
    let registry = load_registry_from_path(registry_path)?;
    let entry = registry
        .get(id)
        .ok_or_else(|| ConfigError::UnknownAssessment { id: id.to_string() })?;
    load_config_from_path(entry_config_path(registry_path, entry))
}

// =============================================================================
// TESTS
// =============================================================================
