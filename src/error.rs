//! Error types for config loading and response scoring.

use thiserror::Error;

/// Errors raised while loading or validating an assessment definition.
///
/// These are precondition failures: a config that produces one of these is
/// rejected before any scenario is generated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config (or registry) file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Coordinates need exactly two dimensions.
    #[error("assessment must declare exactly 2 dimensions, found {found}")]
    WrongDimensionCount { found: usize },

    /// Every dimension is bipolar.
    #[error("dimension '{dimension}' must declare exactly 2 categories, found {found}")]
    WrongCategoryCount { dimension: String, found: usize },

    /// A category name may belong to only one pole of one dimension.
    #[error("category '{category}' is declared more than once")]
    DuplicateCategory { category: String },

    /// A declared dimension has no scenario pool.
    #[error("no scenario set for dimension '{dimension}'")]
    MissingScenarioSet { dimension: String },

    /// A scenario set references a dimension that is not declared.
    #[error("scenario set references unknown dimension '{dimension}'")]
    UnknownDimension { dimension: String },

    /// Two scenario sets claim the same dimension.
    #[error("more than one scenario set for dimension '{dimension}'")]
    DuplicateScenarioSet { dimension: String },

    /// `questionsPerDimension` must be positive.
    #[error("questionsPerDimension must be >= 1, found {found}")]
    InvalidQuestionCount { found: usize },

    /// A pool cannot supply the requested number of scenarios.
    #[error(
        "scenario pool for dimension '{dimension}' has {available} templates, \
         {requested} requested"
    )]
    PoolTooSmall {
        dimension: String,
        available: usize,
        requested: usize,
    },

    /// A template is filed under a set for another dimension.
    #[error("scenario '{scenario_id}' is tagged '{found}' but lives in the '{expected}' set")]
    TemplateDimensionMismatch {
        scenario_id: String,
        expected: String,
        found: String,
    },

    /// A template's two options must be the two poles of its dimension.
    #[error(
        "scenario '{scenario_id}' pairs '{left}' with '{right}', \
         which are not the two categories of '{dimension}'"
    )]
    TemplateCategoryMismatch {
        scenario_id: String,
        dimension: String,
        left: String,
        right: String,
    },

    /// Scenario ids key responses, so they must be unique across pools.
    #[error("scenario id '{scenario_id}' is used more than once")]
    DuplicateScenarioId { scenario_id: String },

    /// The registry has no entry with the requested id.
    #[error("unknown assessment '{id}'")]
    UnknownAssessment { id: String },
}

/// Errors raised for respondent input that breaks the scoring contract.
///
/// Bad input is rejected rather than corrected: clamping a slider or
/// skipping a response would silently change the normalization denominator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("slider value {value} is outside 0..=10")]
    SliderOutOfRange { value: i64 },

    #[error("response references unknown scenario '{scenario_id}'")]
    UnknownScenario { scenario_id: String },

    #[error("scenario '{scenario_id}' is not part of assessment '{assessment_id}'")]
    ForeignScenario {
        scenario_id: String,
        assessment_id: String,
    },

    #[error("all {total} scenarios have already been answered")]
    RunComplete { total: usize },

    #[error("run is incomplete: {answered} of {total} scenarios answered")]
    Incomplete { answered: usize, total: usize },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
