#![forbid(unsafe_code)]

//! # compass-harness
//!
//! Forced-choice self-assessment on two bipolar scales.
//!
//! A respondent sees a sequence of scenarios, each pairing two options that
//! belong to the opposite poles of one dimension, and answers each on a 0–10
//! slider. The engine turns those answers into a point in `[-1, 1]²` and
//! names the region of the plane it falls in:
//!
//! 1. [`generator`] draws and orients scenarios from the config pools using a
//!    caller-supplied RNG, so runs are reproducible from a seed.
//! 2. [`preference`] resolves each slider value into a favored pole and a
//!    strength.
//! 3. [`scoring`] folds preferences into per-category normalized scores,
//!    per-dimension balance, and coordinates.
//! 4. [`style`] classifies the coordinates into one of nine regions and
//!    resolves its display metadata.
//!
//! [`session`] wraps the pipeline for one respondent and [`context`] renders
//! the result for a downstream conversation.

pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod hooks;
pub mod preference;
pub mod scoring;
pub mod session;
pub mod style;
pub mod trace;

pub use config::{
    load_config_by_id, load_config_from_path, load_registry_from_path, AssessmentConfig,
    AssessmentRegistry,
};
pub use context::{append_to_system_prompt, render_context_section, AssessmentContext};
pub use error::{ConfigError, ResponseError};
pub use generator::{generate_scenarios, generate_scenarios_seeded, GeneratedScenario};
pub use hooks::{NoopObserver, ScoringEvent, ScoringObserver, TracingObserver};
pub use preference::{resolve_preference, RawResponse, ResolvedPreference, SliderValue};
pub use scoring::{aggregate, AssessmentScore, CategoryScore, Coordinates, DimensionScore};
pub use session::{AssessmentOutcome, AssessmentRun, RunProgress, RunStep};
pub use style::{interpret, StyleInterpretation, StylePosition};
pub use trace::{JsonlTraceSink, ScoringTrace, TraceError, TraceWorker};
