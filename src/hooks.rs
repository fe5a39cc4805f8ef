//! Extension hooks for observing the scoring fold.
//!
//! The engine never logs intermediate scores on its own. Callers that want
//! them (debugging, audit trails, progress displays) pass a
//! [`ScoringObserver`]; the default [`NoopObserver`] keeps the engine silent.

use serde::Serialize;
use tracing::debug;

use crate::preference::ResolvedPreference;
use crate::scoring::{CategoryScore, Coordinates, DimensionScore};

/// One intermediate result of [`crate::scoring::aggregate`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ScoringEvent {
    Preference(ResolvedPreference),
    Category(CategoryScore),
    Dimension(DimensionScore),
    Coordinates(Coordinates),
}

#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("{0}")]
    Message(String),
}

/// Receives scoring events in fold order. Failures are logged by the caller
/// and never alter the score.
pub trait ScoringObserver {
    fn on_event(&self, event: &ScoringEvent) -> Result<(), ObserverError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScoringObserver for NoopObserver {
    fn on_event(&self, _event: &ScoringEvent) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Emits every event at `debug` level through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScoringObserver for TracingObserver {
    fn on_event(&self, event: &ScoringEvent) -> Result<(), ObserverError> {
        match event {
            ScoringEvent::Preference(p) => debug!(
                scenario = %p.scenario_id,
                value = p.value,
                preferred = p.preferred.category().unwrap_or("neutral"),
                strength = p.strength,
                dimension = %p.dimension,
                "resolved preference"
            ),
            ScoringEvent::Category(c) => debug!(
                category = %c.category,
                dimension = %c.dimension,
                raw = c.raw_score,
                normalized = c.normalized_score,
                appearances = c.appearances,
                "category score"
            ),
            ScoringEvent::Dimension(d) => debug!(
                dimension = %d.dimension,
                category_a = %d.category_a,
                score_a = d.score_a,
                category_b = %d.category_b,
                score_b = d.score_b,
                balance = d.balance,
                "dimension score"
            ),
            ScoringEvent::Coordinates(c) => debug!(x = c.x, y = c.y, "coordinates"),
        }
        Ok(())
    }
}

/// Collects events in memory. Mostly useful in tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<ScoringEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScoringEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ScoringObserver for RecordingObserver {
    fn on_event(&self, event: &ScoringEvent) -> Result<(), ObserverError> {
        self.events
            .lock()
            .map_err(|_| ObserverError::Message("recording observer poisoned".to_string()))?
            .push(event.clone());
        Ok(())
    }
}
