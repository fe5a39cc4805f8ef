//! A single respondent's pass through an assessment.
//!
//! [`AssessmentRun`] owns the generated scenarios and the responses given so
//! far. Nothing is persisted: abandoning a run is just dropping it.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AssessmentConfig;
use crate::error::{ConfigError, ResponseError};
use crate::generator::{generate_scenarios, GeneratedScenario};
use crate::hooks::ScoringObserver;
use crate::preference::{RawResponse, SliderValue};
use crate::scoring::{aggregate, AssessmentScore};
use crate::style::{interpret, StyleInterpretation};

/// Where the respondent is within the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProgress {
    /// 1 while answering the first dimension's scenarios, 2 after.
    pub phase: u8,
    /// 1-based index of the current question within its phase.
    pub question_in_phase: usize,
    pub questions_in_phase: usize,
    pub answered: usize,
    pub total: usize,
    /// Share of the run reached by the current question, `0..=100`.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStep {
    Next,
    Complete,
}

/// Scored and interpreted result of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    pub score: AssessmentScore,
    pub interpretation: StyleInterpretation,
    pub completed_at: DateTime<Utc>,
}

impl AssessmentOutcome {
    /// Interpret `score` against `config` and stamp the completion time.
    pub fn from_score(score: AssessmentScore, config: &AssessmentConfig) -> Self {
        let interpretation = interpret(score.coordinates, config);
        Self {
            run_id: None,
            score,
            interpretation,
            completed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssessmentRun {
    run_id: Uuid,
    assessment_id: String,
    scenarios: Vec<GeneratedScenario>,
    responses: Vec<RawResponse>,
}

impl AssessmentRun {
    /// Generate a fresh scenario sequence for `config`.
    pub fn start<R: Rng + ?Sized>(
        config: &AssessmentConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let scenarios = generate_scenarios(config, rng)?;
        Ok(Self::with_scenarios(config, scenarios))
    }

    /// Resume with an already generated sequence.
    pub fn with_scenarios(config: &AssessmentConfig, scenarios: Vec<GeneratedScenario>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            assessment_id: config.id.clone(),
            responses: Vec::with_capacity(scenarios.len()),
            scenarios,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn assessment_id(&self) -> &str {
        &self.assessment_id
    }

    pub fn scenarios(&self) -> &[GeneratedScenario] {
        &self.scenarios
    }

    pub fn responses(&self) -> &[RawResponse] {
        &self.responses
    }

    pub fn is_complete(&self) -> bool {
        self.responses.len() >= self.scenarios.len()
    }

    pub fn current_scenario(&self) -> Option<&GeneratedScenario> {
        self.scenarios.get(self.responses.len())
    }

    /// Progress at the current question; `None` once every scenario is answered.
    pub fn progress(&self) -> Option<RunProgress> {
        let total = self.scenarios.len();
        let index = self.responses.len();
        if index >= total {
            return None;
        }
        let first_phase = total.div_ceil(2);
        let (phase, question_in_phase, questions_in_phase) = if index < first_phase {
            (1, index + 1, first_phase)
        } else {
            (2, index - first_phase + 1, total - first_phase)
        };
        Some(RunProgress {
            phase,
            question_in_phase,
            questions_in_phase,
            answered: index,
            total,
            percent: (index + 1) as f64 / total as f64 * 100.0,
        })
    }

    /// Record an answer to the current scenario.
    pub fn submit(&mut self, value: i64) -> Result<RunStep, ResponseError> {
        let total = self.scenarios.len();
        let scenario_id = match self.current_scenario() {
            Some(s) => s.id.clone(),
            None => return Err(ResponseError::RunComplete { total }),
        };
        SliderValue::new(value)?;
        self.responses.push(RawResponse::new(scenario_id, value));
        Ok(if self.is_complete() {
            RunStep::Complete
        } else {
            RunStep::Next
        })
    }

    /// Score and interpret a completed run.
    pub fn finish(
        &self,
        config: &AssessmentConfig,
        observer: &dyn ScoringObserver,
    ) -> Result<AssessmentOutcome, ResponseError> {
        if !self.is_complete() {
            return Err(ResponseError::Incomplete {
                answered: self.responses.len(),
                total: self.scenarios.len(),
            });
        }
        let score = aggregate(config, &self.scenarios, &self.responses, observer)?;
        let mut outcome = AssessmentOutcome::from_score(score, config);
        outcome.run_id = Some(self.run_id);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::tests::sample_config;
    use crate::hooks::NoopObserver;
    use crate::style::StylePosition;

    fn run(pool: usize, per_dimension: usize) -> (AssessmentConfig, AssessmentRun) {
        let cfg = sample_config(pool, per_dimension);
        let mut rng = StdRng::seed_from_u64(42);
        let run = AssessmentRun::start(&cfg, &mut rng).unwrap();
        (cfg, run)
    }

    #[test]
    fn phases_split_the_run_in_half() {
        let (_, mut run) = run(5, 3);
        let p = run.progress().unwrap();
        assert_eq!((p.phase, p.question_in_phase, p.questions_in_phase), (1, 1, 3));

        for _ in 0..3 {
            run.submit(5).unwrap();
        }
        let p = run.progress().unwrap();
        assert_eq!((p.phase, p.question_in_phase, p.questions_in_phase), (2, 1, 3));
        assert_eq!(p.answered, 3);
        assert!((p.percent - 4.0 / 6.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn submit_rejects_bad_values_without_advancing() {
        let (_, mut run) = run(2, 1);
        assert_eq!(
            run.submit(-3),
            Err(ResponseError::SliderOutOfRange { value: -3 })
        );
        assert!(run.responses().is_empty());
        assert_eq!(run.submit(0), Ok(RunStep::Next));
        assert_eq!(run.submit(10), Ok(RunStep::Complete));
        assert_eq!(run.submit(5), Err(ResponseError::RunComplete { total: 2 }));
        assert!(run.progress().is_none());
    }

    #[test]
    fn finish_requires_every_answer() {
        let (cfg, mut run) = run(2, 1);
        run.submit(4).unwrap();
        assert_eq!(
            run.finish(&cfg, &NoopObserver).unwrap_err(),
            ResponseError::Incomplete {
                answered: 1,
                total: 2
            }
        );
    }

    #[test]
    fn neutral_run_lands_in_center() {
        let (cfg, mut run) = run(4, 4);
        while run.submit(5).unwrap() == RunStep::Next {}
        let outcome = run.finish(&cfg, &NoopObserver).unwrap();
        assert_eq!(outcome.run_id, Some(run.run_id()));
        assert_eq!(outcome.score.total_questions, 8);
        assert_eq!(outcome.interpretation.position, StylePosition::Center);
        assert_eq!(outcome.interpretation.style, "Style center");
    }
}
