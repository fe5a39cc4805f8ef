//! Handoff of an interpreted result to the conversation component.
//!
//! The conversation layer prepends this record to its own instruction
//! context so the assistant can refer to the respondent's style.

use serde::{Deserialize, Serialize};

use crate::config::AssessmentConfig;
use crate::scoring::Coordinates;
use crate::session::AssessmentOutcome;
use crate::style::StylePosition;

/// The interpreted style as the conversation component consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentContext {
    pub assessment_name: String,
    pub style: String,
    pub description: String,
    pub traits: Vec<String>,
    pub coordinates: Coordinates,
    pub position: StylePosition,
}

impl AssessmentContext {
    pub fn from_outcome(outcome: &AssessmentOutcome, config: &AssessmentConfig) -> Self {
        let interp = &outcome.interpretation;
        Self {
            assessment_name: config.name.clone(),
            style: interp.style.clone(),
            description: interp.description.clone(),
            traits: interp.traits.clone(),
            coordinates: outcome.score.coordinates,
            position: interp.position,
        }
    }
}

/// Render the instruction-context section describing the respondent's result.
pub fn render_context_section(ctx: &AssessmentContext) -> String {
    format!(
        "# ASSESSMENT CONTEXT\n\n\
         The user has just completed the {name}. Here are their results:\n\n\
         - **Style**: {style}\n\
         - **Description**: {description}\n\
         - **Key Traits**: {traits}\n\
         - **Coordinates**: X={x:.2}, Y={y:.2}\n\
         - **Position**: {position}\n\n\
         Use these results to personalise the conversation. Reference the user's \
         identified style where relevant, but treat the assessment as a starting \
         point for reflection, not a definitive classification. Invite the user to \
         explore what resonates and what surprises them.",
        name = ctx.assessment_name,
        style = ctx.style,
        description = ctx.description,
        traits = ctx.traits.join(", "),
        x = ctx.coordinates.x,
        y = ctx.coordinates.y,
        position = ctx.position,
    )
}

/// Append the context section to a base instruction prompt, if there is one.
pub fn append_to_system_prompt(base: &str, ctx: Option<&AssessmentContext>) -> String {
    match ctx {
        Some(ctx) => format!("{base}\n\n---\n\n{}", render_context_section(ctx)),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AssessmentContext {
        AssessmentContext {
            assessment_name: "Scholarly Identity Assessment".to_string(),
            style: "Clinical Scholarship".to_string(),
            description: "Diagnoses systemic problems.".to_string(),
            traits: vec!["holistic".to_string(), "practice-facing".to_string()],
            coordinates: Coordinates::new(0.456, -0.25),
            position: StylePosition::BorderEast,
        }
    }

    #[test]
    fn section_formats_fields() {
        let s = render_context_section(&ctx());
        assert!(s.starts_with("# ASSESSMENT CONTEXT"));
        assert!(s.contains("completed the Scholarly Identity Assessment."));
        assert!(s.contains("- **Key Traits**: holistic, practice-facing"));
        assert!(s.contains("X=0.46, Y=-0.25"));
        assert!(s.contains("- **Position**: borderEast"));
    }

    #[test]
    fn prompt_unchanged_without_context() {
        assert_eq!(append_to_system_prompt("base", None), "base");
        let with = append_to_system_prompt("base", Some(&ctx()));
        assert!(with.starts_with("base\n\n---\n\n# ASSESSMENT CONTEXT"));
    }

    #[test]
    fn serializes_position_key() {
        let v = serde_json::to_value(ctx()).unwrap();
        assert_eq!(v["position"], "borderEast");
        assert_eq!(v["assessmentName"], "Scholarly Identity Assessment");
    }
}
