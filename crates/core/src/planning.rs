//! Planning content domain: the AI provider identifiers, the generation
//! context handed to the AI layer, and the structured planning payload with
//! its fail-closed validator.
//!
//! The JSON field names (`weeklyAbstract`, `estimatedTime`, ...) are the wire
//! contract shared with the LLM prompt's output schema, so the serde renames
//! here are load-bearing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the three supported LLM vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Openai,
    Gemini,
    Claude,
}

impl ProviderKind {
    /// All supported providers, in configuration order.
    pub const ALL: [ProviderKind; 3] =
        [ProviderKind::Openai, ProviderKind::Gemini, ProviderKind::Claude];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Openai => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Claude => "claude",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::Openai),
            "gemini" => Ok(ProviderKind::Gemini),
            "claude" => Ok(ProviderKind::Claude),
            other => Err(format!(
                "Unknown AI provider: {other}. Supported: openai, gemini, claude"
            )),
        }
    }
}

impl TryFrom<String> for ProviderKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Question difficulty split, expressed as percentages.
///
/// Intended to sum to 100 but not enforced; only the per-component 0-100
/// range is validated at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyMix {
    pub easy: i32,
    pub medium: i32,
    pub hard: i32,
}

/// Per-course generation preferences, as consumed by the prompt builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationPreferences {
    /// Session length in minutes.
    pub session_duration: i32,
    pub number_of_questions: i32,
    pub difficulty_mix: DifficultyMix,
    /// Preferred assessment method names, e.g. "Quick Quiz".
    pub assessment_preferences: Vec<String>,
    pub teaching_style: String,
    pub additional_instructions: Option<String>,
}

/// Everything the AI layer needs to generate one week's planning sheet.
///
/// Built fresh for every generation request; never persisted.
#[derive(Debug, Clone)]
pub struct PlanningContext {
    pub course_code: String,
    pub course_name: String,
    pub week_number: i32,
    /// Formatted material excerpts, in upload order.
    pub materials: Vec<String>,
    pub preferences: GenerationPreferences,
    /// Abstracts of up to three prior weeks, most recent first.
    pub previous_weeks_topics: Vec<String>,
}

/// A practice question within a generated planning sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_text: String,
    pub difficulty: String,
    /// Estimated time in minutes.
    pub estimated_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
}

/// An assessment method within a generated planning sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentMethod {
    pub method_name: String,
    pub description: String,
    /// Duration in minutes.
    pub duration: f64,
}

/// The structured output of a successful AI generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlanning {
    pub weekly_abstract: String,
    pub learning_objectives: Vec<String>,
    pub questions: Vec<Question>,
    pub assessment_methods: Vec<AssessmentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl GeneratedPlanning {
    /// Validate a parsed JSON value against the planning schema and build the
    /// typed payload.
    ///
    /// Fails closed: every required field must be present with the exact
    /// expected type, strings must be non-empty, and the three collections
    /// must be non-empty. Nothing is defaulted or coerced (a string `"5"`
    /// for a numeric field is rejected). Any single violation rejects the
    /// whole value.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| "Response is not a JSON object".to_string())?;

        let weekly_abstract = obj
            .get("weeklyAbstract")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "Missing or invalid weeklyAbstract".to_string())?
            .to_string();

        let objectives_raw = obj
            .get("learningObjectives")
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| "Missing or invalid learningObjectives".to_string())?;
        let mut learning_objectives = Vec::with_capacity(objectives_raw.len());
        for (idx, item) in objectives_raw.iter().enumerate() {
            let objective = item
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| format!("Invalid learning objective at index {idx}"))?;
            learning_objectives.push(objective.to_string());
        }

        let questions_raw = obj
            .get("questions")
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| "Missing or invalid questions".to_string())?;
        let mut questions = Vec::with_capacity(questions_raw.len());
        for (idx, item) in questions_raw.iter().enumerate() {
            questions.push(parse_question(item).map_err(|_| format!("Invalid question at index {idx}"))?);
        }

        let assessments_raw = obj
            .get("assessmentMethods")
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| "Missing or invalid assessmentMethods".to_string())?;
        let mut assessment_methods = Vec::with_capacity(assessments_raw.len());
        for (idx, item) in assessments_raw.iter().enumerate() {
            assessment_methods.push(
                parse_assessment_method(item)
                    .map_err(|_| format!("Invalid assessment method at index {idx}"))?,
            );
        }

        let additional_notes = match obj.get("additionalNotes") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err("Invalid additionalNotes".to_string()),
        };

        Ok(GeneratedPlanning {
            weekly_abstract,
            learning_objectives,
            questions,
            assessment_methods,
            additional_notes,
        })
    }
}

fn parse_question(value: &Value) -> Result<Question, ()> {
    let obj = value.as_object().ok_or(())?;

    let question_text = obj
        .get("questionText")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(())?;
    let difficulty = obj
        .get("difficulty")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(())?;
    let estimated_time = obj.get("estimatedTime").and_then(numeric).ok_or(())?;
    let expected_answer = match obj.get("expectedAnswer") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(()),
    };

    Ok(Question {
        question_text: question_text.to_string(),
        difficulty: difficulty.to_string(),
        estimated_time,
        expected_answer,
    })
}

fn parse_assessment_method(value: &Value) -> Result<AssessmentMethod, ()> {
    let obj = value.as_object().ok_or(())?;

    let method_name = obj
        .get("methodName")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(())?;
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(())?;
    let duration = obj.get("duration").and_then(numeric).ok_or(())?;

    Ok(AssessmentMethod {
        method_name: method_name.to_string(),
        description: description.to_string(),
        duration,
    })
}

/// Accept a JSON number (integer or float); reject everything else.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
