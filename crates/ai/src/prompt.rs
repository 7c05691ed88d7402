//! Prompt construction for planning sheet generation.
//!
//! Pure and deterministic: the same [`PlanningContext`] always produces the
//! same instruction string, and the same string is sent to whichever provider
//! ends up selected (vendor-specific reminders are the clients' business).

use std::fmt::Write;

use planner_core::planning::PlanningContext;

/// Render the generation context into a single instruction block with an
/// embedded JSON output schema.
pub fn build_prompt(context: &PlanningContext) -> String {
    let prefs = &context.preferences;
    let mut prompt = String::new();

    prompt.push_str(
        "You are an AI assistant helping create a peer study session planning sheet for a university course.\n\n",
    );

    let _ = write!(
        prompt,
        "**Course Information:**\n\
         - Course: {} - {}\n\
         - Week Number: {}\n\
         - Session Duration: {} minutes\n\
         - Teaching Style: {}\n\n",
        context.course_code,
        context.course_name,
        context.week_number,
        prefs.session_duration,
        prefs.teaching_style,
    );

    prompt.push_str("**Course Materials for This Week:**\n");
    for (idx, material) in context.materials.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", idx + 1, material);
    }
    prompt.push('\n');

    if !context.previous_weeks_topics.is_empty() {
        let _ = write!(
            prompt,
            "**Previous Weeks Topics:**\n{}\n\n",
            context.previous_weeks_topics.join(", ")
        );
    }

    let _ = write!(
        prompt,
        "**Customization Preferences:**\n\
         - Number of Questions: {}\n\
         - Difficulty Mix: {}% easy, {}% medium, {}% hard\n\
         - Preferred Assessment Methods: {}\n",
        prefs.number_of_questions,
        prefs.difficulty_mix.easy,
        prefs.difficulty_mix.medium,
        prefs.difficulty_mix.hard,
        prefs.assessment_preferences.join(", "),
    );
    if let Some(instructions) = &prefs.additional_instructions {
        let _ = writeln!(prompt, "- Additional Instructions: {instructions}");
    }
    prompt.push('\n');

    prompt.push_str(
        "**Required Output (JSON format only):**\n\
         Generate a peer study session planning sheet with the following structure:\n\n\
         {\n\
         \x20 \"weeklyAbstract\": \"A concise 2-3 sentence summary of what will be covered this week\",\n\
         \x20 \"learningObjectives\": [\"objective 1\", \"objective 2\", \"objective 3\"],\n\
         \x20 \"questions\": [\n\
         \x20   {\n\
         \x20     \"questionText\": \"The question text\",\n\
         \x20     \"difficulty\": \"easy|medium|hard\",\n\
         \x20     \"estimatedTime\": minutes_as_number,\n\
         \x20     \"expectedAnswer\": \"Brief expected answer or key points\"\n\
         \x20   }\n\
         \x20 ],\n\
         \x20 \"assessmentMethods\": [\n\
         \x20   {\n\
         \x20     \"methodName\": \"Name of assessment method\",\n\
         \x20     \"description\": \"How to use this method\",\n\
         \x20     \"duration\": minutes_as_number\n\
         \x20   }\n\
         \x20 ],\n\
         \x20 \"additionalNotes\": \"Any additional tips or notes for the session lead\"\n\
         }\n\n",
    );

    let _ = write!(
        prompt,
        "**Important Guidelines:**\n\
         1. Generate exactly {} questions\n\
         2. Follow the specified difficulty distribution\n\
         3. Questions should progress from basic understanding to application\n\
         4. Assessment methods should check different levels of understanding\n\
         5. Ensure all content is relevant to the course materials provided\n\
         6. Make questions specific and actionable\n\
         7. Provide practical assessment methods that fit within the session duration\n\n\
         Respond ONLY with valid JSON. Do not include any markdown formatting or code blocks.",
        prefs.number_of_questions,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::planning::{DifficultyMix, GenerationPreferences};

    fn context() -> PlanningContext {
        PlanningContext {
            course_code: "CS101".to_string(),
            course_name: "Introduction to Computer Science".to_string(),
            week_number: 3,
            materials: vec![
                "**Lecture 5** (lecture_notes): Lecture on recursion".to_string(),
                "**Lab 2** (assignments): Lab on sorting".to_string(),
            ],
            preferences: GenerationPreferences {
                session_duration: 90,
                number_of_questions: 5,
                difficulty_mix: DifficultyMix {
                    easy: 30,
                    medium: 50,
                    hard: 20,
                },
                assessment_preferences: vec![
                    "Quick Quiz".to_string(),
                    "Group Discussion".to_string(),
                ],
                teaching_style: "interactive".to_string(),
                additional_instructions: None,
            },
            previous_weeks_topics: vec![],
        }
    }

    #[test]
    fn test_contains_course_identity_and_week() {
        let prompt = build_prompt(&context());
        assert!(prompt.contains("CS101 - Introduction to Computer Science"));
        assert!(prompt.contains("Week Number: 3"));
    }

    #[test]
    fn test_materials_enumerated_in_order() {
        let prompt = build_prompt(&context());
        let first = prompt
            .find("1. **Lecture 5** (lecture_notes): Lecture on recursion")
            .expect("first material should be listed");
        let second = prompt
            .find("2. **Lab 2** (assignments): Lab on sorting")
            .expect("second material should be listed");
        assert!(first < second, "materials must keep their order");
    }

    #[test]
    fn test_previous_topics_block_only_when_present() {
        let prompt = build_prompt(&context());
        assert!(!prompt.contains("Previous Weeks Topics"));

        let mut ctx = context();
        ctx.previous_weeks_topics =
            vec!["Variables and types".to_string(), "Control flow".to_string()];
        let prompt = build_prompt(&ctx);
        assert!(prompt.contains("**Previous Weeks Topics:**\nVariables and types, Control flow"));
    }

    #[test]
    fn test_additional_instructions_only_when_present() {
        let prompt = build_prompt(&context());
        assert!(!prompt.contains("Additional Instructions"));

        let mut ctx = context();
        ctx.preferences.additional_instructions = Some("Focus on exam preparation".to_string());
        let prompt = build_prompt(&ctx);
        assert!(prompt.contains("- Additional Instructions: Focus on exam preparation"));
    }

    #[test]
    fn test_customization_parameters_present() {
        let prompt = build_prompt(&context());
        assert!(prompt.contains("Generate exactly 5 questions"));
        assert!(prompt.contains("30% easy, 50% medium, 20% hard"));
        assert!(prompt.contains("Quick Quiz, Group Discussion"));
        assert!(prompt.contains("Session Duration: 90 minutes"));
        assert!(prompt.contains("Teaching Style: interactive"));
    }

    #[test]
    fn test_closing_json_instruction() {
        let prompt = build_prompt(&context());
        assert!(prompt.ends_with(
            "Respond ONLY with valid JSON. Do not include any markdown formatting or code blocks."
        ));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(build_prompt(&context()), build_prompt(&context()));
    }
}
