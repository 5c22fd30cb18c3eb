//! Instruction templates for analysis requests

/// Instruction for personalized suggestions built from the user's visions
pub const SUGGESTIONS_INSTRUCTION: &str = "Based on the following context about a user's visions and their daily progress, provide personalized, actionable, and encouraging AI suggestions for new habits or ways to improve their current vision tracking and overall well-being. Respond in well-formatted markdown.";

/// Instruction for analysis of free-form user text
pub const GENERAL_ANALYSIS_INSTRUCTION: &str = "Analyze the following text and provide a concise summary or key insights. If the text appears to be a personal reflection or related to mindset, offer general, encouraging feedback or relevant observations. Respond in well-formatted markdown.";

/// Placeholder used when no vision has a description
pub const NO_DESCRIPTIONS: &str = "No descriptions provided.";

/// Context block for the suggestions request
///
/// `vision_lines` are `name: description` lines, one per vision.
pub fn suggestions_context(
    vision_lines: &[String],
    completion_rate: u32,
    completed_today: usize,
    total_visions: usize,
) -> String {
    let all_vision_info = vision_lines.join("\n");
    let descriptions = if all_vision_info.is_empty() {
        NO_DESCRIPTIONS
    } else {
        all_vision_info.as_str()
    };

    format!(
        "User's visions descriptions:\n\"{}\"\nToday's completion rate: {}% ({} out of {} visions completed).\n",
        descriptions, completion_rate, completed_today, total_visions
    )
}
