use std::sync::Arc;
use tracing::info;
use visionary_common::{Result, VisionaryError, EMPTY_INPUT_MESSAGE};
use visionary_llm::{
    suggestions_context, AnalysisPanel, AnalysisProvider, Renderer, StreamConsumer, StreamOutcome,
    GENERAL_ANALYSIS_INSTRUCTION, SUGGESTIONS_INSTRUCTION,
};
use visionary_store::{Conversation, ConversationRecorder, DailyStats, Vision};

/// The two analysis panels and the consumer feeding them
pub struct Assistant {
    consumer: StreamConsumer,
    suggestions: AnalysisPanel,
    general: AnalysisPanel,
}

impl Assistant {
    pub fn new(provider: Arc<dyn AnalysisProvider>, renderer: Option<Renderer>) -> Self {
        let mut suggestions = AnalysisPanel::new("suggestions");
        let mut general = AnalysisPanel::new("general");
        if let Some(renderer) = renderer {
            suggestions = suggestions.with_renderer(renderer.clone());
            general = general.with_renderer(renderer);
        }

        Self {
            consumer: StreamConsumer::new(provider),
            suggestions,
            general,
        }
    }

    pub fn suggestions_panel(&self) -> &AnalysisPanel {
        &self.suggestions
    }

    pub fn general_panel(&self) -> &AnalysisPanel {
        &self.general
    }

    /// Stream personalized suggestions for the given visions
    pub async fn get_suggestions(&self, visions: &[Vision], stats: &DailyStats) -> StreamOutcome {
        let lines: Vec<String> = visions
            .iter()
            .map(|v| format!("{}: {}", v.name, v.description))
            .collect();
        let context = suggestions_context(
            &lines,
            stats.daily_completion_rate,
            stats.completed_today,
            stats.total_visions,
        );

        info!("Requesting suggestions for {} visions", visions.len());
        self.suggestions
            .run(&self.consumer, &context, SUGGESTIONS_INSTRUCTION)
            .await
    }

    /// Stream an analysis of free-form text
    ///
    /// Blank input is rejected before the provider is contacted.
    pub async fn analyze_text(&self, input: &str) -> Result<StreamOutcome> {
        if input.trim().is_empty() {
            self.general.show_message(EMPTY_INPUT_MESSAGE);
            return Err(VisionaryError::empty_input("analysis text is blank"));
        }

        info!("Requesting general analysis - Input length: {}", input.len());
        Ok(self
            .general
            .run(&self.consumer, input, GENERAL_ANALYSIS_INSTRUCTION)
            .await)
    }

    /// Save the analyzed text with its finished general analysis
    pub fn save_general(&self, recorder: &mut ConversationRecorder) -> Result<Conversation> {
        let state = self.general.state();
        if state.loading {
            return Err(VisionaryError::invalid_input("analysis is still in progress"));
        }
        if state.failed {
            return Err(VisionaryError::invalid_input("a failed analysis cannot be saved"));
        }

        let request = self
            .general
            .last_completed()
            .ok_or_else(|| VisionaryError::invalid_input("there is no finished analysis to save"))?;
        if request.response.trim().is_empty() {
            return Err(VisionaryError::invalid_input("the analysis returned no text to save"));
        }

        recorder.save(&request.prompt, &request.response)
    }

    pub async fn check_provider(&self) -> Result<bool> {
        self.consumer.provider().test_connection().await
    }
}
