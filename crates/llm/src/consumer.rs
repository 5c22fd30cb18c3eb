use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use visionary_common::{VisionaryError, ANALYSIS_FAILED_MESSAGE};

use crate::provider::AnalysisProvider;

/// How a consumed stream ended
#[derive(Debug)]
pub enum StreamOutcome {
    /// The provider finished the response
    Completed { text: String },

    /// The provider failed; `partial` holds what arrived before the failure
    Failed { partial: String, error: VisionaryError },

    /// The caller cancelled before the response finished
    Cancelled { partial: String },
}

impl StreamOutcome {
    /// Final text of a completed stream
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamOutcome::Completed { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StreamOutcome::Completed { .. })
    }
}

/// Folds a provider's fragment stream into one growing string
#[derive(Clone)]
pub struct StreamConsumer {
    provider: Arc<dyn AnalysisProvider>,
}

impl StreamConsumer {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn AnalysisProvider> {
        &self.provider
    }

    /// Stream an analysis of `context` under `instruction`
    ///
    /// `on_update` receives the full accumulated text after every fragment.
    /// `on_done` is called exactly once with the final text, or with
    /// [`ANALYSIS_FAILED_MESSAGE`] and `true` if the stream failed.
    pub async fn consume<U, D>(
        &self,
        context: &str,
        instruction: &str,
        on_update: U,
        on_done: D,
    ) -> StreamOutcome
    where
        U: FnMut(&str),
        D: FnOnce(&str, bool),
    {
        let never = CancellationToken::new();
        self.consume_until_cancelled(context, instruction, &never, on_update, on_done)
            .await
    }

    /// Like [`consume`](Self::consume), but stops as soon as `cancel` fires
    ///
    /// Cancelling drops the fragment stream (closing the provider
    /// connection) and skips `on_done`.
    pub async fn consume_until_cancelled<U, D>(
        &self,
        context: &str,
        instruction: &str,
        cancel: &CancellationToken,
        mut on_update: U,
        on_done: D,
    ) -> StreamOutcome
    where
        U: FnMut(&str),
        D: FnOnce(&str, bool),
    {
        debug!(
            "Opening analysis stream - Context length: {}, Instruction length: {}",
            context.len(),
            instruction.len()
        );

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return StreamOutcome::Cancelled { partial: String::new() };
            }
            opened = self.provider.stream_analysis(context, instruction) => opened,
        };

        let mut fragments = match opened {
            Ok(fragments) => fragments,
            Err(error) => {
                warn!("Analysis stream could not be opened: {}", error);
                on_done(ANALYSIS_FAILED_MESSAGE, true);
                return StreamOutcome::Failed {
                    partial: String::new(),
                    error,
                };
            }
        };

        let mut accumulated = String::new();
        let mut count = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Analysis stream cancelled after {} fragments", count);
                    return StreamOutcome::Cancelled { partial: accumulated };
                }
                next = fragments.next() => next,
            };

            match next {
                Some(Ok(fragment)) => {
                    count += 1;
                    accumulated.push_str(&fragment);
                    on_update(&accumulated);
                }
                Some(Err(error)) => {
                    warn!(
                        "Analysis stream failed after {} fragments ({} chars): {}",
                        count,
                        accumulated.len(),
                        error
                    );
                    on_done(ANALYSIS_FAILED_MESSAGE, true);
                    return StreamOutcome::Failed {
                        partial: accumulated,
                        error,
                    };
                }
                None => {
                    info!(
                        "Analysis stream completed - {} fragments, {} chars",
                        count,
                        accumulated.len()
                    );
                    on_done(&accumulated, false);
                    return StreamOutcome::Completed { text: accumulated };
                }
            }
        }
    }
}
