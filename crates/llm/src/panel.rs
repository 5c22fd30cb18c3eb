use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::consumer::{StreamConsumer, StreamOutcome};

/// What a panel currently displays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    /// Accumulated text, or the failure/inline message
    pub text: String,

    /// A request is in flight
    pub loading: bool,

    /// The last request ended in failure
    pub failed: bool,
}

/// Called with the new state after every change that reaches the panel
pub type Renderer = Arc<dyn Fn(&StreamState) + Send + Sync>;

/// Identity of one request on a panel
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    cancel: CancellationToken,
}

/// A request that ran to completion on a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRequest {
    /// Context the request was started with
    pub prompt: String,

    /// Final accumulated text
    pub response: String,
}

struct PanelInner {
    state: StreamState,
    generation: u64,
    cancel: CancellationToken,
    prompt: String,
    completed: bool,
}

/// One logical request slot (e.g. one input box)
///
/// Starting a request supersedes the one in flight: its stream is
/// cancelled and anything it still reports carries a stale ticket and
/// is dropped.
#[derive(Clone)]
pub struct AnalysisPanel {
    name: Arc<str>,
    inner: Arc<Mutex<PanelInner>>,
    renderer: Option<Renderer>,
}

impl AnalysisPanel {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            inner: Arc::new(Mutex::new(PanelInner {
                state: StreamState::default(),
                generation: 0,
                cancel: CancellationToken::new(),
                prompt: String::new(),
                completed: false,
            })),
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Snapshot of the displayed state
    pub fn state(&self) -> StreamState {
        self.inner.lock().state.clone()
    }

    /// The current request, if it finished without failing
    ///
    /// Cleared as soon as another request or message takes over.
    pub fn last_completed(&self) -> Option<CompletedRequest> {
        let inner = self.inner.lock();
        inner.completed.then(|| CompletedRequest {
            prompt: inner.prompt.clone(),
            response: inner.state.text.clone(),
        })
    }

    /// Start a new request for `prompt`, superseding any request in flight
    pub fn begin(&self, prompt: &str) -> RequestTicket {
        self.supersede(
            prompt,
            StreamState {
                text: String::new(),
                loading: true,
                failed: false,
            },
        )
    }

    /// Supersede any request in flight and display an inline message
    pub fn show_message(&self, message: &str) {
        self.supersede(
            "",
            StreamState {
                text: message.to_string(),
                loading: false,
                failed: false,
            },
        );
    }

    /// Apply a partial result, ignored when `ticket` is stale
    pub fn apply_update(&self, ticket: &RequestTicket, partial: &str) -> bool {
        self.apply(ticket, |inner| {
            inner.state.text.clear();
            inner.state.text.push_str(partial);
        })
    }

    /// Apply the terminal result, ignored when `ticket` is stale
    pub fn apply_done(&self, ticket: &RequestTicket, text: &str, failed: bool) -> bool {
        self.apply(ticket, |inner| {
            inner.state.text.clear();
            inner.state.text.push_str(text);
            inner.state.loading = false;
            inner.state.failed = failed;
            inner.completed = !failed;
        })
    }

    /// Run one request through `consumer`, routing results to this panel
    pub async fn run(
        &self,
        consumer: &StreamConsumer,
        context: &str,
        instruction: &str,
    ) -> StreamOutcome {
        let ticket = self.begin(context);

        let outcome = consumer
            .consume_until_cancelled(
                context,
                instruction,
                &ticket.cancel,
                |partial| {
                    self.apply_update(&ticket, partial);
                },
                |text, failed| {
                    self.apply_done(&ticket, text, failed);
                },
            )
            .await;

        if let StreamOutcome::Cancelled { partial } = &outcome {
            debug!(
                "Panel '{}' request {} superseded after {} chars",
                self.name,
                ticket.generation,
                partial.len()
            );
        }
        outcome
    }

    fn supersede(&self, prompt: &str, state: StreamState) -> RequestTicket {
        let (ticket, snapshot) = {
            let mut inner = self.inner.lock();
            inner.cancel.cancel();
            inner.generation += 1;
            inner.cancel = CancellationToken::new();
            inner.state = state;
            inner.prompt = prompt.to_string();
            inner.completed = false;
            (
                RequestTicket {
                    generation: inner.generation,
                    cancel: inner.cancel.clone(),
                },
                inner.state.clone(),
            )
        };

        debug!("Panel '{}' now serving request {}", self.name, ticket.generation);
        self.render(&snapshot);
        ticket
    }

    fn apply(&self, ticket: &RequestTicket, change: impl FnOnce(&mut PanelInner)) -> bool {
        let snapshot = {
            let mut inner = self.inner.lock();
            if inner.generation != ticket.generation {
                return false;
            }
            change(&mut *inner);
            inner.state.clone()
        };

        self.render(&snapshot);
        true
    }

    fn render(&self, state: &StreamState) {
        if let Some(renderer) = &self.renderer {
            renderer(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::tests::{consumer_for, scripted};
    use futures::StreamExt;
    use visionary_common::{Result, VisionaryError, ANALYSIS_FAILED_MESSAGE};

    #[tokio::test]
    async fn test_run_completes_and_freezes_state() {
        let panel = AnalysisPanel::new("general");
        let consumer = consumer_for(vec![scripted(&["Try ", "reading ", "10 pages."])]);

        let outcome = panel.run(&consumer, "ctx", "inst").await;

        assert!(outcome.is_completed());
        assert_eq!(
            panel.state(),
            StreamState {
                text: "Try reading 10 pages.".to_string(),
                loading: false,
                failed: false,
            }
        );
        assert_eq!(
            panel.last_completed(),
            Some(CompletedRequest {
                prompt: "ctx".to_string(),
                response: "Try reading 10 pages.".to_string(),
            })
        );
    }

    #[test]
    fn test_last_completed_tracks_current_request() {
        let panel = AnalysisPanel::new("general");
        assert_eq!(panel.last_completed(), None);

        let ticket = panel.begin("first prompt");
        panel.apply_update(&ticket, "partial");
        assert_eq!(panel.last_completed(), None);

        panel.apply_done(&ticket, "answer", false);
        assert_eq!(panel.last_completed().unwrap().prompt, "first prompt");

        panel.begin("second prompt");
        assert_eq!(panel.last_completed(), None);

        panel.show_message("Please enter some text to analyze.");
        assert_eq!(panel.last_completed(), None);
    }

    #[tokio::test]
    async fn test_failure_replaces_text_with_message() {
        let panel = AnalysisPanel::new("general");
        let items: Vec<Result<String>> = vec![
            Ok("Partial ".to_string()),
            Err(VisionaryError::provider_stream("boom")),
        ];
        let consumer = consumer_for(vec![futures::stream::iter(items).boxed()]);

        panel.run(&consumer, "ctx", "inst").await;

        let state = panel.state();
        assert_eq!(state.text, ANALYSIS_FAILED_MESSAGE);
        assert!(state.failed);
        assert!(!state.loading);
        assert_eq!(panel.last_completed(), None);
    }

    #[tokio::test]
    async fn test_second_request_supersedes_first() {
        let (tx_old, rx_old) = futures::channel::mpsc::unbounded::<Result<String>>();
        let (tx_new, rx_new) = futures::channel::mpsc::unbounded::<Result<String>>();
        let consumer = consumer_for(vec![rx_old.boxed(), rx_new.boxed()]);
        let panel = AnalysisPanel::new("suggestions");

        tx_old.unbounded_send(Ok("old ".to_string())).unwrap();
        tx_new.unbounded_send(Ok("new ".to_string())).unwrap();
        tx_new.unbounded_send(Ok("text".to_string())).unwrap();
        drop(tx_new);

        let first = panel.run(&consumer, "ctx", "inst");
        let second = async {
            // Let the first request start and show its first fragment
            tokio::task::yield_now().await;
            assert_eq!(panel.state().text, "old ");
            let outcome = panel.run(&consumer, "ctx", "inst").await;
            // Late fragment for the abandoned request
            let _ = tx_old.unbounded_send(Ok(" late".to_string()));
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, StreamOutcome::Cancelled { .. }));
        assert_eq!(second.text(), Some("new text"));
        assert_eq!(
            panel.state(),
            StreamState {
                text: "new text".to_string(),
                loading: false,
                failed: false,
            }
        );
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let panel = AnalysisPanel::new("general");
        let old = panel.begin("ctx");
        assert!(panel.apply_update(&old, "old partial"));

        let new = panel.begin("ctx");
        assert!(old.cancel.is_cancelled());
        assert!(!new.cancel.is_cancelled());

        assert!(!panel.apply_update(&old, "old partial, more"));
        assert!(!panel.apply_done(&old, "old final", false));
        assert_eq!(panel.state().text, "");
        assert!(panel.state().loading);

        assert!(panel.apply_done(&new, "fresh", false));
        assert_eq!(panel.state().text, "fresh");
    }

    #[test]
    fn test_show_message_supersedes() {
        let panel = AnalysisPanel::new("general");
        let ticket = panel.begin("ctx");

        panel.show_message("Please enter some text to analyze.");
        assert!(ticket.cancel.is_cancelled());
        assert!(!panel.apply_update(&ticket, "late"));

        let state = panel.state();
        assert_eq!(state.text, "Please enter some text to analyze.");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_renderer_sees_every_applied_state() {
        let seen: Arc<Mutex<Vec<StreamState>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let panel = AnalysisPanel::new("general")
            .with_renderer(Arc::new(move |state: &StreamState| sink.lock().push(state.clone())));
        let consumer = consumer_for(vec![scripted(&["a", "b"])]);

        panel.run(&consumer, "ctx", "inst").await;

        let texts: Vec<(String, bool)> = seen
            .lock()
            .iter()
            .map(|s| (s.text.clone(), s.loading))
            .collect();
        assert_eq!(
            texts,
            vec![
                (String::new(), true),
                ("a".to_string(), true),
                ("ab".to_string(), true),
                ("ab".to_string(), false),
            ]
        );
    }
}
