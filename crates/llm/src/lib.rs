//! Visionary AI Integration
//!
//! Streaming Ollama client and the consumer side of an analysis stream:
//! folding fragments into a growing result and routing it to a panel.

mod client;
mod consumer;
mod ndjson;
mod panel;
mod prompts;
mod provider;
mod types;

pub use client::OllamaClient;
pub use consumer::{StreamConsumer, StreamOutcome};
pub use ndjson::NdjsonDecoder;
pub use panel::{AnalysisPanel, CompletedRequest, Renderer, RequestTicket, StreamState};
pub use prompts::{
    suggestions_context, GENERAL_ANALYSIS_INSTRUCTION, NO_DESCRIPTIONS, SUGGESTIONS_INSTRUCTION,
};
pub use provider::{AnalysisProvider, FragmentStream};
pub use types::{GenerateOptions, GenerateRequest, GenerateResponse};
