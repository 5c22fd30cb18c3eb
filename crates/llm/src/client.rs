use async_trait::async_trait;
use futures::{stream, Stream, StreamExt};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};
use visionary_common::{AppConfig, Result, VisionaryError};

use crate::ndjson::NdjsonDecoder;
use crate::provider::{AnalysisProvider, FragmentStream};
use crate::types::{GenerateOptions, GenerateRequest};

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: Client,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama client initialized: {}", base_url);
        Ok(Self {
            base_url,
            model: model.into(),
            client,
        })
    }

    /// Create client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.ollama_base_url.clone(),
            config.llm_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a streaming generation and decode it into fragments
    pub async fn generate_stream(&self, request: GenerateRequest) -> Result<FragmentStream> {
        let url = format!("{}/api/generate", self.base_url);

        let mut request = request;
        request.stream = true;

        debug!(
            "Sending streaming request to Ollama - Model: {}, Prompt length: {}",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                VisionaryError::provider_stream(format!("Failed to send streaming request: {}", e))
            })?
            .error_for_status()
            .map_err(|e| VisionaryError::provider_stream(format!("Ollama API error: {}", e)))?;

        Ok(decode_body(response.bytes_stream()))
    }

    /// Test connection to Ollama
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VisionaryError::network(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }
}

/// Decode an NDJSON response body into a fragment stream
///
/// A trailing `None` marks end of body so the decoder can flush a final
/// line that had no newline, or report a body cut off before `done`.
fn decode_body<S, B, E>(body: S) -> FragmentStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    body.map(Some)
        .chain(stream::iter([None]))
        .scan(NdjsonDecoder::new(), |decoder, chunk| {
            let items = if decoder.is_done() {
                None
            } else {
                Some(match chunk {
                    Some(Ok(bytes)) => decoder.feed(bytes.as_ref()),
                    Some(Err(e)) => {
                        decoder.abort();
                        vec![Err(VisionaryError::provider_stream(format!(
                            "Stream interrupted: {}",
                            e
                        )))]
                    }
                    None => decoder.finish(),
                })
            };
            futures::future::ready(items)
        })
        .flat_map(stream::iter)
        .boxed()
}

#[async_trait]
impl AnalysisProvider for OllamaClient {
    async fn stream_analysis(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<FragmentStream> {
        let request = GenerateRequest::streaming(self.model.clone(), prompt)
            .with_system(system_instruction)
            .with_options(GenerateOptions {
                temperature: Some(0.7),
                ..Default::default()
            });

        self.generate_stream(request).await
    }

    async fn test_connection(&self) -> Result<bool> {
        OllamaClient::test_connection(self).await
    }
}
