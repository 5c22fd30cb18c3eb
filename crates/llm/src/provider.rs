use async_trait::async_trait;
use futures::stream::BoxStream;
use visionary_common::Result;

/// Ordered text fragments of one analysis response
///
/// The stream ends when the response is complete; an `Err` item is
/// terminal and nothing after it is read.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// Source of streamed text analysis
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Open a fragment stream for `prompt` under `system_instruction`
    async fn stream_analysis(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<FragmentStream>;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool>;
}
