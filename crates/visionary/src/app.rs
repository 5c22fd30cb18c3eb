use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use visionary_common::{AppConfig, Result};
use visionary_llm::{AnalysisProvider, OllamaClient, Renderer};
use visionary_store::{
    ConversationRecorder, FileStore, KeyValueStore, RewardLedger, Settings, VisionBook,
};

use crate::assistant::Assistant;

/// Application context: every collection loaded from storage at startup
/// and handed to the commands that need it
pub struct AppContext {
    /// Application configuration
    pub config: AppConfig,

    /// Visions collection
    pub visions: Arc<RwLock<VisionBook>>,

    /// Saved conversations
    pub conversations: Arc<RwLock<ConversationRecorder>>,

    /// Rewards and points
    pub rewards: Arc<RwLock<RewardLedger>>,

    /// Theme preference
    pub settings: Settings,

    /// Analysis panels
    pub assistant: Assistant,
}

impl AppContext {
    /// Create context backed by the data directory and the configured Ollama server
    pub fn new(config: AppConfig, renderer: Option<Renderer>) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
        let provider: Arc<dyn AnalysisProvider> = Arc::new(OllamaClient::from_config(&config)?);
        Self::with_parts(config, store, provider, renderer)
    }

    /// Create context from explicit collaborators
    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn AnalysisProvider>,
        renderer: Option<Renderer>,
    ) -> Result<Self> {
        let visions = VisionBook::load(store.clone())?;
        let conversations = ConversationRecorder::load(store.clone())?;
        let rewards = RewardLedger::load(store.clone())?;

        info!("Application context ready - data dir: {}", config.data_dir.display());

        Ok(Self {
            config,
            visions: Arc::new(RwLock::new(visions)),
            conversations: Arc::new(RwLock::new(conversations)),
            rewards: Arc::new(RwLock::new(rewards)),
            settings: Settings::new(store),
            assistant: Assistant::new(provider, renderer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::tests::ScriptedProvider;
    use visionary_store::{MemoryStore, Theme};

    #[tokio::test]
    async fn test_context_shares_one_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let provider = Arc::new(ScriptedProvider::new(&["Keep ", "going."]));
        let ctx =
            AppContext::with_parts(AppConfig::default(), store.clone(), provider, None).unwrap();

        let vision = ctx.visions.write().await.add("Read more", "Ten pages").unwrap();
        ctx.settings.save_theme(Theme::Light).unwrap();

        let visions = ctx.visions.read().await.visions();
        let stats = ctx.visions.read().await.daily_stats("Mon Oct 19 2026");
        ctx.assistant.get_suggestions(&visions, &stats).await;

        let reopened = AppContext::with_parts(
            AppConfig::default(),
            store,
            Arc::new(ScriptedProvider::new(&[])),
            None,
        )
        .unwrap();
        assert_eq!(reopened.visions.read().await.get(&vision.id), Some(&vision));
        assert_eq!(reopened.settings.load_theme().unwrap(), Theme::Light);
        assert_eq!(ctx.assistant.suggestions_panel().state().text, "Keep going.");
    }

    #[tokio::test]
    async fn test_context_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: tmp.path().join("data"),
            log_dir: tmp.path().join("log"),
            ..AppConfig::default()
        };

        let ctx = AppContext::new(config.clone(), None).unwrap();
        ctx.conversations.write().await.save("prompt", "response").unwrap();

        let reopened = AppContext::new(config, None).unwrap();
        assert_eq!(reopened.conversations.read().await.len(), 1);
    }
}
