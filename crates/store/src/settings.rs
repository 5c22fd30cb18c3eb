use std::sync::Arc;
use tracing::warn;
use visionary_common::Result;

use crate::kv::KeyValueStore;
use crate::types::Theme;
use crate::THEME_KEY;

/// Theme preference accessor
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored theme, default when absent or unrecognized
    pub fn load_theme(&self) -> Result<Theme> {
        let theme = match self.store.get(THEME_KEY)? {
            None => Theme::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring unknown stored theme {:?}", raw);
                Theme::default()
            }),
        };
        Ok(theme)
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn test_theme_default_and_save() {
        let settings = Settings::new(Arc::new(MemoryStore::new()));
        assert_eq!(settings.load_theme().unwrap(), Theme::Dark);

        settings.save_theme(Theme::Light).unwrap();
        assert_eq!(settings.load_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "neon").unwrap();
        assert_eq!(Settings::new(store).load_theme().unwrap(), Theme::Dark);
    }
}
