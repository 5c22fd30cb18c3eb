//! Visionary persisted state
//!
//! String-keyed storage plus the collections kept in it: visions,
//! rewards and points, theme, and saved conversations.

mod codec;
mod conversations;
mod kv;
mod rewards;
mod settings;
mod types;
mod visions;

pub use conversations::ConversationRecorder;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use rewards::RewardLedger;
pub use settings::Settings;
pub use types::{day_key, today_key, Conversation, DailyStats, Reward, Theme, Vision};
pub use visions::VisionBook;

/// Storage key for the visions collection
pub const VISIONS_KEY: &str = "visionaryVisions";

/// Storage key for the rewards collection
pub const REWARDS_KEY: &str = "visionaryRewards";

/// Storage key for the points counter
pub const POINTS_KEY: &str = "visionaryPoints";

/// Storage key for the theme preference
pub const THEME_KEY: &str = "visionaryTheme";

/// Storage key for the conversation history
pub const CONVERSATIONS_KEY: &str = "visionaryConversations";
