use std::sync::Arc;
use tracing::{info, warn};
use visionary_common::{Result, VisionaryError};

use crate::codec::{read_json, write_json};
use crate::kv::KeyValueStore;
use crate::types::Conversation;
use crate::CONVERSATIONS_KEY;

/// Saved conversation history, most recent first
///
/// The collection is held as an `Arc<Vec<_>>` and only ever replaced as a
/// whole, after the new value has been persisted. Snapshots handed out by
/// [`ConversationRecorder::conversations`] therefore never change under
/// the reader, and a failed write leaves the previous collection in place.
pub struct ConversationRecorder {
    store: Arc<dyn KeyValueStore>,
    conversations: Arc<Vec<Conversation>>,
}

impl ConversationRecorder {
    /// Load the collection from storage (absent key = empty)
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let conversations: Vec<Conversation> = read_json(store.as_ref(), CONVERSATIONS_KEY)?;
        info!("Loaded {} saved conversations", conversations.len());

        Ok(Self {
            store,
            conversations: Arc::new(conversations),
        })
    }

    /// Consistent snapshot of the collection
    pub fn conversations(&self) -> Arc<Vec<Conversation>> {
        Arc::clone(&self.conversations)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Record a finished prompt/response pair
    pub fn save(&mut self, prompt: &str, response: &str) -> Result<Conversation> {
        if prompt.trim().is_empty() {
            return Err(VisionaryError::empty_input("conversation prompt is blank"));
        }
        if response.trim().is_empty() {
            return Err(VisionaryError::empty_input("conversation response is blank"));
        }

        let conversation = Conversation::new(prompt, response);

        let mut next = Vec::with_capacity(self.conversations.len() + 1);
        next.push(conversation.clone());
        next.extend(self.conversations.iter().cloned());
        self.replace(next)?;

        info!("Conversation saved: {}", conversation.id);
        Ok(conversation)
    }

    /// Delete a conversation, returns whether it existed
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Conversation> = self
            .conversations
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        self.replace(next)?;

        info!("Conversation deleted: {}", id);
        Ok(true)
    }

    /// Remove every saved conversation
    pub fn clear(&mut self) -> Result<()> {
        self.replace(Vec::new())
    }

    fn replace(&mut self, next: Vec<Conversation>) -> Result<()> {
        if let Err(e) = write_json(self.store.as_ref(), CONVERSATIONS_KEY, &next) {
            warn!("Conversation history not persisted: {}", e);
            return Err(e);
        }
        self.conversations = Arc::new(next);
        Ok(())
    }
}
