use std::sync::Arc;
use tracing::{debug, info};
use visionary_common::{Result, VisionaryError};

use crate::codec::{read_json, write_json};
use crate::kv::KeyValueStore;
use crate::types::{DailyStats, Vision};
use crate::VISIONS_KEY;

/// The visions collection, flushed to storage on every mutation
pub struct VisionBook {
    store: Arc<dyn KeyValueStore>,
    visions: Arc<Vec<Vision>>,
}

impl VisionBook {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let visions: Vec<Vision> = read_json(store.as_ref(), VISIONS_KEY)?;
        info!("Loaded {} visions", visions.len());

        Ok(Self {
            store,
            visions: Arc::new(visions),
        })
    }

    /// Consistent snapshot of the collection
    pub fn visions(&self) -> Arc<Vec<Vision>> {
        Arc::clone(&self.visions)
    }

    pub fn get(&self, id: &str) -> Option<&Vision> {
        self.visions.iter().find(|v| v.id == id)
    }

    /// Add a new vision
    pub fn add(&mut self, name: &str, description: &str) -> Result<Vision> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VisionaryError::invalid_input("vision name cannot be empty"));
        }

        let vision = Vision::new(name, description.trim());
        let mut next = self.visions.as_ref().clone();
        next.push(vision.clone());
        self.replace(next)?;

        info!("Vision added: {} ({})", vision.name, vision.id);
        Ok(vision)
    }

    /// Flip completion of `id` on `day`, returns the new completion state
    pub fn toggle_completion(&mut self, id: &str, day: &str) -> Result<bool> {
        let mut next = self.visions.as_ref().clone();
        let vision = next
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| VisionaryError::not_found(format!("vision {}", id)))?;

        let completed = if vision.completed_on(day) {
            vision.completed_dates.retain(|d| d != day);
            false
        } else {
            vision.completed_dates.push(day.to_string());
            true
        };
        self.replace(next)?;

        debug!("Vision {} completion on {}: {}", id, day, completed);
        Ok(completed)
    }

    /// Delete a vision, returns whether it existed
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Vision> = self.visions.iter().filter(|v| v.id != id).cloned().collect();
        self.replace(next)?;

        info!("Vision deleted: {}", id);
        Ok(true)
    }

    pub fn daily_stats(&self, day: &str) -> DailyStats {
        DailyStats::compute(&self.visions, day)
    }

    fn replace(&mut self, next: Vec<Vision>) -> Result<()> {
        write_json(self.store.as_ref(), VISIONS_KEY, &next)?;
        self.visions = Arc::new(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    const TODAY: &str = "Mon Oct 19 2026";

    fn book() -> (Arc<dyn KeyValueStore>, VisionBook) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let book = VisionBook::load(store.clone()).unwrap();
        (store, book)
    }

    #[test]
    fn test_add_and_reload() {
        let (store, mut book) = book();
        let vision = book.add("  Read more ", "Ten pages").unwrap();
        assert_eq!(vision.name, "Read more");

        let reloaded = VisionBook::load(store).unwrap();
        assert_eq!(reloaded.visions().as_slice(), &[vision]);
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let (_store, mut book) = book();
        assert!(book.add("   ", "whatever").is_err());
        assert!(book.visions().is_empty());
    }

    #[test]
    fn test_toggle_completion_twice() {
        let (_store, mut book) = book();
        let vision = book.add("Exercise", "").unwrap();

        assert!(book.toggle_completion(&vision.id, TODAY).unwrap());
        assert_eq!(book.get(&vision.id).unwrap().completed_dates, vec![TODAY.to_string()]);

        assert!(!book.toggle_completion(&vision.id, TODAY).unwrap());
        assert!(book.get(&vision.id).unwrap().completed_dates.is_empty());
    }

    #[test]
    fn test_toggle_unknown_vision() {
        let (_store, mut book) = book();
        let err = book.toggle_completion("missing", TODAY).unwrap_err();
        assert!(matches!(err, VisionaryError::NotFound(_)));
    }

    #[test]
    fn test_daily_stats_and_delete() {
        let (_store, mut book) = book();
        let ids: Vec<String> = ["a", "b", "c", "d"]
            .iter()
            .map(|name| book.add(name, "").unwrap().id)
            .collect();
        book.toggle_completion(&ids[0], TODAY).unwrap();

        assert_eq!(book.daily_stats(TODAY).daily_completion_rate, 25);

        assert!(book.delete(&ids[1]).unwrap());
        assert!(!book.delete(&ids[1]).unwrap());
        assert_eq!(book.daily_stats(TODAY).daily_completion_rate, 33);
    }
}
