use std::sync::Arc;
use tracing::info;
use visionary_common::{Result, VisionaryError};

use crate::codec::{read_json, write_json};
use crate::kv::KeyValueStore;
use crate::types::Reward;
use crate::{POINTS_KEY, REWARDS_KEY};

/// Claimed rewards and the points counter
pub struct RewardLedger {
    store: Arc<dyn KeyValueStore>,
    rewards: Arc<Vec<Reward>>,
    points: u64,
}

impl RewardLedger {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let rewards: Vec<Reward> = read_json(store.as_ref(), REWARDS_KEY)?;
        let points = match store.get(POINTS_KEY)? {
            None => 0,
            Some(raw) if raw.trim().is_empty() => 0,
            Some(raw) => raw.trim().parse().map_err(|_| {
                VisionaryError::storage(format!("Corrupt points counter: {:?}", raw))
            })?,
        };

        Ok(Self {
            store,
            rewards: Arc::new(rewards),
            points,
        })
    }

    pub fn rewards(&self) -> Arc<Vec<Reward>> {
        Arc::clone(&self.rewards)
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    /// Claim a reward on `day`
    pub fn add_reward(&mut self, name: &str, day: &str) -> Result<Reward> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VisionaryError::invalid_input("reward name cannot be empty"));
        }

        let reward = Reward::new(name, day);
        let mut next = self.rewards.as_ref().clone();
        next.push(reward.clone());
        write_json(self.store.as_ref(), REWARDS_KEY, &next)?;
        self.rewards = Arc::new(next);

        info!("Reward claimed: {}", reward.name);
        Ok(reward)
    }

    pub fn remove_reward(&mut self, id: &str) -> Result<bool> {
        if !self.rewards.iter().any(|r| r.id == id) {
            return Ok(false);
        }

        let next: Vec<Reward> = self.rewards.iter().filter(|r| r.id != id).cloned().collect();
        write_json(self.store.as_ref(), REWARDS_KEY, &next)?;
        self.rewards = Arc::new(next);
        Ok(true)
    }

    /// Add (or with a negative delta, spend) points, returns the new total
    pub fn adjust_points(&mut self, delta: i64) -> Result<u64> {
        let next = self.points.checked_add_signed(delta).ok_or_else(|| {
            VisionaryError::invalid_input(format!(
                "cannot adjust {} points by {}",
                self.points, delta
            ))
        })?;

        self.store.set(POINTS_KEY, &next.to_string())?;
        self.points = next;
        Ok(next)
    }
}
