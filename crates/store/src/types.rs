use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use visionary_common::VisionaryError;

/// Day string stored in completion lists, e.g. `Mon Oct 19 2026`
pub fn day_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Day string for the local current date
pub fn today_key() -> String {
    day_key(Local::now().date_naive())
}

/// A user-defined goal tracked with daily completion dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vision {
    /// Unique identifier
    pub id: String,

    /// Short name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Days on which the vision was completed, in insertion order
    #[serde(default)]
    pub completed_dates: Vec<String>,
}

impl Vision {
    /// Create new vision with no completions
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            completed_dates: Vec::new(),
        }
    }

    /// Whether the vision was completed on `day`
    pub fn completed_on(&self, day: &str) -> bool {
        self.completed_dates.iter().any(|d| d == day)
    }
}

/// A saved prompt/response pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier
    pub id: String,

    /// Text sent for analysis
    pub prompt: String,

    /// Final analysis text
    pub response: String,

    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl Conversation {
    /// Create new conversation stamped with the current time
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A claimed reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Unique identifier
    pub id: String,

    /// Reward name
    pub name: String,

    /// Day the reward was claimed
    pub date: String,
}

impl Reward {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            date: date.into(),
        }
    }
}

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = VisionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(VisionaryError::invalid_input(format!("Unknown theme '{}'", other))),
        }
    }
}

/// Completion statistics for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    /// Number of visions
    pub total_visions: usize,

    /// Visions completed on the day
    pub completed_today: usize,

    /// Rounded integer percent, 0 when there are no visions
    pub daily_completion_rate: u32,
}

impl DailyStats {
    /// Compute statistics for `day` over `visions`
    pub fn compute(visions: &[Vision], day: &str) -> Self {
        let total_visions = visions.len();
        let completed_today = visions.iter().filter(|v| v.completed_on(day)).count();
        let daily_completion_rate = if total_visions > 0 {
            (completed_today as f64 / total_visions as f64 * 100.0).round() as u32
        } else {
            0
        };

        Self {
            total_visions,
            completed_today,
            daily_completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key_format() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert_eq!(day_key(date), "Mon Oct 05 2026");
    }

    #[test]
    fn test_vision_json_layout() {
        let mut vision = Vision::new("Read more", "Ten pages a day");
        vision.completed_dates.push("Mon Oct 19 2026".to_string());

        let json = serde_json::to_value(&vision).unwrap();
        assert_eq!(json["completedDates"][0], "Mon Oct 19 2026");
        assert_eq!(json["name"], "Read more");
    }

    #[test]
    fn test_completion_rate_quarter() {
        let today = "Mon Oct 19 2026";
        let mut visions: Vec<Vision> = (0..4).map(|i| Vision::new(format!("v{}", i), "")).collect();
        visions[2].completed_dates.push(today.to_string());
        visions[3].completed_dates.push("Sun Oct 18 2026".to_string());

        let stats = DailyStats::compute(&visions, today);
        assert_eq!(stats.total_visions, 4);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.daily_completion_rate, 25);
    }

    #[test]
    fn test_completion_rate_without_visions() {
        let stats = DailyStats::compute(&[], "Mon Oct 19 2026");
        assert_eq!(stats.daily_completion_rate, 0);
        assert_eq!(stats.completed_today, 0);
    }

    #[test]
    fn test_completion_rate_rounds() {
        let today = "Mon Oct 19 2026";
        let mut visions: Vec<Vision> = (0..3).map(|i| Vision::new(format!("v{}", i), "")).collect();
        visions[0].completed_dates.push(today.to_string());
        visions[1].completed_dates.push(today.to_string());

        assert_eq!(DailyStats::compute(&visions, today).daily_completion_rate, 67);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
