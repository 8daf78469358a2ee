//! Goal model as supplied by the goal-management side of the app.
//!
//! The canvas only needs a goal's identity to place it; the remaining fields
//! flow through to card rendering. Goals are stored by the host under their
//! own storage key with camelCase field names, and older data carries numeric
//! ids, so [`GoalId`] accepts both strings and integers on the way in.

#[cfg(test)]
#[path = "goal_test.rs"]
mod goal_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable identity of a goal. Always held as a string so it can key the
/// persisted position map directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<u64> for GoalId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for GoalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
        })
    }
}

/// Goal category; drives card colour and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fitness,
    Work,
    Education,
    Finance,
    #[default]
    Personal,
}

impl Category {
    /// Capitalized label shown on the card.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fitness => "Fitness",
            Self::Work => "Work",
            Self::Education => "Education",
            Self::Finance => "Finance",
            Self::Personal => "Personal",
        }
    }
}

/// A tracked goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    pub current_progress: f64,
    pub target_value: f64,
    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

impl Goal {
    /// Completion as a percentage in `[0, 100]`. A non-positive target counts
    /// as no progress.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.target_value <= 0.0 {
            return 0.0;
        }
        (self.current_progress / self.target_value * 100.0).clamp(0.0, 100.0)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.percentage() >= 100.0
    }

    /// Progress after applying `increment`, kept within `[0, target]`.
    #[must_use]
    pub fn stepped_progress(&self, increment: f64) -> f64 {
        (self.current_progress + increment).min(self.target_value).max(0.0)
    }

    #[must_use]
    pub fn can_decrement(&self) -> bool {
        self.current_progress > 0.0
    }

    #[must_use]
    pub fn can_increment(&self) -> bool {
        self.current_progress < self.target_value
    }
}
