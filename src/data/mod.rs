//! Core data models for contribution history
//!
//! This module contains the data types used throughout the application for
//! representing a user's source-control contribution history, plus the
//! client that fetches that history from the upstream API.

pub mod upstream;

pub use upstream::{ContribClient, ContribError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::Emptiness;

/// A single calendar day of contribution activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    /// Calendar date of the activity
    pub date: NaiveDate,
    /// Number of contributions made that day
    pub count: u32,
}

/// Lines changed in one language within a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    /// Language name as reported by the upstream API
    pub name: String,
    /// Lines added
    pub additions: u32,
    /// Lines removed
    pub deletions: u32,
}

/// Per-repository contribution aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoContributionStats {
    /// Repository name in `owner/name` form
    pub repo: String,
    /// Commits attributed to the user
    pub commits: u32,
    /// Lines changed per language
    pub languages: Vec<LanguageStats>,
}

/// A user's contribution history as fetched from the upstream API
///
/// This is the payload request handlers produce and the memo cache stores.
/// A history with no days reports itself empty, so "user exists but has no
/// activity" is never cached and gets refetched on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContributions {
    /// Login of the user the history belongs to
    pub user: String,
    /// Total contributions across the calendar
    pub total: u32,
    /// Per-day activity, oldest first
    pub days: Vec<ContributionDay>,
    /// Per-repository aggregates
    pub repos: Vec<RepoContributionStats>,
    /// When this data was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Default for UserContributions {
    fn default() -> Self {
        Self {
            user: String::new(),
            total: 0,
            days: Vec::new(),
            repos: Vec::new(),
            fetched_at: Utc::now(),
        }
    }
}

impl Emptiness for UserContributions {
    fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
