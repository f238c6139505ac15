//! Upstream contributions API client
//!
//! This module provides functionality to fetch a user's contribution
//! calendar from the upstream API and parse it into our data structures.
//! The wire shape is private to this module; callers only see the domain
//! model.

use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{ContributionDay, LanguageStats, RepoContributionStats, UserContributions};

/// Base URL for the upstream contributions API
const CONTRIB_API_BASE_URL: &str = "https://api.contribgraph.dev/v1";

/// Errors that can occur when fetching contribution data
#[derive(Debug, Error)]
pub enum ContribError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid date format in response
    #[error("Invalid date format: {0}")]
    InvalidDate(String),
}

/// Client for fetching contribution data from the upstream API
#[derive(Debug, Clone)]
pub struct ContribClient {
    client: Client,
    base_url: String,
}

impl Default for ContribClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ContribClient {
    /// Creates a new ContribClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: CONTRIB_API_BASE_URL.to_string(),
        }
    }

    /// Creates a new ContribClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: CONTRIB_API_BASE_URL.to_string(),
        }
    }

    /// Creates a new ContribClient with a custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches the contribution calendar for the given user
    ///
    /// # Arguments
    /// * `user` - Login of the user to fetch
    ///
    /// # Returns
    /// * `Ok(UserContributions)` - The user's contribution history
    /// * `Err(ContribError)` - If the request or parsing fails
    pub async fn fetch_contributions(&self, user: &str) -> Result<UserContributions, ContribError> {
        let url = format!("{}/users/{}/contributions", self.base_url, user);

        let response = self.client.get(&url).send().await?;
        let text = response.text().await?;
        let api_response: CalendarResponse = serde_json::from_str(&text)?;

        self.parse_response(api_response)
    }

    /// Parses the upstream API response into a UserContributions struct
    fn parse_response(
        &self,
        response: CalendarResponse,
    ) -> Result<UserContributions, ContribError> {
        let user = response
            .user
            .ok_or_else(|| ContribError::MissingField("user".to_string()))?;

        let mut days = Vec::new();
        for week in &user.weeks {
            for day in &week.days {
                days.push(ContributionDay {
                    date: parse_date(&day.date)?,
                    count: day.count,
                });
            }
        }

        let repos = user
            .repositories
            .into_iter()
            .map(|repo| RepoContributionStats {
                repo: repo.name,
                commits: repo.commits,
                languages: repo
                    .languages
                    .into_iter()
                    .map(|language| LanguageStats {
                        name: language.name,
                        additions: language.additions,
                        deletions: language.deletions,
                    })
                    .collect(),
            })
            .collect();

        Ok(UserContributions {
            user: user.login,
            total: user.total_contributions,
            days,
            repos,
            fetched_at: Utc::now(),
        })
    }
}

/// Parses a date string in ISO 8601 format (e.g., "2024-07-15") to NaiveDate
fn parse_date(date_str: &str) -> Result<NaiveDate, ContribError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ContribError::InvalidDate(date_str.to_string()))
}

/// Upstream API response structure
///
/// `user` is null when the requested login does not exist.
#[derive(Debug, Deserialize)]
struct CalendarResponse {
    user: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    login: String,
    total_contributions: u32,
    weeks: Vec<WeekData>,
    #[serde(default)]
    repositories: Vec<RepoData>,
}

#[derive(Debug, Deserialize)]
struct WeekData {
    days: Vec<DayData>,
}

#[derive(Debug, Deserialize)]
struct DayData {
    date: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct RepoData {
    name: String,
    commits: u32,
    #[serde(default)]
    languages: Vec<LanguageData>,
}

#[derive(Debug, Deserialize)]
struct LanguageData {
    name: String,
    additions: u32,
    deletions: u32,
}
