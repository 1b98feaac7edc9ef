//! Score records, round reports and cloud errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::{CharacterKind, Difficulty};

/// Everything that can go wrong talking to the backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CloudError {
    #[error("not logged in")]
    NotAuthenticated,
    /// Rejected locally before any request was made
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("bad response: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CloudError {
    fn from(e: serde_json::Error) -> Self {
        CloudError::Json(e.to_string())
    }
}

/// A finished round, as reported by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub score: u64,
    pub difficulty: Difficulty,
    pub character: CharacterKind,
}

/// Receives finished rounds. Implementations must not block.
pub trait ScoreReporter {
    fn report(&self, report: RoundReport);
}

/// Drops every report (offline play, headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ScoreReporter for NullReporter {
    fn report(&self, report: RoundReport) {
        log::debug!("Offline, score {} not submitted", report.score);
    }
}

/// Row inserted into the `scores` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScore {
    pub user_id: String,
    pub username: String,
    pub score: u64,
    pub difficulty: String,
    pub character: String,
}

impl NewScore {
    pub fn new(user_id: &str, username: &str, report: &RoundReport) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            score: report.score,
            difficulty: report.difficulty.key().to_string(),
            character: report.character.name().to_string(),
        }
    }
}

/// Row read back from the `scores` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Absent from per-user queries
    #[serde(default)]
    pub username: String,
    pub score: u64,
    pub difficulty: String,
    pub character: String,
    /// ISO-8601 timestamp
    #[serde(default)]
    pub created_at: String,
}

/// Leaderboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl LeaderboardFilter {
    /// Tab key as used by the page ("ALL", "EASY", ...)
    pub fn from_tab(tab: &str) -> Self {
        match Difficulty::from_key(tab) {
            Some(difficulty) => LeaderboardFilter::Only(difficulty),
            None => LeaderboardFilter::All,
        }
    }

    pub fn tab(&self) -> &'static str {
        match self {
            LeaderboardFilter::All => "ALL",
            LeaderboardFilter::Only(difficulty) => difficulty.key(),
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            LeaderboardFilter::All => None,
            LeaderboardFilter::Only(difficulty) => Some(*difficulty),
        }
    }
}

/// Sign-in / sign-up form contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Only used when signing up
    pub username: String,
}

/// Shortest password accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

impl Credentials {
    pub fn new(email: &str, password: &str, username: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
            username: username.trim().to_string(),
        }
    }

    pub fn validate_sign_in(&self) -> Result<(), CloudError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(CloudError::InvalidCredentials(
                "Please fill in all fields".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_sign_up(&self) -> Result<(), CloudError> {
        if self.username.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(CloudError::InvalidCredentials(
                "Please fill in all fields".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CloudError::InvalidCredentials(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_validation() {
        assert!(Credentials::new("a@b.c", "secret", "rex").validate_sign_up().is_ok());

        let err = Credentials::new("a@b.c", "12345", "rex")
            .validate_sign_up()
            .unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = Credentials::new("  ", "secret", "rex")
            .validate_sign_up()
            .unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all fields");
    }

    #[test]
    fn test_sign_in_ignores_username() {
        assert!(Credentials::new("a@b.c", "x", "").validate_sign_in().is_ok());
        assert!(Credentials::new("a@b.c", "", "").validate_sign_in().is_err());
    }

    #[test]
    fn test_new_score_row() {
        let report = RoundReport {
            score: 321,
            difficulty: Difficulty::Hard,
            character: CharacterKind::Neet,
        };
        let row = NewScore::new("uid-1", "rex", &report);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["difficulty"], "HARD");
        assert_eq!(json["character"], "Neet");
        assert_eq!(json["score"], 321);
    }

    #[test]
    fn test_filter_tabs() {
        assert_eq!(LeaderboardFilter::from_tab("ALL"), LeaderboardFilter::All);
        assert_eq!(
            LeaderboardFilter::from_tab("EASY"),
            LeaderboardFilter::Only(Difficulty::Easy)
        );
        assert_eq!(LeaderboardFilter::Only(Difficulty::Hard).tab(), "HARD");
    }

    #[test]
    fn test_record_without_username() {
        let json = r#"{"score":88,"difficulty":"EASY","character":"Buddy","created_at":"2025-01-01T00:00:00Z"}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.username, "");
        assert_eq!(record.score, 88);
    }
}
