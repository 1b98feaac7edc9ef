//! Leaderboard view model
//!
//! Turns query results into the rows and lines the page shows. Query failures
//! display the same way as an empty board.

use super::records::{CloudError, ScoreRecord};

pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_MESSAGE: &str = "No scores yet. Be the first!";

/// Ranks that get podium styling
const PODIUM: usize = 3;

/// How long a successful login message stays up before the modal closes
pub const AUTH_CLOSE_DELAY_MS: u32 = 1500;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    /// 1-based
    pub rank: usize,
    pub username: String,
    /// "DIFFICULTY · Character"
    pub details: String,
    pub score: u64,
}

impl LeaderboardRow {
    pub fn rank_label(&self) -> String {
        format!("#{}", self.rank)
    }

    /// Top three rows are highlighted
    pub fn podium(&self) -> bool {
        self.rank <= PODIUM
    }

    /// CSS class for the entry, e.g. "leaderboard-entry rank-1"
    pub fn css_class(&self) -> String {
        if self.podium() {
            format!("leaderboard-entry rank-{}", self.rank)
        } else {
            "leaderboard-entry".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LeaderboardView {
    #[default]
    Loading,
    Empty,
    Rows(Vec<LeaderboardRow>),
}

impl LeaderboardView {
    pub fn from_result(result: Result<Vec<ScoreRecord>, CloudError>) -> Self {
        match result {
            Ok(records) => Self::from_records(&records),
            Err(e) => {
                log::warn!("Leaderboard query failed: {e}");
                LeaderboardView::Empty
            }
        }
    }

    /// Records are expected best first
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        if records.is_empty() {
            return LeaderboardView::Empty;
        }
        LeaderboardView::Rows(
            records
                .iter()
                .enumerate()
                .map(|(i, record)| LeaderboardRow {
                    rank: i + 1,
                    username: record.username.clone(),
                    details: format!("{} · {}", record.difficulty, record.character),
                    score: record.score,
                })
                .collect(),
        )
    }

    /// Placeholder text, if no rows are shown
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LeaderboardView::Loading => Some(LOADING_MESSAGE),
            LeaderboardView::Empty => Some(EMPTY_MESSAGE),
            LeaderboardView::Rows(_) => None,
        }
    }
}

/// "Score: N | DIFFICULTY | Character", or nothing when there is no best yet
pub fn personal_best_line(result: Result<Option<ScoreRecord>, CloudError>) -> Option<String> {
    match result {
        Ok(Some(best)) => Some(format!(
            "Score: {} | {} | {}",
            best.score, best.difficulty, best.character
        )),
        Ok(None) => None,
        Err(e) => {
            log::warn!("Personal best query failed: {e}");
            None
        }
    }
}

/// The two forms of the account modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Login,
    SignUp,
}

impl AuthForm {
    pub fn button_id(self) -> &'static str {
        match self {
            AuthForm::Login => "loginBtn",
            AuthForm::SignUp => "signupBtn",
        }
    }

    /// Button caption; the button is disabled while `busy`
    pub fn button_label(self, busy: bool) -> &'static str {
        match (self, busy) {
            (AuthForm::Login, false) => "Login",
            (AuthForm::Login, true) => "Logging in...",
            (AuthForm::SignUp, false) => "Sign Up",
            (AuthForm::SignUp, true) => "Signing up...",
        }
    }
}

/// What the modal shows once a request settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub message: String,
    pub success: bool,
    /// Close the modal after this many milliseconds
    pub close_after_ms: Option<u32>,
}

impl AuthOutcome {
    pub fn new(form: AuthForm, result: Result<String, CloudError>) -> Self {
        match result {
            // Sign-up keeps the modal open so the confirmation hint stays readable
            Ok(message) => Self {
                message,
                success: true,
                close_after_ms: (form == AuthForm::Login).then_some(AUTH_CLOSE_DELAY_MS),
            },
            Err(e) => Self {
                message: match e {
                    CloudError::InvalidCredentials(message) => message,
                    CloudError::Http { message, .. } => message,
                    other => other.to_string(),
                },
                success: false,
                close_after_ms: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, score: u64) -> ScoreRecord {
        ScoreRecord {
            username: username.into(),
            score,
            difficulty: "HARD".into(),
            character: "Neet".into(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_rows_ranked_in_order() {
        let records: Vec<_> = (0..5).map(|i| record(&format!("p{i}"), 100 - i)).collect();
        let LeaderboardView::Rows(rows) = LeaderboardView::from_records(&records) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].rank_label(), "#1");
        assert_eq!(rows[0].details, "HARD · Neet");
        assert!(rows[2].podium());
        assert!(!rows[3].podium());
        assert_eq!(rows[0].css_class(), "leaderboard-entry rank-1");
        assert_eq!(rows[4].css_class(), "leaderboard-entry");
    }

    #[test]
    fn test_empty_and_failure_look_the_same() {
        assert_eq!(LeaderboardView::from_records(&[]), LeaderboardView::Empty);
        let failed = LeaderboardView::from_result(Err(CloudError::Network("offline".into())));
        assert_eq!(failed.message(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn test_personal_best_line() {
        let line = personal_best_line(Ok(Some(record("", 42))));
        assert_eq!(line.as_deref(), Some("Score: 42 | HARD | Neet"));
        assert_eq!(personal_best_line(Ok(None)), None);
        assert_eq!(personal_best_line(Err(CloudError::NotAuthenticated)), None);
    }

    #[test]
    fn test_login_success_stays_visible_before_closing() {
        let outcome = AuthOutcome::new(AuthForm::Login, Ok("Logged in successfully!".into()));
        assert!(outcome.success);
        assert_eq!(outcome.message, "Logged in successfully!");
        assert_eq!(outcome.close_after_ms, Some(AUTH_CLOSE_DELAY_MS));
        assert!(AUTH_CLOSE_DELAY_MS > 0);

        let signed_up = AuthOutcome::new(AuthForm::SignUp, Ok("Check your email".into()));
        assert!(signed_up.success);
        assert_eq!(signed_up.close_after_ms, None);
    }

    #[test]
    fn test_failed_request_keeps_modal_open() {
        let outcome = AuthOutcome::new(
            AuthForm::Login,
            Err(CloudError::InvalidCredentials("Bad password".into())),
        );
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Bad password");
        assert_eq!(outcome.close_after_ms, None);
    }

    #[test]
    fn test_busy_button_labels() {
        assert_eq!(AuthForm::Login.button_label(true), "Logging in...");
        assert_eq!(AuthForm::Login.button_label(false), "Login");
        assert_eq!(AuthForm::SignUp.button_label(true), "Signing up...");
        assert_eq!(AuthForm::SignUp.button_label(false), "Sign Up");
        assert_eq!(AuthForm::SignUp.button_id(), "signupBtn");
    }
}
