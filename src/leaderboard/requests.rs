//! Request builders and response parsers for the hosted backend
//!
//! Nothing here touches the network. `CloudClient` sends what these functions
//! build, which keeps URLs, headers and payloads testable natively.

use serde::Deserialize;

use super::records::{CloudError, Credentials, LeaderboardFilter, NewScore, ScoreRecord};
use super::session::{AuthSession, Profile};

/// Rows shown on the global leaderboard
pub const TOP_SCORES_LIMIT: usize = 10;
/// Rows fetched for a player's history
pub const HISTORY_LIMIT: usize = 20;

const LEADERBOARD_COLUMNS: &str = "username,score,difficulty,character,created_at";
const PERSONAL_COLUMNS: &str = "score,difficulty,character,created_at";

/// Backend endpoint and public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub url: String,
    pub anon_key: String,
}

impl CloudConfig {
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// Baked in at compile time; cloud features are off without both values
    pub fn from_env() -> Option<Self> {
        let url = option_env!("BARKOUR_SUPABASE_URL")?;
        let anon_key = option_env!("BARKOUR_SUPABASE_ANON_KEY")?;
        if url.is_empty() || anon_key.is_empty() {
            return None;
        }
        Some(Self::new(url, anon_key))
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.url)
    }

    fn rest_url(&self, table: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/rest/v1/{table}", self.url);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully described HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct CloudRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl CloudRequest {
    fn new(config: &CloudConfig, method: Method, url: String, token: Option<&str>) -> Self {
        let bearer = token.unwrap_or(&config.anon_key);
        Self {
            method,
            url,
            headers: vec![
                ("apikey", config.anon_key.clone()),
                ("Authorization", format!("Bearer {bearer}")),
            ],
            body: None,
        }
    }

    fn json_body(mut self, body: String) -> Self {
        self.headers
            .push(("Content-Type", "application/json".to_string()));
        self.body = Some(body);
        self
    }

    fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub fn sign_up(
    config: &CloudConfig,
    credentials: &Credentials,
) -> Result<CloudRequest, CloudError> {
    credentials.validate_sign_up()?;
    let body = serde_json::json!({
        "email": credentials.email,
        "password": credentials.password,
        "data": { "username": credentials.username },
    });
    Ok(CloudRequest::new(config, Method::Post, config.auth_url("signup"), None)
        .json_body(body.to_string()))
}

pub fn sign_in(
    config: &CloudConfig,
    credentials: &Credentials,
) -> Result<CloudRequest, CloudError> {
    credentials.validate_sign_in()?;
    let body = serde_json::json!({
        "email": credentials.email,
        "password": credentials.password,
    });
    Ok(CloudRequest::new(
        config,
        Method::Post,
        config.auth_url("token?grant_type=password"),
        None,
    )
    .json_body(body.to_string()))
}

pub fn sign_out(config: &CloudConfig, access_token: &str) -> CloudRequest {
    CloudRequest::new(config, Method::Post, config.auth_url("logout"), Some(access_token))
}

pub fn load_profile(config: &CloudConfig, access_token: &str, user_id: &str) -> CloudRequest {
    let url = config.rest_url(
        "profiles",
        &[("select", "*".to_string()), ("id", format!("eq.{user_id}"))],
    );
    CloudRequest::new(config, Method::Get, url, Some(access_token))
}

pub fn insert_score(
    config: &CloudConfig,
    access_token: &str,
    score: &NewScore,
) -> Result<CloudRequest, CloudError> {
    let body = serde_json::to_string(&[score])?;
    Ok(
        CloudRequest::new(config, Method::Post, config.rest_url("scores", &[]), Some(access_token))
            .json_body(body)
            .header("Prefer", "return=representation"),
    )
}

/// Global leaderboard, best first. Readable without signing in.
pub fn top_scores(
    config: &CloudConfig,
    filter: LeaderboardFilter,
    limit: usize,
    access_token: Option<&str>,
) -> CloudRequest {
    let mut query = vec![
        ("select", LEADERBOARD_COLUMNS.to_string()),
        ("order", "score.desc".to_string()),
        ("limit", limit.to_string()),
    ];
    if let Some(difficulty) = filter.difficulty() {
        query.push(("difficulty", format!("eq.{}", difficulty.key())));
    }
    CloudRequest::new(config, Method::Get, config.rest_url("scores", &query), access_token)
}

pub fn personal_best(
    config: &CloudConfig,
    access_token: &str,
    user_id: &str,
    filter: LeaderboardFilter,
) -> CloudRequest {
    let mut query = vec![
        ("select", PERSONAL_COLUMNS.to_string()),
        ("user_id", format!("eq.{user_id}")),
        ("order", "score.desc".to_string()),
        ("limit", "1".to_string()),
    ];
    if let Some(difficulty) = filter.difficulty() {
        query.push(("difficulty", format!("eq.{}", difficulty.key())));
    }
    CloudRequest::new(config, Method::Get, config.rest_url("scores", &query), Some(access_token))
}

/// Most recent rounds first
pub fn score_history(
    config: &CloudConfig,
    access_token: &str,
    user_id: &str,
    limit: usize,
) -> CloudRequest {
    let query = [
        ("select", PERSONAL_COLUMNS.to_string()),
        ("user_id", format!("eq.{user_id}")),
        ("order", "created_at.desc".to_string()),
        ("limit", limit.to_string()),
    ];
    CloudRequest::new(config, Method::Get, config.rest_url("scores", &query), Some(access_token))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Password-grant response body
pub fn parse_auth_response(body: &str) -> Result<AuthSession, CloudError> {
    let token: TokenResponse = serde_json::from_str(body)?;
    Ok(AuthSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        user_id: token.user.id,
        email: token.user.email,
    })
}

/// Profile lookup returns an array with at most one row
pub fn parse_profile(body: &str) -> Result<Option<Profile>, CloudError> {
    let mut rows: Vec<Profile> = serde_json::from_str(body)?;
    Ok(if rows.is_empty() {
        None
    } else {
        Some(rows.swap_remove(0))
    })
}

pub fn parse_records(body: &str) -> Result<Vec<ScoreRecord>, CloudError> {
    Ok(serde_json::from_str(body)?)
}

/// Best human-readable message from an error body
pub fn parse_error(status: u16, body: &str) -> CloudError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string());
    CloudError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;

    fn config() -> CloudConfig {
        CloudConfig::new("https://example.supabase.co/", "anon")
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(config().url, "https://example.supabase.co");
    }

    #[test]
    fn test_sign_in_request() {
        let request = sign_in(&config(), &Credentials::new("a@b.c", "secret", "")).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.url,
            "https://example.supabase.co/auth/v1/token?grant_type=password"
        );
        assert_eq!(request.header_value("apikey"), Some("anon"));
        assert_eq!(request.header_value("authorization"), Some("Bearer anon"));

        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "a@b.c");
    }

    #[test]
    fn test_sign_up_rejects_short_password() {
        let result = sign_up(&config(), &Credentials::new("a@b.c", "123", "rex"));
        assert!(matches!(result, Err(CloudError::InvalidCredentials(_))));
    }

    #[test]
    fn test_sign_up_carries_username() {
        let request = sign_up(&config(), &Credentials::new("a@b.c", "secret", "rex")).unwrap();
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["data"]["username"], "rex");
    }

    #[test]
    fn test_top_scores_query() {
        let all = top_scores(&config(), LeaderboardFilter::All, 10, None);
        assert_eq!(
            all.url,
            "https://example.supabase.co/rest/v1/scores?select=username,score,difficulty,character,created_at&order=score.desc&limit=10"
        );

        let easy = top_scores(&config(), LeaderboardFilter::Only(Difficulty::Easy), 10, None);
        assert!(easy.url.ends_with("&difficulty=eq.EASY"));
        assert_eq!(easy.method, Method::Get);
    }

    #[test]
    fn test_personal_best_uses_user_token() {
        let request = personal_best(&config(), "tok", "uid-1", LeaderboardFilter::All);
        assert!(request.url.contains("user_id=eq.uid-1"));
        assert!(request.url.contains("limit=1"));
        assert_eq!(request.header_value("Authorization"), Some("Bearer tok"));
    }

    #[test]
    fn test_history_ordered_by_date() {
        let request = score_history(&config(), "tok", "uid-1", HISTORY_LIMIT);
        assert!(request.url.contains("order=created_at.desc&limit=20"));
    }

    #[test]
    fn test_insert_score_body_is_array() {
        let row = NewScore {
            user_id: "uid-1".into(),
            username: "rex".into(),
            score: 10,
            difficulty: "EASY".into(),
            character: "Buddy".into(),
        };
        let request = insert_score(&config(), "tok", &row).unwrap();
        assert!(request.body.as_deref().unwrap().starts_with('['));
        assert_eq!(request.header_value("Prefer"), Some("return=representation"));
    }

    #[test]
    fn test_parse_auth_response() {
        let body = r#"{"access_token":"abc","token_type":"bearer","refresh_token":"r","user":{"id":"uid-1","email":"a@b.c"}}"#;
        let session = parse_auth_response(body).unwrap();
        assert_eq!(session.access_token, "abc");
        assert_eq!(session.user_id, "uid-1");
    }

    #[test]
    fn test_parse_profile_empty() {
        assert_eq!(parse_profile("[]").unwrap(), None);
        let profile = parse_profile(r#"[{"id":"u","username":"rex","created_at":"x"}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(profile.username, "rex");
    }

    #[test]
    fn test_parse_error_messages() {
        let err = parse_error(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "server returned 400: Invalid login credentials");

        let err = parse_error(502, "Bad Gateway");
        assert_eq!(
            err,
            CloudError::Http {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }
}
