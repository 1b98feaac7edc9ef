//! Signed-in player state
//!
//! `SessionHandle` is shared between the game core (read-only queries) and the
//! page glue that signs players in and out.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::records::{CloudError, NewScore, RoundReport};
use crate::persistence::KeyValueStore;

/// Name shown when nobody is signed in
pub const GUEST_NAME: &str = "Guest";

/// Tokens returned by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Row from the `profiles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub auth: Option<AuthSession>,
    pub profile: Option<Profile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Access token and row for a finished round. Scores are only submitted
    /// once the profile row is known.
    pub fn score_row(&self, report: &RoundReport) -> Result<(&str, NewScore), CloudError> {
        let (Some(auth), Some(profile)) = (&self.auth, &self.profile) else {
            return Err(CloudError::NotAuthenticated);
        };
        let row = NewScore::new(&auth.user_id, &profile.username, report);
        Ok((auth.access_token.as_str(), row))
    }

    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.username.as_str())
            .unwrap_or(GUEST_NAME)
    }
}

type Listener = Box<dyn Fn(&Session)>;

/// Shared, observable session
#[derive(Clone, Default)]
pub struct SessionHandle {
    session: Rc<RefCell<Session>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl SessionHandle {
    pub const STORAGE_KEY: &'static str = "barkour_session";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    pub fn display_name(&self) -> String {
        self.session.borrow().display_name().to_string()
    }

    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Called with the new session after every change
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn sign_in(&self, auth: AuthSession) {
        log::info!("Signed in as {}", auth.user_id);
        self.replace(Session {
            auth: Some(auth),
            profile: None,
        });
    }

    pub fn set_profile(&self, profile: Profile) {
        let mut next = self.snapshot();
        next.profile = Some(profile);
        self.replace(next);
    }

    pub fn sign_out(&self) {
        if self.is_authenticated() {
            log::info!("Signed out");
        }
        self.replace(Session::default());
    }

    fn replace(&self, next: Session) {
        *self.session.borrow_mut() = next;
        let snapshot = self.snapshot();
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        let session = self.snapshot();
        if !session.is_authenticated() {
            store.remove(Self::STORAGE_KEY);
            return;
        }
        match serde_json::to_string(&session) {
            Ok(json) => store.set(Self::STORAGE_KEY, &json),
            Err(e) => log::warn!("Failed to serialize session: {e}"),
        }
    }

    /// Restore a previously saved session. Returns whether one was found.
    pub fn restore(&self, store: &dyn KeyValueStore) -> bool {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            return false;
        };
        match serde_json::from_str::<Session>(&json) {
            Ok(session) if session.is_authenticated() => {
                log::info!("Restored session for {}", session.display_name());
                self.replace(session);
                true
            }
            Ok(_) => false,
            Err(e) => {
                log::warn!("Discarding unreadable session: {e}");
                store.remove(Self::STORAGE_KEY);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::tuning::{CharacterKind, Difficulty};
    use std::cell::Cell;

    fn auth() -> AuthSession {
        AuthSession {
            access_token: "token".into(),
            refresh_token: None,
            user_id: "uid-1".into(),
            email: Some("a@b.c".into()),
        }
    }

    #[test]
    fn test_guest_by_default() {
        let handle = SessionHandle::new();
        assert!(!handle.is_authenticated());
        assert_eq!(handle.display_name(), "Guest");
    }

    #[test]
    fn test_profile_sets_display_name() {
        let handle = SessionHandle::new();
        handle.sign_in(auth());
        assert!(handle.is_authenticated());
        assert_eq!(handle.display_name(), "Guest");

        handle.set_profile(Profile {
            id: "uid-1".into(),
            username: "rex".into(),
        });
        assert_eq!(handle.display_name(), "rex");

        handle.sign_out();
        assert!(!handle.is_authenticated());
    }

    #[test]
    fn test_score_row_needs_a_profile() {
        let report = RoundReport {
            score: 321,
            difficulty: Difficulty::Hard,
            character: CharacterKind::Neet,
        };
        let handle = SessionHandle::new();
        assert_eq!(
            handle.snapshot().score_row(&report).unwrap_err(),
            CloudError::NotAuthenticated
        );

        handle.sign_in(auth());
        assert_eq!(
            handle.snapshot().score_row(&report).unwrap_err(),
            CloudError::NotAuthenticated
        );

        handle.set_profile(Profile {
            id: "uid-1".into(),
            username: "rex".into(),
        });
        let session = handle.snapshot();
        let (token, row) = session.score_row(&report).unwrap();
        assert_eq!(token, "token");
        assert_eq!(row, NewScore::new("uid-1", "rex", &report));
        assert_eq!(row.difficulty, "HARD");
        assert_eq!(row.character, "Neet");
    }

    #[test]
    fn test_listeners_fire_on_change() {
        let handle = SessionHandle::new();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        handle.subscribe(move |_| seen.set(seen.get() + 1));

        handle.sign_in(auth());
        handle.sign_out();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_save_and_restore() {
        let store = MemoryStore::new();
        let handle = SessionHandle::new();
        handle.sign_in(auth());
        handle.save(&store);

        let restored = SessionHandle::new();
        assert!(restored.restore(&store));
        assert_eq!(restored.snapshot().auth, Some(auth()));

        handle.sign_out();
        handle.save(&store);
        assert!(!SessionHandle::new().restore(&store));
    }
}
