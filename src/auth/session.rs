use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::AuthError;

const TOKEN_PREFIX: &str = "token_";
const SUFFIX_LEN: usize = 9;

/// Server-side session store keyed by opaque token.
///
/// Tokens are capability strings of the form
/// `token_{userId}_{epochMillis}_{randomSuffix}`; the store is the single
/// authority on their validity. Expired entries are purged whenever a new
/// session is issued.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct Session {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Store with the 24-hour lifetime login sessions use.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::hours(24))
    }

    /// Issue a fresh token for a user and register the session.
    pub fn issue(&self, user_id: Uuid) -> String {
        let token = format!(
            "{}{}_{}_{}",
            TOKEN_PREFIX,
            user_id,
            Utc::now().timestamp_millis(),
            random_suffix()
        );

        let mut sessions = self.sessions.lock().unwrap();
        let now = Utc::now();
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            token.clone(),
            Session {
                user_id,
                expires_at: now + self.ttl,
            },
        );

        token
    }

    /// Look up a token, returning the owning user id if it is still live.
    pub fn validate(&self, token: &str) -> Option<Uuid> {
        let sessions = self.sessions.lock().unwrap();
        sessions
            .get(token)
            .filter(|session| session.expires_at > Utc::now())
            .map(|session| session.user_id)
    }

    /// Drop a session. Returns whether the token was known.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.lock().unwrap().remove(token).is_some()
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

/// Parse the user id embedded in a token, without consulting the store.
pub fn user_id_from_token(token: &str) -> Option<Uuid> {
    let rest = token.strip_prefix(TOKEN_PREFIX)?;
    // uuids contain hyphens but never underscores
    let (user_id, _) = rest.split_once('_')?;
    Uuid::parse_str(user_id).ok()
}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeaderFormat)?;
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeaderFormat);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let store = SessionStore::with_default_ttl();
        let user_id = Uuid::new_v4();

        let token = store.issue(user_id);

        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(store.validate(&token), Some(user_id));
        assert_eq!(store.validate("token_unknown"), None);
    }

    #[test]
    fn test_token_embeds_user_id() {
        let store = SessionStore::with_default_ttl();
        let user_id = Uuid::new_v4();

        let token = store.issue(user_id);

        assert_eq!(user_id_from_token(&token), Some(user_id));
        assert_eq!(user_id_from_token("not-a-token"), None);
    }

    #[test]
    fn test_expired_sessions_are_rejected() {
        let store = SessionStore::new(Duration::zero());
        let token = store.issue(Uuid::new_v4());

        assert_eq!(store.validate(&token), None);
    }

    #[test]
    fn test_revoke() {
        let store = SessionStore::with_default_ttl();
        let user_id = Uuid::new_v4();
        let token = store.issue(user_id);

        assert!(store.revoke(&token));
        assert_eq!(store.validate(&token), None);
        assert!(!store.revoke(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::with_default_ttl();
        let user_id = Uuid::new_v4();

        assert_ne!(store.issue(user_id), store.issue(user_id));
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            extract_bearer_token("Bearer test_token").unwrap(),
            "test_token"
        );

        assert!(extract_bearer_token("Invalid header").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }
}
