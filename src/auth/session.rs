use crate::models::Role;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Claims attached to an authenticated request
#[derive(Debug, Clone)]
pub struct AuthClaims {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
struct Session {
    claims: AuthClaims,
    expires_at: DateTime<Utc>,
}

/// Server-side table of opaque bearer tokens.
///
/// Tokens are plain UUIDs; expired entries are dropped lazily on lookup.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a fresh token for the given claims
    pub fn issue(&self, claims: AuthClaims) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                claims,
                expires_at: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its claims, dropping it when expired
    pub fn resolve(&self, token: &str) -> Option<AuthClaims> {
        let expired = match self.sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => {
                return Some(session.claims.clone())
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sessions.remove(token);
        }
        None
    }

    /// Revoke a token
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> AuthClaims {
        AuthClaims {
            user_id: "user-1".to_string(),
            email: "a@b.com".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_issue_and_resolve() {
        let store = SessionStore::new(24);
        let token = store.issue(claims());

        let resolved = store.resolve(&token).unwrap();
        assert_eq!(resolved.user_id, "user-1");

        assert!(store.resolve("not-a-token").is_none());
    }

    #[test]
    fn test_expired_token_is_dropped() {
        let store = SessionStore::new(0);
        let token = store.issue(claims());
        assert!(store.resolve(&token).is_none());
    }

    #[test]
    fn test_revoke() {
        let store = SessionStore::new(24);
        let token = store.issue(claims());
        store.revoke(&token);
        assert!(store.resolve(&token).is_none());
    }
}
