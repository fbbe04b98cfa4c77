// Bearer-token sessions
//
// Login and registration mint a random opaque token bound to a user id and
// role. Tokens live in memory only and expire after an idle period; every
// successful lookup refreshes the idle timer.
//
// Raw tokens are never logged. Use `fingerprint()` for anything that reaches
// a log line.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::store::{Id, UserType};

/// Default idle lifetime of a token (12 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Who a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Id,
    pub role: UserType,
}

#[derive(Debug)]
struct Session {
    principal: Principal,
    last_seen: Instant,
}

/// Why a token was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    Unknown,
    Expired,
}

/// In-memory token table
#[derive(Debug)]
pub struct SessionManager {
    sessions: HashMap<String, Session>,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Issue a fresh token for a user
    pub fn issue(&mut self, user_id: Id, role: UserType) -> String {
        self.issue_at(user_id, role, Instant::now())
    }

    fn issue_at(&mut self, user_id: Id, role: UserType, now: Instant) -> String {
        self.purge_expired(now);

        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                principal: Principal { user_id, role },
                last_seen: now,
            },
        );

        tracing::debug!(
            user_id,
            role = %role,
            token = %fingerprint(&token),
            "Session issued"
        );
        token
    }

    /// Resolve a token and refresh its idle timer
    pub fn resolve(&mut self, token: &str) -> Result<Principal, SessionError> {
        self.resolve_at(token, Instant::now())
    }

    fn resolve_at(&mut self, token: &str, now: Instant) -> Result<Principal, SessionError> {
        let session = self.sessions.get_mut(token).ok_or(SessionError::Unknown)?;

        if now.duration_since(session.last_seen) > self.ttl {
            self.sessions.remove(token);
            tracing::debug!(token = %fingerprint(token), "Session expired");
            return Err(SessionError::Expired);
        }

        session.last_seen = now;
        Ok(session.principal)
    }

    /// Drop a token. Returns false if it was not live.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Number of tokens still inside their idle window
    pub fn len(&self) -> usize {
        self.live_at(Instant::now())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_at(&self, now: Instant) -> usize {
        self.sessions
            .values()
            .filter(|s| now.duration_since(s.last_seen) <= self.ttl)
            .count()
    }

    fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.sessions
            .retain(|_, s| now.duration_since(s.last_seen) <= ttl);
    }
}

/// Short SHA-256 digest of a token, safe to log
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let hash = hasher.finalize();
    format!("{:x}", hash)[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_resolve() {
        let mut sessions = SessionManager::default();
        let token = sessions.issue(4, UserType::Ong);

        assert_eq!(token.len(), 32);
        let principal = sessions.resolve(&token).unwrap();
        assert_eq!(principal.user_id, 4);
        assert_eq!(principal.role, UserType::Ong);
    }

    #[test]
    fn test_unknown_token() {
        let mut sessions = SessionManager::default();
        assert_eq!(sessions.resolve("nope"), Err(SessionError::Unknown));
    }

    #[test]
    fn test_idle_expiry_and_refresh() {
        let mut sessions = SessionManager::new(Duration::from_secs(60));
        let start = Instant::now();
        let token = sessions.issue_at(1, UserType::Client, start);

        // Touch at 50s keeps it alive until 110s
        assert!(sessions.resolve_at(&token, start + Duration::from_secs(50)).is_ok());
        assert!(sessions.resolve_at(&token, start + Duration::from_secs(100)).is_ok());
        assert_eq!(
            sessions.resolve_at(&token, start + Duration::from_secs(200)),
            Err(SessionError::Expired)
        );
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_expired_tokens_are_not_counted() {
        let mut sessions = SessionManager::new(Duration::from_secs(60));
        let start = Instant::now();
        sessions.issue_at(1, UserType::Client, start);
        sessions.issue_at(2, UserType::Ong, start + Duration::from_secs(30));

        assert_eq!(sessions.live_at(start + Duration::from_secs(45)), 2);
        assert_eq!(sessions.live_at(start + Duration::from_secs(80)), 1);
        assert_eq!(sessions.live_at(start + Duration::from_secs(200)), 0);
    }

    #[test]
    fn test_revoke() {
        let mut sessions = SessionManager::default();
        let token = sessions.issue(1, UserType::Client);
        assert!(sessions.revoke(&token));
        assert!(!sessions.revoke(&token));
        assert_eq!(sessions.resolve(&token), Err(SessionError::Unknown));
    }

    #[test]
    fn test_fingerprint_hides_token() {
        let fp = fingerprint("abc");
        assert_eq!(fp.len(), 16);
        assert_ne!(fp, "abc");
        assert_eq!(fp, fingerprint("abc"));
    }
}
