//! Session provider boundary.
//!
//! The persistence bridge consults the provider before every remote
//! write and skips the write (cache-only) when no session exists.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;
}

/// Fixed-session provider, for tests and single-user embeddings.
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            session: Some(Session {
                user_id: user_id.to_string(),
                access_token: format!("token-{user_id}"),
            }),
        }
    }

    pub fn anonymous() -> Self {
        Self { session: None }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current_session(&self) -> Option<Session> {
        self.session.clone()
    }
}
