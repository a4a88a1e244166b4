mod store;

pub use store::SessionStore;

use chrono::{DateTime, Utc};
use muletrack_types::{ControlPlane, MuletrackError, MuletrackResult, Scope};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[default]
    Connected,
    Admin,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Connected => write!(f, "connected app"),
            TokenKind::Admin => write!(f, "admin"),
        }
    }
}

/// An authenticated platform session.
///
/// Created by `connect`, persisted between invocations, and passed by
/// reference to every collaborator that talks to the platform.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    pub control_plane: ControlPlane,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_access_token: Option<String>,
    #[serde(default)]
    pub token_kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    pub datasource_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_id: Option<String>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Admin tokens are pasted in by hand and carry no known expiry.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        match self.token_kind {
            TokenKind::Admin => self.admin_access_token.is_some(),
            TokenKind::Connected => !self.access_token.is_empty() && !self.is_expired(now),
        }
    }

    pub fn ensure_usable(&self, now: DateTime<Utc>) -> MuletrackResult<()> {
        if self.is_usable(now) {
            return Ok(());
        }
        match self.token_kind {
            TokenKind::Admin => Err(MuletrackError::Session(
                "Admin token missing; pass --admin-token again or run 'muletrack connect'".into(),
            )),
            TokenKind::Connected => Err(MuletrackError::Session(format!(
                "Access token expired at {}; run 'muletrack connect'",
                self.expires_at.to_rfc3339()
            ))),
        }
    }

    pub fn token(&self) -> &str {
        match (self.token_kind, self.admin_access_token.as_deref()) {
            (TokenKind::Admin, Some(admin)) => admin,
            _ => &self.access_token,
        }
    }

    pub fn scope(&self) -> Option<Scope> {
        match (&self.org_id, &self.env_id) {
            (Some(org), Some(env)) => Some(Scope::new(org.clone(), env.clone())),
            _ => None,
        }
    }

    pub fn use_admin_token(&mut self, token: impl Into<String>) {
        self.admin_access_token = Some(token.into());
        self.token_kind = TokenKind::Admin;
    }

    pub fn select_org(&mut self, org_id: impl Into<String>) {
        let org_id = org_id.into();
        if self.org_id.as_deref() != Some(org_id.as_str()) {
            self.env_id = None;
        }
        self.org_id = Some(org_id);
    }

    pub fn select_env(&mut self, env_id: impl Into<String>) {
        self.env_id = Some(env_id.into());
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("control_plane", &self.control_plane)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("admin_access_token", &self.admin_access_token.as_ref().map(|_| "<redacted>"))
            .field("token_kind", &self.token_kind)
            .field("expires_at", &self.expires_at)
            .field("datasource_id", &self.datasource_id)
            .field("org_id", &self.org_id)
            .field("env_id", &self.env_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_session(expires_in: Duration) -> Session {
        Session {
            control_plane: ControlPlane::Eu,
            client_id: "client".into(),
            client_secret: "secret".into(),
            access_token: "connected-token".into(),
            admin_access_token: None,
            token_kind: TokenKind::Connected,
            expires_at: Utc::now() + expires_in,
            datasource_id: 88,
            org_id: None,
            env_id: None,
        }
    }

    #[test]
    fn test_expired_session_is_unusable() {
        let session = sample_session(Duration::seconds(-1));
        assert!(!session.is_usable(Utc::now()));
        assert!(matches!(
            session.ensure_usable(Utc::now()),
            Err(MuletrackError::Session(_))
        ));
    }

    #[test]
    fn test_fresh_session_is_usable() {
        let session = sample_session(Duration::minutes(30));
        assert!(session.ensure_usable(Utc::now()).is_ok());
        assert_eq!(session.token(), "connected-token");
    }

    #[test]
    fn test_admin_token_skips_expiry() {
        let mut session = sample_session(Duration::hours(-2));
        session.use_admin_token("admin-token");
        assert!(session.is_usable(Utc::now()));
        assert_eq!(session.token(), "admin-token");
    }

    #[test]
    fn test_scope_requires_both_ids() {
        let mut session = sample_session(Duration::minutes(5));
        assert!(session.scope().is_none());

        session.select_org("org-1");
        assert!(session.scope().is_none());

        session.select_env("env-1");
        assert_eq!(session.scope(), Some(Scope::new("org-1", "env-1")));
    }

    #[test]
    fn test_switching_org_clears_env() {
        let mut session = sample_session(Duration::minutes(5));
        session.select_org("org-1");
        session.select_env("env-1");

        session.select_org("org-1");
        assert_eq!(session.env_id.as_deref(), Some("env-1"));

        session.select_org("org-2");
        assert!(session.env_id.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut session = sample_session(Duration::minutes(5));
        session.use_admin_token("admin-token");
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("connected-token"));
        assert!(!rendered.contains("admin-token"));
    }
}
