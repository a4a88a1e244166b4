use chrono::Utc;
use muletrack_types::{MuletrackError, MuletrackResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::Session;
use crate::config::SESSION_FILE_NAME;

/// File-backed persistence for the single active [`Session`].
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> MuletrackResult<Option<Session>> {
        if !self.path.exists() {
            debug!("No session file at {:?}", self.path);
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| MuletrackError::Session(format!("Failed to read session: {}", e)))?;

        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| MuletrackError::Session(format!("Corrupt session file {:?}: {}", self.path, e)))
    }

    /// Previous session to carry over into a reconnect. An unreadable file
    /// is reported and treated as absent.
    pub fn load_previous(&self) -> Option<Session> {
        match self.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("Ignoring previous session: {}", e);
                None
            }
        }
    }

    /// Loads the session without checking token expiry.
    pub fn require(&self) -> MuletrackResult<Session> {
        self.load()?.ok_or_else(|| {
            MuletrackError::Session("Not connected. Run 'muletrack connect' first".into())
        })
    }

    pub fn require_usable(&self) -> MuletrackResult<Session> {
        let session = self.require()?;
        session.ensure_usable(Utc::now())?;
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> MuletrackResult<()> {
        let contents = toml::to_string_pretty(session)
            .map_err(|e| MuletrackError::Session(format!("Failed to serialize session: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        write_private(&self.path, contents.as_bytes())?;
        info!("Session saved to {:?}", self.path);
        Ok(())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TokenKind;
    use chrono::Duration;
    use muletrack_types::ControlPlane;

    fn session() -> Session {
        Session {
            control_plane: ControlPlane::Us,
            client_id: "client".into(),
            client_secret: "secret".into(),
            access_token: "token".into(),
            admin_access_token: None,
            token_kind: TokenKind::Connected,
            expires_at: Utc::now() + Duration::hours(1),
            datasource_id: 1234,
            org_id: Some("org".into()),
            env_id: Some("env".into()),
        }
    }

    #[test]
    fn test_missing_session_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_data_dir(dir.path());
        assert!(store.load().unwrap().is_none());
        assert!(matches!(store.require_usable(), Err(MuletrackError::Session(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_data_dir(&dir.path().join("data"));
        store.save(&session()).unwrap();

        let loaded = store.require_usable().unwrap();
        assert_eq!(loaded.datasource_id, 1234);
        assert_eq!(loaded.scope().unwrap().org_id, "org");
        assert_eq!(loaded.token(), "token");
    }

    #[test]
    fn test_corrupt_session_is_not_carried_over() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_data_dir(dir.path());
        std::fs::write(store.path(), "access_token = [").unwrap();

        assert!(matches!(store.load(), Err(MuletrackError::Session(_))));
        assert!(store.load_previous().is_none());

        store.save(&session()).unwrap();
        assert_eq!(store.load_previous().unwrap().client_id, "client");
    }

    #[test]
    fn test_expired_session_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_data_dir(dir.path());
        let mut expired = session();
        expired.expires_at = Utc::now() - Duration::minutes(1);
        store.save(&expired).unwrap();

        assert!(store.require().is_ok());
        assert!(store.require_usable().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_data_dir(dir.path());
        store.save(&session()).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
