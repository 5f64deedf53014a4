//! Persisted access token.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

const SESSION_FILE: &str = "session.json";
const TOKEN_PARAM: &str = "token";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("could not determine a data directory for the session file")]
    NoDataDir,
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` in the platform data directory.
    pub fn default_location() -> Result<Self, SessionError> {
        let dir = utils::assets::data_dir().ok_or(SessionError::NoDataDir)?;
        Ok(Self::new(dir.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_token(&self) -> Result<Option<String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession = serde_json::from_str(&raw)?;
        debug!(saved_at = %stored.saved_at, "Loaded session");
        Ok(Some(stored.access_token).filter(|token| !token.is_empty()))
    }

    pub fn save_token(&self, access_token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            access_token: access_token.to_string(),
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        info!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Link into the companion application carrying the stored token.
    pub fn companion_link(&self, base: &Url, path: &str) -> Result<Url, SessionError> {
        let token = self.load_token()?.ok_or(SessionError::NotLoggedIn)?;
        let mut url = base.join(path.trim_start_matches('/'))?;
        url.query_pairs_mut().append_pair(TOKEN_PARAM, &token);
        Ok(url)
    }
}
