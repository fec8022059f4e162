use std::{fmt, io, path::PathBuf};

use crate::{config, types::Session};

#[derive(Debug)]
pub enum SessionError {
    IoError(io::Error),
    SerdeError(serde_json::Error),
}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        SessionError::IoError(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::SerdeError(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::IoError(e) if e.kind() == io::ErrorKind::NotFound => {
                write!(f, "no session stored, run `qobuzcli login` first")
            }
            SessionError::IoError(e) => write!(f, "cannot access session: {}", e),
            SessionError::SerdeError(e) => write!(f, "broken session file: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

/// Persisted login session (user id and auth token).
pub struct SessionManager {
    session: Session,
    path: PathBuf,
}

impl SessionManager {
    pub fn new(session: Session) -> Self {
        SessionManager {
            session,
            path: Self::session_path(),
        }
    }

    /// Same session stored at `path` instead of the data directory.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub async fn load() -> Result<Self, SessionError> {
        Self::load_from(Self::session_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, SessionError> {
        let content = async_fs::read_to_string(&path).await?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Self { session, path })
    }

    pub async fn persist(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.session)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn current_session(&self) -> &Session {
        &self.session
    }

    pub fn user_id(&self) -> &str {
        &self.session.user_id
    }

    pub fn user_auth_token(&self) -> &str {
        &self.session.user_auth_token
    }

    fn session_path() -> PathBuf {
        config::data_dir().join("cache").join("session.json")
    }
}
