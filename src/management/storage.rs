use std::{fmt, io, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;

#[derive(Debug)]
pub enum StorageError {
    IoError(io::Error),
    SerdeError(serde_json::Error),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::IoError(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerdeError(err)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "io error: {}", e),
            StorageError::SerdeError(e) => write!(f, "serialization error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_playlist: Option<String>,
}

/// Per-user settings kept between runs.
pub struct UserStorage {
    path: PathBuf,
    data: UserData,
}

impl UserStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: UserData::default(),
        }
    }

    /// Storage of `user_id` in the data directory, empty when none was
    /// persisted yet.
    pub async fn load(user_id: &str) -> Result<Self, StorageError> {
        Self::load_from(Self::storage_path(user_id)).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, StorageError> {
        let data = match async_fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => UserData::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub async fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.data)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn current_playlist(&self) -> Option<&str> {
        self.data.current_playlist.as_deref()
    }

    pub fn set_current_playlist(&mut self, playlist_id: &str) {
        self.data.current_playlist = Some(playlist_id.to_string());
    }

    fn storage_path(user_id: &str) -> PathBuf {
        config::data_dir()
            .join("state")
            .join(format!("user_{}.json", user_id))
    }
}
