//! Durable local credential mirror.
//!
//! A directory holding two well-known entries:
//!
//! - `token` - the bearer token as a plain string
//! - `userData` - the JSON-encoded [`StoredCredential`]
//!
//! The mirror is single-slot: one credential record at a time, last write
//! wins. It is the fallback source of truth when the backend is
//! unreachable - login compares against it before touching the network and
//! the duplicate-check probes consult it when the remote probe fails.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::models::StoredCredential;

/// File name for the persisted bearer token.
const TOKEN_FILE: &str = "token";

/// File name for the persisted credential record.
const USER_DATA_FILE: &str = "userData";

/// Errors from the mirror's storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Filesystem operation failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded for storage.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handle to the mirror directory.
///
/// Reads are forgiving by design: a missing file is simply an absent value,
/// and a file that no longer parses is logged and treated as absent rather
/// than poisoning every later login attempt.
#[derive(Debug, Clone)]
pub struct CredentialMirror {
    dir: PathBuf,
}

impl CredentialMirror {
    /// Open (creating if needed) the mirror directory.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, MirrorError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory this mirror lives in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist the credential record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` if encoding or writing fails.
    pub fn save_credential(&self, credential: &StoredCredential) -> Result<(), MirrorError> {
        let json = serde_json::to_string(credential)?;
        fs::write(self.dir.join(USER_DATA_FILE), json)?;
        Ok(())
    }

    /// Read the stored credential record, if any.
    ///
    /// Missing and malformed records both read as `None`.
    #[must_use]
    pub fn load_credential(&self) -> Option<StoredCredential> {
        let raw = self.read_file(USER_DATA_FILE)?;
        match serde_json::from_str(&raw) {
            Ok(credential) => Some(credential),
            Err(error) => {
                warn!(%error, "stored credential is malformed; treating as absent");
                None
            }
        }
    }

    /// Persist the bearer token.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Io` if the write fails.
    pub fn save_token(&self, token: &str) -> Result<(), MirrorError> {
        fs::write(self.dir.join(TOKEN_FILE), token)?;
        Ok(())
    }

    /// Read the persisted bearer token, if any.
    #[must_use]
    pub fn load_token(&self) -> Option<String> {
        self.read_file(TOKEN_FILE)
            .map(|raw| raw.trim().to_owned())
            .filter(|token| !token.is_empty())
    }

    /// Remove the persisted bearer token. Removing an already-absent token
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Io` on any other filesystem failure.
    pub fn clear_token(&self) -> Result<(), MirrorError> {
        self.remove_file(TOKEN_FILE)
    }

    /// Remove everything: token and credential record.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Io` on filesystem failure.
    pub fn clear(&self) -> Result<(), MirrorError> {
        self.remove_file(TOKEN_FILE)?;
        self.remove_file(USER_DATA_FILE)
    }

    fn read_file(&self, name: &str) -> Option<String> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(contents) => Some(contents),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                warn!(%error, file = name, "failed to read mirror file");
                None
            }
        }
    }

    fn remove_file(&self, name: &str) -> Result<(), MirrorError> {
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
