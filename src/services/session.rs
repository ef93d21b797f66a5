//! Session storage.
//!
//! Holds zero-or-one [`Identity`]. Its presence is the sole input to route
//! gating. The file-backed store survives a process restart and is readable
//! synchronously; the in-memory store backs tests.

use crate::models::Identity;
use crate::services::error::SessionError;
use std::fs;
use std::path::PathBuf;

pub trait SessionStore: Send {
    /// Synchronous, side-effect-free read of the current identity.
    fn current(&self) -> Option<Identity>;

    /// Replace the current identity and persist it.
    fn set(&mut self, identity: Identity) -> Result<(), SessionError>;

    /// Remove the identity and any persisted trace. Idempotent.
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Session persisted as a JSON file at a configured path.
pub struct FileSessionStore {
    path: PathBuf,
    cached: Option<Identity>,
}

impl FileSessionStore {
    /// Load the persisted session if one exists. A corrupt file is treated
    /// as no session and logged, not propagated: a stale session file must
    /// never prevent the client from starting.
    pub fn load(path: PathBuf) -> Self {
        let cached = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", path.display(), e);
                None
            }
        };

        Self { path, cached }
    }
}

impl SessionStore for FileSessionStore {
    fn current(&self) -> Option<Identity> {
        self.cached.clone()
    }

    fn set(&mut self, identity: Identity) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string(&identity)?)?;
        self.cached = Some(identity);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.cached = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    current: Option<Identity>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn current(&self) -> Option<Identity> {
        self.current.clone()
    }

    fn set(&mut self, identity: Identity) -> Result<(), SessionError> {
        self.current = Some(identity);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.current = None;
        Ok(())
    }
}
