//! View configuration.
//!
//! A [`ViewConfig`] selects the mutation policy of a root view and how long
//! the copier waits for a source object that is being written. Configurations
//! are plain serde values and can be stored as CBOR next to the rest of an
//! application's settings; missing keys fall back to the defaults.

use crate::policy::Policy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default wait for a source object's read lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings applied to one root view and everything reachable from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Mutation policy baked into every view type used by the root call.
    pub policy: Policy,
    /// Longest wait for a write-locked source before the copy fails.
    pub lock_timeout: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Strict,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

/// Failure to load or store a [`ViewConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bytes are not a valid CBOR configuration.
    #[error("invalid view configuration: {0}")]
    Cbor(#[from] serde_cbor::Error),
    /// The file could not be read or written.
    #[error("view configuration i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewConfig {
    /// Returns a copy using `policy`.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns a copy waiting at most `timeout` for source read locks.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Serializes the configuration to CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Deserializes a configuration from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    /// Saves the configuration to a file.
    ///
    /// Uses CBOR format.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_cbor()?)?;
        Ok(())
    }

    /// Loads a configuration from a file.
    ///
    /// Uses CBOR format.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Self::from_cbor(&bytes)
    }
}
