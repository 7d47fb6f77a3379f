// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-disk credential storage.
//!
//! The token file holds a single JSON line with the access and refresh
//! tokens. It is the only state carried between invocations.

use crate::config::Config;
use crate::error::AppError;
use crate::models::Credential;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Flat-file credential store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured `--tokenfile`, which must be set.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(config.require_token_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential.
    ///
    /// Only the first line is parsed. Both fields must be present; there is
    /// no partial recovery.
    pub fn load(&self) -> Result<Credential, AppError> {
        tracing::debug!(path = %self.path.display(), "Reading token file");

        let contents = fs::read_to_string(&self.path).map_err(|e| AppError::io(&self.path, e))?;
        let line = contents.lines().next().unwrap_or_default();

        serde_json::from_str(line).map_err(|e| {
            AppError::Parse(format!(
                "token file {} is not a valid credential record: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Replace the stored credential.
    ///
    /// Writes a temp file next to the target, syncs it, then renames it
    /// over the target so a crash never leaves a truncated token file.
    pub fn save(&self, credential: &Credential) -> Result<(), AppError> {
        let json = serde_json::to_string(credential)
            .map_err(|e| AppError::Parse(format!("failed to encode credential: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(AppError::io(&temp_path, e));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(AppError::io(&self.path, e));
        }

        tracing::info!(path = %self.path.display(), "Saved access and refresh token");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tokens".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

/// Create `path` owner-only, write `bytes`, fsync.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
