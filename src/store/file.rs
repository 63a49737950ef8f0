use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use tempfile::NamedTempFile;

use super::wire::{Configuration, MessageResponse, SubmitRequest, UserConfiguration};
use super::{ConfigStore, SAVED_MESSAGE, SUBMITTED_MESSAGE};
use crate::error::StoreError;

const CONFIG_DIR: &str = "configurations";
const SUBMISSION_FILE: &str = "submitted_data.json";

// ---------------------------------------------------------------------------
// Directory-backed store
// ---------------------------------------------------------------------------

/// Stores one JSON document per user under `<root>/configurations/`.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so a reader sees either the old or the new configuration.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document holding `user_id`'s configuration.
    pub fn config_path(&self, user_id: &str) -> PathBuf {
        self.root
            .join(CONFIG_DIR)
            .join(format!("{}.json", encode_key(user_id)))
    }

    pub fn submission_path(&self) -> PathBuf {
        self.root.join(SUBMISSION_FILE)
    }

    fn write_atomic<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, value)?;
        tmp.write_all(b"\n")?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn save(&self, config: &UserConfiguration) -> Result<MessageResponse, StoreError> {
        let path = self.config_path(&config.user_id);
        self.write_atomic(&path, &config.configuration)?;
        info!("saved configuration for {} to {}", config.user_id, path.display());
        Ok(MessageResponse::new(SAVED_MESSAGE))
    }

    fn load(&self, user_id: &str) -> Result<Option<Configuration>, StoreError> {
        let path = self.config_path(user_id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no configuration at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn submit(&self, request: &SubmitRequest<'_>) -> Result<MessageResponse, StoreError> {
        let path = self.submission_path();
        self.write_atomic(&path, request)?;
        info!("submitted filtered data to {}", path.display());
        Ok(MessageResponse::new(SUBMITTED_MESSAGE))
    }
}

/// Make a user id safe to use as a file name: ASCII alphanumerics, `-` and
/// `_` pass through, every other byte becomes `%XX`.
fn encode_key(user_id: &str) -> String {
    let mut out = String::with_capacity(user_id.len());
    for b in user_id.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    if out.is_empty() {
        out.push('%');
    }
    out
}
