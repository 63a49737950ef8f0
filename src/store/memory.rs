use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use log::debug;

use super::wire::{Configuration, MessageResponse, SubmitRequest, UserConfiguration};
use super::{ConfigStore, SAVED_MESSAGE, SUBMITTED_MESSAGE};
use crate::error::StoreError;

/// In-process store. Configurations are kept serialized, exactly as they
/// would travel over the wire.
#[derive(Debug)]
pub struct MemoryStore {
    configs: RwLock<HashMap<String, String>>,
    submissions: Mutex<Vec<String>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            configs: RwLock::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the service going down (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Every submitted payload so far, oldest first.
    pub fn submissions(&self) -> Vec<String> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".into()))
        }
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("store lock poisoned".into())
}

impl ConfigStore for MemoryStore {
    fn save(&self, config: &UserConfiguration) -> Result<MessageResponse, StoreError> {
        self.check_available()?;
        let payload = serde_json::to_string(&config.configuration)?;
        self.configs
            .write()
            .map_err(poisoned)?
            .insert(config.user_id.clone(), payload);
        debug!("memory store: saved configuration for {}", config.user_id);
        Ok(MessageResponse::new(SAVED_MESSAGE))
    }

    fn load(&self, user_id: &str) -> Result<Option<Configuration>, StoreError> {
        self.check_available()?;
        let configs = self.configs.read().map_err(poisoned)?;
        match configs.get(user_id) {
            Some(payload) => Ok(Some(serde_json::from_str(payload)?)),
            None => Ok(None),
        }
    }

    fn submit(&self, request: &SubmitRequest<'_>) -> Result<MessageResponse, StoreError> {
        self.check_available()?;
        let payload = serde_json::to_string(request)?;
        self.submissions.lock().map_err(poisoned)?.push(payload);
        Ok(MessageResponse::new(SUBMITTED_MESSAGE))
    }
}
