//! Configuration persistence.
//!
//! A [`ConfigStore`] is an opaque key/value service keyed by user id with
//! last-write-wins semantics. Saves replace the whole configuration and
//! loads read it whole; there is never a partial merge.

pub mod file;
pub mod memory;
pub mod wire;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use wire::{Configuration, MessageResponse, SubmitRequest, UserConfiguration};

use crate::error::StoreError;

pub trait ConfigStore {
    /// Overwrite the configuration stored for `config.user_id`.
    fn save(&self, config: &UserConfiguration) -> Result<MessageResponse, StoreError>;

    /// Read a user's configuration. `Ok(None)` means nothing has been saved yet.
    fn load(&self, user_id: &str) -> Result<Option<Configuration>, StoreError>;

    /// Hand off the currently filtered rows.
    fn submit(&self, request: &SubmitRequest<'_>) -> Result<MessageResponse, StoreError>;
}

pub(crate) const SAVED_MESSAGE: &str = "Configuration saved successfully";
pub(crate) const SUBMITTED_MESSAGE: &str = "Data submitted successfully";
