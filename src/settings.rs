use std::path::PathBuf;

use crate::color::ChartPalette;
use crate::store::FileStore;

/// User id used when none is supplied on the command line or environment.
pub const DEFAULT_USER_ID: &str = "local";

/// Runtime settings, resolved from CLI flags and environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Opaque identifier the configuration is stored under.
    pub user_id: String,
    /// Root directory of the file-backed configuration store.
    pub store_dir: PathBuf,
    /// Generate an evenly spaced palette of this many colours instead of
    /// the default three.
    pub palette_size: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            user_id: DEFAULT_USER_ID.to_string(),
            store_dir: Self::default_store_dir(),
            palette_size: None,
        }
    }
}

impl Settings {
    /// `<data dir>/rowboard`, or `./.rowboard` when the platform has no data dir.
    pub fn default_store_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("rowboard"))
            .unwrap_or_else(|| PathBuf::from(".rowboard"))
    }

    pub fn palette(&self) -> ChartPalette {
        match self.palette_size {
            Some(n) => ChartPalette::evenly_spaced(n),
            None => ChartPalette::default(),
        }
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.store_dir)
    }
}
