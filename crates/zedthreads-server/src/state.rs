//! Shared server state.

use crate::config::Config;
use anyhow::{Context, Result};
use zedthreads_core::ThreadStore;

/// State shared by all request handlers.
pub struct AppState {
    pub config: Config,
    pub store: ThreadStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let store = ThreadStore::open(&config.db_path).with_context(|| {
            format!(
                "failed to open threads database at {}",
                config.db_path.display()
            )
        })?;
        Ok(Self { config, store })
    }
}
