//! agency-site: blog backend and client-side blog state for the 404.js
//! agency website
//!
//! The crate has three layers: a content store holding blog posts, an
//! axum REST API over that store, and a client state container that
//! caches, filters and mutates posts through the API.

pub mod client;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use store::{ContentStore, JsonFileStore, MemoryStore};

/// Config file looked up in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The site: configuration plus resolved paths
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Store file location
    pub data_path: PathBuf,
}

impl Site {
    /// Load the site in `base_dir`, applying environment overrides
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env()?;

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already resolved configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let data_path = base_dir.join(&config.store.data_file);
        Self {
            config,
            base_dir,
            data_path,
        }
    }

    /// Open the persistent store
    pub async fn open_store(&self) -> Result<Arc<dyn ContentStore>> {
        let store = JsonFileStore::open(&self.data_path)
            .await?
            .with_default_author(&self.config.organization);
        tracing::debug!("Opened store at {:?}", store.path());
        Ok(Arc::new(store))
    }

    /// A volatile store, emptied when the process exits
    pub fn memory_store(&self) -> Arc<dyn ContentStore> {
        Arc::new(MemoryStore::new().with_default_author(&self.config.organization))
    }
}
