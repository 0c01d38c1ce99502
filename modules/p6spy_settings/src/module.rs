//! Module declaration and lifecycle implementation

use crate::config::{self, Config};
use crate::contract::{ModuleReloader, OptionsStore};
use crate::domain::OptionsSynchronizer;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// P6Spy settings module
///
/// Applies its configuration to the options table once, at startup.
pub struct P6spyModule {
    config: RwLock<Config>,
    synchronizer: OptionsSynchronizer,
}

impl P6spyModule {
    pub fn new(store: Arc<dyn OptionsStore>, reloader: Arc<dyn ModuleReloader>) -> Self {
        Self {
            config: RwLock::new(Config::default()),
            synchronizer: OptionsSynchronizer::new(store, reloader),
        }
    }

    /// Store the configuration and, unless disabled, synchronize the options table
    pub fn init(&self, cfg: Config) -> Result<()> {
        *self.config.write() = cfg.clone();

        if !cfg.enabled {
            tracing::info!("P6Spy settings disabled, keeping library defaults");
            return Ok(());
        }

        self.synchronizer
            .synchronize(&cfg)
            .context("Failed to apply P6Spy settings")?;

        tracing::info!("P6Spy settings module initialized");
        Ok(())
    }

    /// Load configuration from a YAML file plus `P6SPY_*` variables, then [`init`](Self::init)
    pub fn init_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let cfg = config::load(path)
            .with_context(|| format!("Failed to load P6Spy settings from {}", path.display()))?;
        self.init(cfg)
    }

    /// Configuration the module was last initialized with
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }
}
