//! Error types for the P6Spy settings binding

use thiserror::Error;

/// Errors surfaced by the options table, the module manager and config loading
#[derive(Debug, Error)]
pub enum SpyError {
    /// The options table rejected a bulk load
    #[error("failed to load options: {reason}")]
    Load { reason: String },

    /// The module manager failed to re-activate after a load
    #[error("failed to reload modules: {reason}")]
    Reload { reason: String },

    /// No formatting strategy is registered under the given name
    #[error("unknown message formatting strategy: {class}")]
    UnknownStrategy { class: String },

    /// Configuration could not be extracted
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for SpyError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
