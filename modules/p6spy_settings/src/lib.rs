//! P6Spy Settings Module
//!
//! Binds a typed settings record onto the P6Spy options table: set fields
//! are coerced to strings, merged into the library defaults under their
//! P6Spy option names, and the P6Spy modules are reloaded. Also provides a
//! compact single-line message formatting strategy.

// Public exports
pub mod contract;
pub use contract::{ClassRef, ModuleReloader, OptionsMap, OptionsStore, SpyError};

pub mod module;
pub use module::P6spyModule;

pub mod config;
pub use config::Config;

pub mod domain;
pub use domain::{CompactSingleLineFormat, MessageFormattingStrategy, OptionsSynchronizer};

pub mod infra;
