//! Client traits for the external options table and module manager
//!
//! P6Spy keeps its options and its module registry as process-wide singletons.
//! The synchronizer only ever sees them through these two traits.

use super::{error::SpyError, model::OptionsMap};

/// Options table owned by the proxy library
pub trait OptionsStore: Send + Sync {
    /// Current default option mapping (the base a pass merges into)
    fn defaults(&self) -> OptionsMap;

    /// Bulk-load a mapping, replacing values by key
    ///
    /// Keys absent from `options` keep their current value.
    fn load(&self, options: OptionsMap) -> Result<(), SpyError>;
}

/// Module registry that consumes the options table
pub trait ModuleReloader: Send + Sync {
    /// Re-read the options table and re-activate dependent modules
    fn reload(&self) -> Result<(), SpyError>;
}
