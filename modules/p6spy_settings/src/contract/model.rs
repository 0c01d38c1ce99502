//! Contract models for the P6Spy settings binding

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// String-keyed option table, as consumed by P6Spy
pub type OptionsMap = HashMap<String, String>;

/// Opaque reference to a type by its fully qualified name
///
/// Class-valued options (formatting strategy, appender, data source class)
/// are carried around as names only. Resolving a name to a live
/// implementation happens behind [`crate::domain::StrategyRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRef(String);

impl ClassRef {
    /// Reference a type by an explicit qualified name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Reference a Rust type by its fully qualified path
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Fully qualified name of the referenced type
    pub fn qualified_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
