//! Settings to options table synchronization
//!
//! One pass merges every set field of [`Config`] into the P6Spy defaults,
//! bulk-loads the result and then reloads the P6Spy modules.

use super::path::clean_path;
use super::schema::{FieldValue, ENABLED_FIELD, FIELDS};
use crate::config::Config;
use crate::contract::{ModuleReloader, OptionsMap, OptionsStore, SpyError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Applies settings to the options table and reloads its consumers
pub struct OptionsSynchronizer {
    store: Arc<dyn OptionsStore>,
    reloader: Arc<dyn ModuleReloader>,
    /// Reload replaces module state wholesale, so passes must not interleave
    gate: Mutex<()>,
}

impl OptionsSynchronizer {
    pub fn new(store: Arc<dyn OptionsStore>, reloader: Arc<dyn ModuleReloader>) -> Self {
        Self {
            store,
            reloader,
            gate: Mutex::new(()),
        }
    }

    /// Run one synchronization pass
    ///
    /// Load and reload failures are returned as-is; nothing is retried.
    pub fn synchronize(&self, config: &Config) -> Result<(), SpyError> {
        let _pass = self.gate.lock();

        let defaults = self.store.defaults();
        let before = defaults.len();
        let options = merge_options(config, defaults);
        let total = options.len();

        self.store.load(options)?;
        if let Err(err) = self.reloader.reload() {
            tracing::error!(error = %err, "P6Spy module reload failed");
            return Err(err);
        }

        tracing::info!(
            total,
            added = total - before,
            "P6Spy options synchronized"
        );
        Ok(())
    }
}

/// Merge the set fields of `config` into `options`
///
/// Unset and blank fields leave existing entries alone; no key is removed.
pub fn merge_options(config: &Config, mut options: OptionsMap) -> OptionsMap {
    for descriptor in FIELDS {
        if descriptor.name.eq_ignore_ascii_case(ENABLED_FIELD) {
            continue;
        }

        let value = match descriptor.read(config) {
            Ok(Some(value)) => value,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable settings field");
                continue;
            }
        };

        let Some(coerced) = coerce(value) else {
            tracing::debug!(field = descriptor.name, kind = ?descriptor.kind, "Field type not synchronized");
            continue;
        };
        if coerced.trim().is_empty() {
            continue;
        }

        let key = resolve_key(&options, descriptor.key());
        tracing::debug!(field = descriptor.name, key = %key, value = %coerced, "Applying option");
        options.insert(key, coerced);
    }
    options
}

/// String form of a field value, `None` for kinds P6Spy options are not built from
pub fn coerce(value: FieldValue<'_>) -> Option<String> {
    match value {
        FieldValue::Boolean(flag) => Some(flag.to_string()),
        FieldValue::Text(text) => Some(text.to_string()),
        FieldValue::Path(path) if path.trim().is_empty() => Some(path.to_string()),
        FieldValue::Path(path) => Some(clean_path(path)),
        FieldValue::Class(class) => Some(class.qualified_name().to_string()),
        FieldValue::Integer(_) => None,
    }
}

// An exact match wins; otherwise the smallest existing key equal ignoring case
fn resolve_key(options: &OptionsMap, key: &str) -> String {
    if options.contains_key(key) {
        return key.to_string();
    }
    options
        .keys()
        .filter(|existing| existing.eq_ignore_ascii_case(key))
        .min()
        .cloned()
        .unwrap_or_else(|| key.to_string())
}
