//! In-memory options table and module manager
//!
//! These mirror the process-wide `P6SpyOptions` / `P6ModuleManager` pair:
//! the table starts out with P6Spy's defaults, and a reload re-reads it and
//! re-activates the configured formatting strategy.

use crate::contract::{ModuleReloader, OptionsMap, OptionsStore, SpyError};
use crate::domain::strategy::{MessageFormattingStrategy, StrategyRegistry, SINGLE_LINE_FORMAT_CLASS};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Option key naming the active formatting strategy
pub const LOG_MESSAGE_FORMAT_KEY: &str = "logMessageFormat";

/// Option defaults P6Spy starts with
pub fn p6spy_defaults() -> OptionsMap {
    [
        ("logMessageFormat", SINGLE_LINE_FORMAT_CLASS),
        ("appender", "com.p6spy.engine.spy.appender.FileLogger"),
        ("logfile", "spy.log"),
        ("append", "true"),
        ("autoflush", "false"),
        ("stacktrace", "false"),
        ("reloadproperties", "false"),
        ("reloadpropertiesinterval", "60"),
        (
            "modulelist",
            "com.p6spy.engine.spy.P6SpyFactory,com.p6spy.engine.logging.P6LogFactory,com.p6spy.engine.outage.P6OutageFactory",
        ),
        ("jmx", "true"),
        ("databaseDialectDateFormat", "dd-MMM-yy"),
        ("databaseDialectTimestampFormat", "dd-MMM-yy HH:mm:ss.SSS"),
        ("databaseDialectBooleanFormat", "boolean"),
        (
            "customLogMessageFormat",
            "%(currentTime)|%(executionTime)|%(category)|connection%(connectionId)|%(sqlSingleLine)",
        ),
        ("excludecategories", "info,debug,result,resultset,batch"),
        ("filter", "false"),
        ("outagedetection", "false"),
        ("outagedetectioninterval", "60"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Options table holding a fixed defaults map and the active values
pub struct InMemoryOptions {
    defaults: OptionsMap,
    active: RwLock<OptionsMap>,
}

impl InMemoryOptions {
    /// Table preloaded with [`p6spy_defaults`]
    pub fn new() -> Self {
        Self::with_defaults(p6spy_defaults())
    }

    pub fn with_defaults(defaults: OptionsMap) -> Self {
        Self {
            active: RwLock::new(defaults.clone()),
            defaults,
        }
    }

    /// Active value of an option
    pub fn get(&self, key: &str) -> Option<String> {
        self.active.read().get(key).cloned()
    }

    /// Copy of the active table
    pub fn snapshot(&self) -> OptionsMap {
        self.active.read().clone()
    }
}

impl Default for InMemoryOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsStore for InMemoryOptions {
    fn defaults(&self) -> OptionsMap {
        self.defaults.clone()
    }

    fn load(&self, options: OptionsMap) -> Result<(), SpyError> {
        let mut active = self.active.write();
        let count = options.len();
        active.extend(options);
        tracing::debug!(count, "Options loaded");
        Ok(())
    }
}

/// A statement as handed to the formatting strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedStatement<'a> {
    pub connection_id: i32,
    pub current_time: &'a str,
    pub execution_time: i64,
    pub category: &'a str,
    pub effective_sql: &'a str,
    pub sql: Option<&'a str>,
    pub url: &'a str,
}

/// Module manager that activates the configured formatting strategy on reload
pub struct InMemoryModuleManager {
    options: Arc<InMemoryOptions>,
    registry: StrategyRegistry,
    active_format: RwLock<Option<Arc<dyn MessageFormattingStrategy>>>,
    reloads: AtomicUsize,
}

impl InMemoryModuleManager {
    pub fn new(options: Arc<InMemoryOptions>, registry: StrategyRegistry) -> Self {
        Self {
            options,
            registry,
            active_format: RwLock::new(None),
            reloads: AtomicUsize::new(0),
        }
    }

    /// Number of completed reloads
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    /// Whether a formatting strategy has been activated
    pub fn is_active(&self) -> bool {
        self.active_format.read().is_some()
    }

    /// Format a statement with the active strategy and log it
    ///
    /// Returns `None` before the first successful reload.
    pub fn log_statement(&self, statement: &LoggedStatement<'_>) -> Option<String> {
        let strategy = self.active_format.read().clone()?;
        let line = strategy.format_message(
            statement.connection_id,
            statement.current_time,
            statement.execution_time,
            statement.category,
            statement.effective_sql,
            statement.sql,
            statement.url,
        );
        tracing::info!(target: "p6spy", "{}", line);
        Some(line)
    }
}

impl ModuleReloader for InMemoryModuleManager {
    fn reload(&self) -> Result<(), SpyError> {
        let class = self
            .options
            .get(LOG_MESSAGE_FORMAT_KEY)
            .unwrap_or_else(|| SINGLE_LINE_FORMAT_CLASS.to_string());
        let strategy = self
            .registry
            .resolve(&class)
            .ok_or_else(|| SpyError::UnknownStrategy {
                class: class.clone(),
            })?;

        *self.active_format.write() = Some(strategy);
        let reloads = self.reloads.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(strategy = %class, reloads, "P6Spy modules reloaded");
        Ok(())
    }
}
