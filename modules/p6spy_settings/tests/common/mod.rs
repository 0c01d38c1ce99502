//! Common test utilities: a recording options store and reloader

#![allow(dead_code)]

use p6spy_settings::{ModuleReloader, OptionsMap, OptionsStore, SpyError};
use parking_lot::RwLock;
use std::sync::Arc;

/// Calls seen by the mocks, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Defaults,
    Load(OptionsMap),
    Reload,
}

/// Shared call log for a store/reloader pair
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<RwLock<Vec<Call>>>,
}

impl CallLog {
    pub fn push(&self, call: Call) {
        self.calls.write().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.read().clone()
    }

    /// Mappings passed to `load`, in order
    pub fn loads(&self) -> Vec<OptionsMap> {
        self.calls
            .read()
            .iter()
            .filter_map(|call| match call {
                Call::Load(options) => Some(options.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn reload_count(&self) -> usize {
        self.calls
            .read()
            .iter()
            .filter(|call| **call == Call::Reload)
            .count()
    }
}

pub struct MockStore {
    defaults: OptionsMap,
    log: CallLog,
    fail_load: bool,
}

impl MockStore {
    pub fn new(defaults: OptionsMap, log: CallLog) -> Self {
        Self {
            defaults,
            log,
            fail_load: false,
        }
    }

    pub fn failing(defaults: OptionsMap, log: CallLog) -> Self {
        Self {
            defaults,
            log,
            fail_load: true,
        }
    }
}

impl OptionsStore for MockStore {
    fn defaults(&self) -> OptionsMap {
        self.log.push(Call::Defaults);
        self.defaults.clone()
    }

    fn load(&self, options: OptionsMap) -> Result<(), SpyError> {
        if self.fail_load {
            return Err(SpyError::Load {
                reason: "options table is read-only".to_string(),
            });
        }
        self.log.push(Call::Load(options));
        Ok(())
    }
}

pub struct MockReloader {
    log: CallLog,
    fail: bool,
}

impl MockReloader {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: CallLog) -> Self {
        Self { log, fail: true }
    }
}

impl ModuleReloader for MockReloader {
    fn reload(&self) -> Result<(), SpyError> {
        self.log.push(Call::Reload);
        if self.fail {
            return Err(SpyError::Reload {
                reason: "module factory failed".to_string(),
            });
        }
        Ok(())
    }
}

/// A small defaults table in P6Spy's key spelling
pub fn sample_defaults() -> OptionsMap {
    [
        ("logMessageFormat", "com.p6spy.engine.spy.appender.SingleLineFormat"),
        ("appender", "com.p6spy.engine.spy.appender.FileLogger"),
        ("logfile", "spy.log"),
        ("append", "true"),
        ("autoflush", "false"),
        ("excludecategories", "info,debug,result,resultset,batch"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}
