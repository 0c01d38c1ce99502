//! Infrastructure layer - in-process stand-ins for the P6Spy singletons

pub mod memory;

pub use memory::{InMemoryModuleManager, InMemoryOptions, LoggedStatement};
