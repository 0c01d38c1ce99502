//! Contract layer - public API towards the P6Spy options table
//!
//! This layer contains transport-agnostic models and the client traits the
//! synchronizer writes through.

pub mod client;
pub mod error;
pub mod model;

pub use client::{ModuleReloader, OptionsStore};
pub use error::SpyError;
pub use model::{ClassRef, OptionsMap};
