//! Domain layer - settings schema, synchronization and formatting strategies

pub mod path;
pub mod schema;
pub mod strategy;
pub mod synchronizer;

pub use schema::{FieldDescriptor, FieldKind, FieldValue, FIELDS};
pub use strategy::{
    CompactSingleLineFormat, MessageFormattingStrategy, SingleLineFormat, StrategyRegistry,
};
pub use synchronizer::{merge_options, OptionsSynchronizer};
