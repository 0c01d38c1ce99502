//! Message formatting strategies
//!
//! P6Spy renders every logged statement through a strategy it looks up by
//! qualified name (the `logMessageFormat` option). [`StrategyRegistry`] is
//! that lookup.

use crate::contract::ClassRef;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Rendered in place of an absent statement
pub const NULL_PLACEHOLDER: &str = "null";

/// Qualified name of P6Spy's stock single-line strategy
pub const SINGLE_LINE_FORMAT_CLASS: &str = "com.p6spy.engine.spy.appender.SingleLineFormat";

#[allow(clippy::unwrap_used)]
static LINE_BREAKS_OR_TABS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\r?\n|\t)+").unwrap());

#[allow(clippy::unwrap_used)]
static REPEATED_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?-u:\s){2,}").unwrap());

#[allow(clippy::unwrap_used)]
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\r?\n)+").unwrap());

/// Renders one logged statement as a single output string
pub trait MessageFormattingStrategy: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn format_message(
        &self,
        connection_id: i32,
        current_time: &str,
        execution_time: i64,
        category: &str,
        effective_sql: &str,
        sql: Option<&str>,
        url: &str,
    ) -> String;
}

/// One line per statement: connection id, elapsed millis and the compacted SQL
///
/// `sql` of `None` or `""` renders as [`NULL_PLACEHOLDER`]. Whitespace-only
/// SQL compacts to an empty statement. Only ASCII whitespace and control
/// characters are collapsed or trimmed; Unicode spaces such as U+00A0 are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactSingleLineFormat;

impl CompactSingleLineFormat {
    /// Collapse line breaks, tabs and repeated whitespace into single spaces
    pub fn compact(sql: &str) -> String {
        let joined = LINE_BREAKS_OR_TABS.replace_all(sql, " ");
        REPEATED_WHITESPACE
            .replace_all(&joined, " ")
            .trim_matches(|c: char| c <= ' ')
            .to_string()
    }
}

impl MessageFormattingStrategy for CompactSingleLineFormat {
    fn format_message(
        &self,
        connection_id: i32,
        _current_time: &str,
        execution_time: i64,
        _category: &str,
        _effective_sql: &str,
        sql: Option<&str>,
        _url: &str,
    ) -> String {
        let statement = match sql {
            Some(sql) if !sql.is_empty() => Self::compact(sql),
            _ => NULL_PLACEHOLDER.to_string(),
        };
        format!("{{connection: {connection_id}, elapsed: {execution_time}}} statement: {statement}")
    }
}

/// P6Spy's stock format: `now|elapsed|category|connection id|url url|effective|sql`
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLineFormat;

impl SingleLineFormat {
    fn single_line(sql: &str) -> String {
        LINE_BREAKS.replace_all(sql, " ").into_owned()
    }
}

impl MessageFormattingStrategy for SingleLineFormat {
    fn format_message(
        &self,
        connection_id: i32,
        current_time: &str,
        execution_time: i64,
        category: &str,
        effective_sql: &str,
        sql: Option<&str>,
        url: &str,
    ) -> String {
        format!(
            "{current_time}|{execution_time}|{category}|connection {connection_id}|url {url}|{}|{}",
            Self::single_line(effective_sql),
            Self::single_line(sql.unwrap_or_default()),
        )
    }
}

/// Resolves class references to formatting strategies
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn MessageFormattingStrategy>>,
}

impl StrategyRegistry {
    /// Registry holding the compact and the stock single-line strategies
    pub fn with_builtin() -> Self {
        let mut registry = Self::default();
        registry.register(
            ClassRef::of::<CompactSingleLineFormat>(),
            Arc::new(CompactSingleLineFormat),
        );
        registry.register(ClassRef::new(SINGLE_LINE_FORMAT_CLASS), Arc::new(SingleLineFormat));
        registry
    }

    /// Register a strategy, replacing any previous one with the same name
    pub fn register(&mut self, class: ClassRef, strategy: Arc<dyn MessageFormattingStrategy>) {
        self.strategies
            .insert(class.qualified_name().to_string(), strategy);
    }

    /// Look up a strategy by qualified name
    pub fn resolve(&self, qualified_name: &str) -> Option<Arc<dyn MessageFormattingStrategy>> {
        self.strategies.get(qualified_name).cloned()
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.strategies.contains_key(qualified_name)
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("StrategyRegistry")
            .field("strategies", &names)
            .finish()
    }
}
