//! Static field table of the settings record
//!
//! Each entry names a [`Config`] field, its semantic type, the P6Spy option key
//! it maps to when that differs from the field name, and how to read it.

use crate::config::Config;
use crate::contract::ClassRef;
use std::fmt;

/// Field gating the whole binding; never synchronized
pub const ENABLED_FIELD: &str = "enabled";

/// Semantic type of a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    Text,
    /// Text holding a filesystem path, cleaned before use
    Path,
    Class,
    Integer,
}

/// Value read from a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Boolean(bool),
    Text(&'a str),
    Path(&'a str),
    Class(&'a ClassRef),
    Integer(u32),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Text(_) => FieldKind::Text,
            Self::Path(_) => FieldKind::Path,
            Self::Class(_) => FieldKind::Class,
            Self::Integer(_) => FieldKind::Integer,
        }
    }
}

/// A field whose reader produced a value of another kind than declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessError {
    pub field: &'static str,
    pub declared: FieldKind,
    pub actual: FieldKind,
}

impl fmt::Display for FieldAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' declared as {:?} but read as {:?}",
            self.field, self.declared, self.actual
        )
    }
}

impl std::error::Error for FieldAccessError {}

type Reader = for<'a> fn(&'a Config) -> Option<FieldValue<'a>>;

/// One settings field
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub kind: FieldKind,
    reader: Reader,
}

impl FieldDescriptor {
    const fn new(
        name: &'static str,
        alias: Option<&'static str>,
        kind: FieldKind,
        reader: Reader,
    ) -> Self {
        Self {
            name,
            alias,
            kind,
            reader,
        }
    }

    /// Option key this field is written under
    pub fn key(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }

    /// Read the field, checking the value against the declared kind
    pub fn read<'a>(&self, config: &'a Config) -> Result<Option<FieldValue<'a>>, FieldAccessError> {
        match (self.reader)(config) {
            Some(value) if value.kind() != self.kind => Err(FieldAccessError {
                field: self.name,
                declared: self.kind,
                actual: value.kind(),
            }),
            value => Ok(value),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("kind", &self.kind)
            .finish()
    }
}

use FieldKind::{Boolean, Class, Integer, Path, Text};

/// Every field of [`Config`], in declaration order
pub static FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(ENABLED_FIELD, None, Boolean, |c| {
        Some(FieldValue::Boolean(c.enabled))
    }),
    FieldDescriptor::new("autoFlush", Some("autoflush"), Boolean, |c| {
        c.auto_flush.map(FieldValue::Boolean)
    }),
    FieldDescriptor::new("driverList", Some("driverlist"), Text, |c| {
        c.driver_list.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("logFile", Some("logfile"), Path, |c| {
        c.log_file.as_deref().map(FieldValue::Path)
    }),
    FieldDescriptor::new("logMessageFormat", None, Class, |c| {
        c.log_message_format.as_ref().map(FieldValue::Class)
    }),
    FieldDescriptor::new("append", None, Boolean, |c| {
        c.append.map(FieldValue::Boolean)
    }),
    FieldDescriptor::new("dateFormat", Some("dateformat"), Text, |c| {
        c.date_format.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("appender", None, Class, |c| {
        c.appender.as_ref().map(FieldValue::Class)
    }),
    FieldDescriptor::new("moduleList", Some("modulelist"), Text, |c| {
        c.module_list.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("stackTrace", Some("stacktrace"), Boolean, |c| {
        c.stack_trace.map(FieldValue::Boolean)
    }),
    FieldDescriptor::new("stackTraceClass", Some("stacktraceclass"), Class, |c| {
        c.stack_trace_class.as_ref().map(FieldValue::Class)
    }),
    FieldDescriptor::new("reloadProperties", Some("reloadproperties"), Boolean, |c| {
        c.reload_properties.map(FieldValue::Boolean)
    }),
    FieldDescriptor::new(
        "reloadPropertiesInterval",
        Some("reloadpropertiesinterval"),
        Integer,
        |c| c.reload_properties_interval.map(FieldValue::Integer),
    ),
    FieldDescriptor::new("jndiContextFactory", Some("jndicontextfactory"), Text, |c| {
        c.jndi_context_factory.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new(
        "jndiContextProviderUrl",
        Some("jndicontextproviderurl"),
        Text,
        |c| c.jndi_context_provider_url.as_deref().map(FieldValue::Text),
    ),
    FieldDescriptor::new("jndiContextCustom", Some("jndicontextcustom"), Text, |c| {
        c.jndi_context_custom.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("realDatasource", Some("realdatasource"), Text, |c| {
        c.real_datasource.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("realDatasourceClass", Some("realdatasourceclass"), Class, |c| {
        c.real_datasource_class.as_ref().map(FieldValue::Class)
    }),
    FieldDescriptor::new(
        "realDatasourceProperties",
        Some("realdatasourceproperties"),
        Text,
        |c| c.real_datasource_properties.as_deref().map(FieldValue::Text),
    ),
    FieldDescriptor::new("customLogMessageFormat", None, Text, |c| {
        c.custom_log_message_format.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("databaseDialectDateFormat", None, Text, |c| {
        c.database_dialect_date_format.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("databaseDialectTimestampFormat", None, Text, |c| {
        c.database_dialect_timestamp_format
            .as_deref()
            .map(FieldValue::Text)
    }),
    FieldDescriptor::new("databaseDialectBooleanFormat", None, Text, |c| {
        c.database_dialect_boolean_format.as_deref().map(FieldValue::Text)
    }),
    FieldDescriptor::new("jmx", None, Boolean, |c| c.jmx.map(FieldValue::Boolean)),
    FieldDescriptor::new("jmxPrefix", None, Text, |c| {
        c.jmx_prefix.as_deref().map(FieldValue::Text)
    }),
];

/// Look up a field by name, ignoring case
pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.name.eq_ignore_ascii_case(name))
}
