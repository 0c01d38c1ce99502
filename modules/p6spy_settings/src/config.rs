//! Configuration for the P6Spy settings binding
//!
//! Option names are case-sensitive on the P6Spy side. Every multi-word field
//! therefore also accepts its all-lowercase spelling, which is the name P6Spy
//! itself uses for most options.

use crate::contract::{ClassRef, SpyError};
use crate::domain::schema;
use crate::domain::strategy::CompactSingleLineFormat;
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Section of the configuration document holding the P6Spy settings
pub const CONFIG_SECTION: &str = "p6spy";

/// Prefix of environment variables overriding the configuration file
pub const ENV_PREFIX: &str = "P6SPY_";

/// Appender used unless configured otherwise
pub const DEFAULT_APPENDER: &str = "com.p6spy.engine.spy.appender.Slf4JLogger";

/// P6Spy settings
///
/// Unset fields leave the corresponding P6Spy default untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Whether to apply these settings at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Flush per statement
    #[serde(default, alias = "autoflush")]
    pub auto_flush: Option<bool>,

    /// Comma separated list of JDBC drivers to load and register
    #[serde(default, alias = "driverlist", deserialize_with = "string_or_scalar")]
    pub driver_list: Option<String>,

    /// Log file used by the file logger; forward slashes are expected
    #[serde(default, alias = "logfile", deserialize_with = "string_or_scalar")]
    pub log_file: Option<String>,

    /// Strategy used to format log messages
    #[serde(default = "default_log_message_format", alias = "logmessageformat")]
    pub log_message_format: Option<ClassRef>,

    /// Append to the log file instead of truncating it (file logger only)
    #[serde(default = "default_some_true")]
    pub append: Option<bool>,

    /// Date format in `SimpleDateFormat` notation
    #[serde(default, alias = "dateformat", deserialize_with = "string_or_scalar")]
    pub date_format: Option<String>,

    /// Appender used for logging
    #[serde(default = "default_appender")]
    pub appender: Option<ClassRef>,

    /// Active P6Spy modules; changes here only take effect on reload
    #[serde(default, alias = "modulelist", deserialize_with = "string_or_scalar")]
    pub module_list: Option<String>,

    /// Print a stack trace for every logged statement
    #[serde(default, alias = "stacktrace")]
    pub stack_trace: Option<bool>,

    /// Restricts stack traces to the given class
    #[serde(default, alias = "stacktraceclass")]
    pub stack_trace_class: Option<ClassRef>,

    /// Reload the properties file periodically
    #[serde(default, alias = "reloadproperties")]
    pub reload_properties: Option<bool>,

    /// Properties reload interval in seconds
    #[serde(default, alias = "reloadpropertiesinterval")]
    pub reload_properties_interval: Option<u32>,

    /// JNDI initial context factory for data source lookup
    #[serde(default, alias = "jndicontextfactory", deserialize_with = "string_or_scalar")]
    pub jndi_context_factory: Option<String>,

    /// JNDI provider URL for data source lookup
    #[serde(default, alias = "jndicontextproviderurl", deserialize_with = "string_or_scalar")]
    pub jndi_context_provider_url: Option<String>,

    /// Additional JNDI environment, `name;value` pairs separated by commas
    #[serde(default, alias = "jndicontextcustom", deserialize_with = "string_or_scalar")]
    pub jndi_context_custom: Option<String>,

    /// JNDI name of the real data source
    #[serde(default, alias = "realdatasource", deserialize_with = "string_or_scalar")]
    pub real_datasource: Option<String>,

    /// Class of the real data source
    #[serde(default, alias = "realdatasourceclass")]
    pub real_datasource_class: Option<ClassRef>,

    /// Real data source properties, `name;value` pairs separated by commas
    #[serde(default, alias = "realdatasourceproperties", deserialize_with = "string_or_scalar")]
    pub real_datasource_properties: Option<String>,

    /// Template for `CustomLineFormat`, e.g. `%(currentTime)|%(executionTime)|%(sqlSingleLine)`
    #[serde(default, alias = "customlogmessageformat", deserialize_with = "string_or_scalar")]
    pub custom_log_message_format: Option<String>,

    /// Format for logged date values
    #[serde(default, alias = "databasedialectdateformat", deserialize_with = "string_or_scalar")]
    pub database_dialect_date_format: Option<String>,

    /// Format for logged timestamp values
    #[serde(default, alias = "databasedialecttimestampformat", deserialize_with = "string_or_scalar")]
    pub database_dialect_timestamp_format: Option<String>,

    /// Format for logged booleans: `boolean` or `numeric`
    #[serde(default, alias = "databasedialectbooleanformat", deserialize_with = "string_or_scalar")]
    pub database_dialect_boolean_format: Option<String>,

    /// Expose options via JMX
    #[serde(default = "default_some_true")]
    pub jmx: Option<bool>,

    /// Prefix of the JMX object name
    #[serde(default, alias = "jmxprefix", deserialize_with = "string_or_scalar")]
    pub jmx_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_flush: None,
            driver_list: None,
            log_file: None,
            log_message_format: default_log_message_format(),
            append: Some(true),
            date_format: None,
            appender: default_appender(),
            module_list: None,
            stack_trace: None,
            stack_trace_class: None,
            reload_properties: None,
            reload_properties_interval: None,
            jndi_context_factory: None,
            jndi_context_provider_url: None,
            jndi_context_custom: None,
            real_datasource: None,
            real_datasource_class: None,
            real_datasource_properties: None,
            custom_log_message_format: None,
            database_dialect_date_format: None,
            database_dialect_timestamp_format: None,
            database_dialect_boolean_format: None,
            jmx: Some(true),
            jmx_prefix: None,
        }
    }
}

impl Config {
    /// Settings with every synchronized field unset
    pub fn unset() -> Self {
        Self {
            enabled: true,
            auto_flush: None,
            driver_list: None,
            log_file: None,
            log_message_format: None,
            append: None,
            date_format: None,
            appender: None,
            module_list: None,
            stack_trace: None,
            stack_trace_class: None,
            reload_properties: None,
            reload_properties_interval: None,
            jndi_context_factory: None,
            jndi_context_provider_url: None,
            jndi_context_custom: None,
            real_datasource: None,
            real_datasource_class: None,
            real_datasource_properties: None,
            custom_log_message_format: None,
            database_dialect_date_format: None,
            database_dialect_timestamp_format: None,
            database_dialect_boolean_format: None,
            jmx: None,
            jmx_prefix: None,
        }
    }

    /// Parse the settings section from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

fn default_true() -> bool {
    true
}

fn default_some_true() -> Option<bool> {
    Some(true)
}

// Env values arrive pre-parsed, so `P6SPY_JMXPREFIX=42` shows up as a number
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

fn string_or_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Bool(flag) => flag.to_string(),
        Scalar::Unsigned(number) => number.to_string(),
        Scalar::Signed(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
    }))
}

fn default_log_message_format() -> Option<ClassRef> {
    Some(ClassRef::of::<CompactSingleLineFormat>())
}

fn default_appender() -> Option<ClassRef> {
    Some(ClassRef::new(DEFAULT_APPENDER))
}

/// Load settings from a YAML file overlaid with `P6SPY_*` environment variables
///
/// Variable names are matched to fields ignoring case, so `P6SPY_AUTOFLUSH`
/// overrides `autoFlush` from the file. A missing file with no variables set
/// yields the defaults.
pub fn load(path: impl AsRef<Path>) -> Result<Config, SpyError> {
    let figment = Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).map(|key| {
            let name = schema::field(key.as_str()).map_or(key.as_str(), |field| field.name);
            format!("{CONFIG_SECTION}.{name}").into()
        }));
    from_figment(&figment)
}

/// Extract settings from an already assembled figment
pub fn from_figment(figment: &Figment) -> Result<Config, SpyError> {
    if !figment.contains(CONFIG_SECTION) {
        tracing::debug!(section = CONFIG_SECTION, "no p6spy section, using defaults");
        return Ok(Config::default());
    }
    Ok(figment.extract_inner::<Config>(CONFIG_SECTION)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.enabled);
        assert_eq!(config.append, Some(true));
        assert_eq!(config.jmx, Some(true));
        assert_eq!(
            config.appender.as_ref().map(ClassRef::qualified_name),
            Some(DEFAULT_APPENDER)
        );
        assert_eq!(
            config.log_message_format,
            Some(ClassRef::of::<CompactSingleLineFormat>())
        );
    }

    #[test]
    fn test_empty_document_matches_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_camel_case_and_lowercase_keys() {
        let config = Config::from_yaml_str(
            r#"
autoFlush: true
logfile: logs/spy.log
reloadPropertiesInterval: 30
stacktraceclass: com.example.Repository
"#,
        )
        .unwrap();

        assert_eq!(config.auto_flush, Some(true));
        assert_eq!(config.log_file.as_deref(), Some("logs/spy.log"));
        assert_eq!(config.reload_properties_interval, Some(30));
        assert_eq!(
            config.stack_trace_class,
            Some(ClassRef::new("com.example.Repository"))
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_yaml_str("logFiles: spy.log").is_err());
    }

    #[test]
    fn test_explicit_null_unsets_default() {
        let config = Config::from_yaml_str("appender: ~\njmx: ~").unwrap();
        assert_eq!(config.appender, None);
        assert_eq!(config.jmx, None);
    }

    #[test]
    fn test_from_figment_without_section() {
        let figment = Figment::new().merge(Yaml::string("server:\n  port: 8080\n"));
        assert_eq!(from_figment(&figment).unwrap(), Config::default());
    }

    #[test]
    fn test_from_figment_with_section() {
        let figment = Figment::new().merge(Yaml::string(
            "p6spy:\n  enabled: false\n  dateFormat: yyyy-MM-dd\n",
        ));
        let config = from_figment(&figment).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.date_format.as_deref(), Some("yyyy-MM-dd"));
        assert_eq!(config.append, Some(true));
    }

    #[test]
    fn test_from_figment_reports_bad_type() {
        let figment = Figment::new().merge(Yaml::string("p6spy:\n  autoFlush: [1, 2]\n"));
        assert!(matches!(from_figment(&figment), Err(SpyError::Config(_))));
    }

    #[test]
    fn test_numeric_and_boolean_text_values_are_stringified() {
        let config = Config::from_yaml_str("jmxPrefix: 42\ndriverList: true\ndateFormat: 1.5\n").unwrap();
        assert_eq!(config.jmx_prefix.as_deref(), Some("42"));
        assert_eq!(config.driver_list.as_deref(), Some("true"));
        assert_eq!(config.date_format.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_load_from_env_only() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("P6SPY_AUTOFLUSH", "true");
            jail.set_env("P6SPY_LOGFILE", "logs/spy.log");
            jail.set_env("P6SPY_LOGMESSAGEFORMAT", "com.p6spy.engine.spy.appender.SingleLineFormat");

            let config = load("missing.yaml").map_err(|e| e.to_string())?;
            assert!(config.enabled);
            assert_eq!(config.auto_flush, Some(true));
            assert_eq!(config.log_file.as_deref(), Some("logs/spy.log"));
            assert_eq!(
                config.log_message_format,
                Some(ClassRef::new("com.p6spy.engine.spy.appender.SingleLineFormat"))
            );
            assert_eq!(config.append, Some(true));
            Ok(())
        });
    }

    #[test]
    fn test_load_env_text_values_that_parse_as_scalars() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("P6SPY_JMXPREFIX", "42");
            jail.set_env("P6SPY_DRIVERLIST", "true");

            let config = load("missing.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config.jmx_prefix.as_deref(), Some("42"));
            assert_eq!(config.driver_list.as_deref(), Some("true"));
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "app.yaml",
                "p6spy:\n  autoFlush: false\n  dateFormat: yyyy-MM-dd\n  jmxPrefix: orders\n",
            )?;
            jail.set_env("P6SPY_AUTOFLUSH", "true");
            jail.set_env("P6SPY_DATEFORMAT", "HH:mm:ss");
            jail.set_env("P6SPY_ENABLED", "false");

            let config = load("app.yaml").map_err(|e| e.to_string())?;
            assert!(!config.enabled);
            assert_eq!(config.auto_flush, Some(true));
            assert_eq!(config.date_format.as_deref(), Some("HH:mm:ss"));
            assert_eq!(config.jmx_prefix.as_deref(), Some("orders"));
            Ok(())
        });
    }

    #[test]
    fn test_load_without_file_or_env_uses_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = load("missing.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_unknown_env_key() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("P6SPY_LOGFILES", "spy.log");
            assert!(matches!(load("missing.yaml"), Err(SpyError::Config(_))));
            Ok(())
        });
    }
}
