use config::{Config, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "NSLEDGER";

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

pub trait ConfigErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError>;
}

impl<T> ConfigErrorExt<T> for Result<T, config::ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError> {
        self.map_err(|source| ConfigError::Config { source, context: Some(context.into()) })
    }
}

impl From<config::ConfigError> for ConfigError {
    #[inline]
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

/// Settings of one tenant context.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TenantConfig {
    /// Namespace every key of this tenant is stored under.
    pub namespace: String,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self { namespace: "default".to_owned() }
    }
}

/// Loads a configuration structure from a file with environment overrides.
///
/// 1. **Base File**: the file at `path` (format inferred from its extension) is required.
/// 2. **Environment Overrides**: variables prefixed with `NSLEDGER__` overlay the file.
///    Nested structures use double underscores (`NSLEDGER__TENANT__NAMESPACE` maps
///    to `tenant.namespace`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing, malformed, or does not
/// match the structure of `T`.
///
/// # Example
/// ```rust
/// use nsledger_namespace::config::{TenantConfig, load_config};
///
/// let cfg: TenantConfig = load_config("config/tenant.toml").unwrap_or_default();
/// assert!(!cfg.namespace.is_empty());
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_with_env(path.as_ref(), None)
}

pub(crate) fn load_with_env<T>(
    path: &Path,
    env: Option<HashMap<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let builder = Config::builder().add_source(File::from(path).required(true)).add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .source(env),
    );

    info!("Loading config from {}", path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
