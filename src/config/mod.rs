//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::options::DEFAULT_PAGE_SIZE;

mod cli;

pub use cli::{CatalogOverrides, CliArgs, Command, LinksArgs, QueryArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "pantry";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub default_page_size: NonZeroU32,
    /// `None` lets store calls run unbounded.
    pub store_timeout: Option<Duration>,
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("PANTRY").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Query(args)) => raw.apply_catalog_overrides(&args.overrides),
        Some(Command::Links(args)) => raw.apply_catalog_overrides(&args.overrides),
        None => raw.apply_catalog_overrides(&CatalogOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    catalog: RawCatalogSettings,
}

impl RawSettings {
    fn apply_catalog_overrides(&mut self, overrides: &CatalogOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(path) = overrides.seed_file.as_ref() {
            self.catalog.seed_file = Some(path.clone());
        }
        if let Some(timeout) = overrides.store_timeout_ms {
            self.catalog.store_timeout_ms = Some(timeout);
        }
        if let Some(size) = overrides.default_page_size {
            self.catalog.default_page_size = Some(size);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { logging, catalog } = raw;

        let logging = build_logging_settings(logging)?;
        let catalog = build_catalog_settings(catalog)?;

        Ok(Self { logging, catalog })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_catalog_settings(catalog: RawCatalogSettings) -> Result<CatalogSettings, LoadError> {
    let page_size = catalog.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let default_page_size = NonZeroU32::new(page_size).ok_or_else(|| {
        LoadError::invalid("catalog.default_page_size", "must be greater than zero")
    })?;

    let timeout_ms = catalog.store_timeout_ms.unwrap_or(DEFAULT_STORE_TIMEOUT_MS);
    let store_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

    let seed_file = catalog
        .seed_file
        .filter(|path| !path.as_os_str().is_empty());

    Ok(CatalogSettings {
        default_page_size,
        store_timeout,
        seed_file,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCatalogSettings {
    default_page_size: Option<u32>,
    store_timeout_ms: Option<u64>,
    seed_file: Option<PathBuf>,
}
