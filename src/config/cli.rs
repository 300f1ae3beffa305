use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Pantry binary.
#[derive(Debug, Parser)]
#[command(name = "pantry", version, about = "Pantry recipe catalog query tool")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PANTRY_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print one page of recipes as JSON.
    Query(QueryArgs),
    /// Print link data (id and title) of matching published recipes.
    Links(LinksArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct CatalogOverrides {
    /// Override the JSON file the recipe store is seeded from.
    #[arg(long = "seed-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub seed_file: Option<PathBuf>,

    /// Override the store call timeout in milliseconds (0 disables it).
    #[arg(long = "store-timeout-ms", value_name = "MILLIS")]
    pub store_timeout_ms: Option<u64>,

    /// Override the page size used when `--page-size` is absent or invalid.
    #[arg(long = "default-page-size", value_name = "COUNT")]
    pub default_page_size: Option<u32>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub overrides: CatalogOverrides,

    /// Free-text search over title, description, author and tags.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// 1-based page number; unparsable values fall back to 1.
    #[arg(long, value_name = "PAGE", allow_hyphen_values = true)]
    pub page: Option<String>,

    /// Page size; unparsable values fall back to the configured default.
    #[arg(long = "page-size", value_name = "COUNT", allow_hyphen_values = true)]
    pub page_size: Option<String>,

    /// Include recipes that are still awaiting moderation.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub admin: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LinksArgs {
    #[command(flatten)]
    pub overrides: CatalogOverrides,

    /// Free-text search over title, description, author and tags.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Resolve links with administrator visibility.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub admin: bool,
}
