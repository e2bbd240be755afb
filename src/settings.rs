use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::pddl::astar::Strategy;
use crate::pddl::problem::DEFAULT_CACHE_CAPACITY;
use crate::pddl::Heuristic;

/// Planner settings: defaults, then a TOML file, then `PLANNER__*` variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Heuristic estimates kept per problem.
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { capacity: DEFAULT_CACHE_CAPACITY }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub heuristic: Heuristic,
    pub strategy: Strategy,
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub default_level: String,
    pub filters: Vec<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { default_level: "info".to_string(), filters: Vec::new() }
    }
}

impl LoggingSettings {
    pub fn env_filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        EnvFilter::builder()
            .with_default_directive(self.default_level.parse()?)
            .parse(self.filters.join(","))
    }
}

impl Settings {
    /// Reads `path`, or `planner.toml` from the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name("planner").required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

/// `PLANNER__LOGGING__FILTERS` takes a comma separated list of directives.
fn environment() -> Environment {
    Environment::with_prefix("PLANNER")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("logging.filters")
}
