use std::{env, path::PathBuf};

pub const DATA_DIR_ENV: &str = "DEPENDENCE_DATA_DIR";
pub const OUTPUT_DIR_ENV: &str = "DEPENDENCE_OUTPUT_DIR";
pub const VERBOSE_ENV: &str = "DEPENDENCE_VERBOSE";

pub const DEFAULT_DATA_DIR: &str = "data";

/// Where the driver reads its indicator tables and writes its dependency tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    /// Defaults to `input_dir`
    pub output_dir: PathBuf,
    /// Log a readable summary of every comparison
    pub verbose: bool,
}

impl AppConfig {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        AppConfig {
            output_dir: input_dir.clone(),
            input_dir,
            verbose: false,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Read `DEPENDENCE_DATA_DIR`, `DEPENDENCE_OUTPUT_DIR` and `DEPENDENCE_VERBOSE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = AppConfig::new(
            non_empty(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        if let Some(output_dir) = non_empty(OUTPUT_DIR_ENV) {
            config = config.with_output_dir(output_dir);
        }
        if let Some(verbose) = non_empty(VERBOSE_ENV) {
            config = config.with_verbose(parse_flag(&verbose));
        }
        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::new(DEFAULT_DATA_DIR)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
