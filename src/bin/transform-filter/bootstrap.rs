use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use transform_filter::config::FilterConfig;
use transform_filter::error::*;

const CONFIG_ENV_VAR: &str = "TRANSFORM_FILTER_CONFIG";
const LOG_ENV_VAR: &str = "TRANSFORM_FILTER_LOG";

#[derive(Debug)]
pub struct BootStrap {
    config: FilterConfig,
}

impl BootStrap {
    pub fn new(config_path: Option<&str>, verbose: bool) -> Result<Self> {
        init_logging(verbose);
        Ok(BootStrap {
            config: parse_filter_config(config_path)?,
        })
    }

    pub fn into_config(self) -> FilterConfig {
        self.config
    }
}

/// Installs the stderr subscriber. `TRANSFORM_FILTER_LOG` takes precedence over the verbose flag.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded, keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Retrieves the configuration file path using the following order :
///
/// - The path given on the command line
/// - The path specified by the environment variable TRANSFORM_FILTER_CONFIG
///
/// # Returns
/// The expanded path (if any)
///
/// # Errors
/// Returns an error if the path cannot be interpolated
fn config_file(config_path: Option<&str>) -> Result<Option<PathBuf>> {
    let path = match config_path {
        Some(path) => path.to_string(),
        None => match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => path.to_string_lossy().to_string(),
            None => return Ok(None),
        },
    };

    match shellexpand::full(&path) {
        Ok(expanded) => Ok(Some(PathBuf::from(expanded.to_string()))),
        Err(e) => Err(Error::ConfigReadError {
            file: path,
            cause: e.to_string(),
        }),
    }
}

/// Processes the filter configuration file retrieving the associated `FilterConfig` structure.
/// Without configuration file the default configuration is used.
pub fn parse_filter_config(config_path: Option<&str>) -> Result<FilterConfig> {
    match config_file(config_path)? {
        Some(path) => FilterConfig::load(&path),
        None => {
            tracing::debug!("no configuration file, using defaults");
            Ok(FilterConfig::default())
        }
    }
}
