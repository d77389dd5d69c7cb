//! Rules configuration for `lncheck`.
//!
//! The rules are read from a YAML file. Without an explicit path the default
//! `~/.lncheck.yml` is used when it exists, and the built-in defaults
//! otherwise. Shell expansions like `~` are resolved in all paths.

use std::fs::File;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use cli_harness_core::error::{Error, Result};

/// Default path for the rules configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.lncheck.yml";

/// Default limit on the number of characters in a line
pub const DEFAULT_MAX_LINE_LENGTH: usize = 100;

/// What `lncheck` reports.
///
/// Every field is optional in the YAML file.
///
/// ```yaml
/// max_line_length: 80     # `null` disables the check
/// forbid_tabs: true
/// forbid_trailing_whitespace: false
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    pub max_line_length: Option<usize>,
    pub forbid_tabs: bool,
    pub forbid_trailing_whitespace: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_line_length: Some(DEFAULT_MAX_LINE_LENGTH),
            forbid_tabs: true,
            forbid_trailing_whitespace: true,
        }
    }
}

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

/// Loads the rules to check with.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given configuration file cannot be read
/// - The configuration file is not valid YAML for [`Rules`]
pub fn load_rules(config_path_arg: &Option<String>) -> Result<Rules> {
    let config_path = get_config_path(config_path_arg);

    if config_path_arg.is_none() && !Path::new(&config_path).exists() {
        debug!("No config at `{}`, using default rules", config_path);
        return Ok(Rules::default());
    }

    info!("Reading rules from `{}`", config_path);
    let reader = File::open(&config_path)
        .map_err(|e| Error::io_error("read config", config_path.clone(), e))?;

    serde_yaml::from_reader(reader).map_err(|e| Error::yaml_file_error(config_path, e))
}
