//! CLI command implementations.

pub mod compare;
pub mod inspect;
pub mod profile;

use std::path::Path;

use sheetsim::ComparisonConfig;

/// Load the configuration file if one was given, else the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<ComparisonConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "Loading configuration");
            Ok(ComparisonConfig::from_json_file(p)?)
        }
        None => Ok(ComparisonConfig::default()),
    }
}
