use std::fs;
use std::path::Path;

use anyhow::Context;
use shipsfrom_engine::FilterConfig;
use shipsfrom_logging::filter_info;

/// Reads a RON override file; fields left out keep their defaults.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<FilterConfig> {
    let Some(path) = path else {
        return Ok(FilterConfig::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: FilterConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config file {}", path.display()))?;

    filter_info!("loaded configuration from {}", path.display());
    Ok(config)
}
