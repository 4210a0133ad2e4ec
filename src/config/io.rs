use super::models::PageConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Parse a grouped TOML configuration. Missing tables and keys take defaults.
pub fn parse_config(contents: &str) -> Result<PageConfig> {
    let tables: ConfigTables =
        toml::from_str(contents).context("Invalid page configuration TOML")?;
    Ok(tables.into())
}

/// Render a configuration back into its grouped TOML form.
pub fn serialize_config(config: &PageConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("Failed to serialize page configuration")
}

/// Parse configuration text, falling back to defaults on error.
pub fn load_config(contents: Option<&str>) -> PageConfig {
    let Some(contents) = contents else {
        debug!("No page configuration supplied; using defaults");
        return PageConfig::default();
    };

    match parse_config(contents) {
        Ok(config) => {
            debug!(log_level = %config.log_level, "Parsed page configuration");
            config
        }
        Err(err) => {
            warn!("Falling back to default page configuration: {err:#}");
            PageConfig::default()
        }
    }
}
