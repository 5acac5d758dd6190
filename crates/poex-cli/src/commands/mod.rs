//! CLI subcommands.

pub mod batch;
pub mod classify;
pub mod config;
pub mod extract;
pub mod validate;

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use poex_core::ExtractionConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poex")
        .join("config.json")
}

/// Load the configuration from `--config`, else the default file if it
/// exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ExtractionConfig> {
    if let Some(path) = config_path {
        return Ok(ExtractionConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(ExtractionConfig::from_file(&default_path)?)
    } else {
        Ok(ExtractionConfig::default())
    }
}

/// Read a text input; `-` means stdin.
pub fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(std::fs::read_to_string(input)?)
}
