//! Application configuration for the course catalog tools.
//!
//! User config lives at `~/.coursecatalog/coursecatalog.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "coursecatalog.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursecatalog";

/// Offset between the Gregorian calendar and the ROC (Minguo) year.
const ROC_EPOCH_OFFSET: i32 = 1911;

// ---------------------------------------------------------------------------
// Config structs (matching coursecatalog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where and how to fetch the catalog.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where CSV files are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Multi-year batch settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Site root; listing pages live under `/view-dept/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Department code appended to the listing path.
    #[serde(default = "default_department")]
    pub department: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            department: default_department(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://course.thu.edu.tw".into()
}
fn default_department() -> String {
    "350".into()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the per-term CSV files are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// First academic year (ROC calendar) to fetch.
    #[serde(default = "default_start_year")]
    pub start_year: u32,

    /// Last academic year, inclusive. Defaults to the current ROC year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<u32>,

    /// Stop the batch at the first failed year/term instead of skipping it.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: None,
            fail_fast: false,
        }
    }
}

fn default_start_year() -> u32 {
    110
}

impl BatchConfig {
    /// Resolved inclusive end year.
    pub fn end_year_or_current(&self) -> u32 {
        self.end_year.unwrap_or_else(current_roc_year)
    }
}

/// Current year in the ROC (Minguo) calendar used by the catalog.
pub fn current_roc_year() -> u32 {
    let year = chrono::Local::now().year() - ROC_EPOCH_OFFSET;
    u32::try_from(year).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.coursecatalog/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.coursecatalog/coursecatalog.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CatalogError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CatalogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CatalogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("department"));
        assert!(!toml_str.contains("end_year"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.catalog.department, "350");
        assert_eq!(parsed.catalog.timeout_secs, 30);
        assert_eq!(parsed.batch.start_year, 110);
        assert!(!parsed.batch.fail_fast);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[catalog]
department = "360"

[batch]
start_year = 108
end_year = 112
fail_fast = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.catalog.department, "360");
        assert_eq!(config.catalog.base_url, "https://course.thu.edu.tw");
        assert_eq!(config.output.dir, ".");
        assert_eq!(config.batch.end_year_or_current(), 112);
        assert!(config.batch.fail_fast);
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/coursecatalog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn current_roc_year_is_plausible() {
        // 2011 onwards is ROC 100+
        assert!(current_roc_year() >= 100);
    }
}
