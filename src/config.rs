use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime configuration for the recipe browser
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Base URL of the recipe catalog API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Directory holding the persisted favorites slot
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Number of recipe cards per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Number of random recipes shown when no search term is given
    #[serde(default = "default_random_count")]
    pub random_count: usize,
    /// Maximum number of page buttons in the pager
    #[serde(default = "default_max_visible_pages")]
    pub max_visible_pages: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout: default_timeout(),
            data_dir: default_data_dir(),
            page_size: default_page_size(),
            random_count: default_random_count(),
            max_visible_pages: default_max_visible_pages(),
        }
    }
}

// Default value functions
fn default_api_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".recipe-browser")
}

fn default_page_size() -> usize {
    12
}

fn default_random_count() -> usize {
    50
}

fn default_max_visible_pages() -> usize {
    7
}

impl BrowserConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BROWSER__ prefix
    /// 2. recipe-browser.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BROWSER__PAGE_SIZE
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<BrowserConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-browser").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_BROWSER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
