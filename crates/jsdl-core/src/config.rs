use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Download cap used when neither config nor CLI specify one.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Global configuration loaded from `~/.config/jsdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsdlConfig {
    /// Directory where downloaded scripts are written.
    pub output_dir: PathBuf,
    /// Maximum number of downloads in flight at once.
    pub max_concurrent_downloads: usize,
    /// Connect timeout for each HTTP request, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Overall timeout for each HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl Default for JsdlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("js_files"),
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jsdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<JsdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = JsdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: JsdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
