use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub report: ReportConfig,
}

/// Raw data locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory holding one sub-directory per month of raw CSV exports.
    #[serde(default = "default_raw_root")]
    pub raw_root: PathBuf,

    /// Month to analyze when the CLI does not pass one; falls back to the
    /// latest month discovered under `raw_root`.
    #[serde(default)]
    pub default_month: Option<String>,
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_true")]
    pub pretty: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_raw_root() -> PathBuf {
    PathBuf::from("data/raw")
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("data/processed")
}
fn default_true() -> bool {
    true
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("ANALYTICS").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());
        Ok(app_cfg)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                raw_root: default_raw_root(),
                default_month: None,
            },
            report: ReportConfig {
                out_dir: default_out_dir(),
                pretty: true,
            },
        }
    }
}
