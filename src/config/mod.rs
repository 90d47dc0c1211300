use std::{
    env,
    fs,
    path::PathBuf,
    str::FromStr,
};

use nanoserde::{DeJson, SerJson};
use rust_decimal::Decimal;

use crate::{
    error::{ReportError, ReportResult},
    report::{PipelineSettings, PriceTiers},
};

const DB_NAME: &str = "reportly.db";
const DEFAULT_DATA_DIR: &[&str] = &[".local", "share", "reportly"];
const CONFIG_PATH: &[&str] = &[".config", "reportly", "config.json"];

const DEFAULT_CURRENCY: &str = "Bs";
const DEFAULT_ONSCREEN_LIMIT: usize = 100;
const DEFAULT_CHEAP_MAX: &str = "100.00";
const DEFAULT_PREMIUM_MIN: &str = "500.00";

#[derive(Default, DeJson, SerJson)]
pub struct Config {
    /// Only supports full path.
    #[nserde(default)]
    pub data_dir: String,
    /// Report generation settings
    #[nserde(default)]
    pub report: ReportConfigSection,
}

/// Empty strings and missing values fall back to the built-in defaults
#[derive(DeJson, SerJson)]
pub struct ReportConfigSection {
    #[nserde(default)]
    pub currency_symbol: String,
    /// Where PDF and spreadsheet files are written, current directory if empty
    #[nserde(default)]
    pub output_dir: String,
    /// Row cap for on-screen reports without a limit, 0 disables it
    #[nserde(default)]
    pub onscreen_limit: Option<usize>,
    #[nserde(default)]
    pub cheap_max_price: String,
    #[nserde(default)]
    pub premium_min_price: String,
    /// Identity stored on audit entries, $USER if empty
    #[nserde(default)]
    pub requested_by: String,
}

impl Default for ReportConfigSection {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY.to_string(),
            output_dir: String::new(),
            onscreen_limit: Some(DEFAULT_ONSCREEN_LIMIT),
            cheap_max_price: DEFAULT_CHEAP_MAX.to_string(),
            premium_min_price: DEFAULT_PREMIUM_MIN.to_string(),
            requested_by: String::new(),
        }
    }
}

fn home_dir() -> ReportResult<PathBuf> {
    home::home_dir().ok_or_else(|| ReportError::Config(String::from("cannot find home directory")))
}

/// Read the config file. A missing file means defaults.
pub fn get_config() -> ReportResult<Config> {
    let config_path = CONFIG_PATH.iter().fold(home_dir()?, |p, d| p.join(d));
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .map_err(|e| ReportError::Config(format!("Failed to read config file: {}", e)))?;
    parse_config(&config_content)
}

fn parse_config(content: &str) -> ReportResult<Config> {
    DeJson::deserialize_json(content)
        .map_err(|e| ReportError::Config(format!("Failed to parse config file: {}", e)))
}

/// Database file location, creating its directory when needed
pub fn get_data_path(config: &Config) -> ReportResult<PathBuf> {
    let data_dir = if config.data_dir.is_empty() {
        DEFAULT_DATA_DIR.iter().fold(home_dir()?, |p, d| p.join(d))
    } else {
        str_to_pathbuf(&config.data_dir)?
    };
    fs::create_dir_all(&data_dir)
        .map_err(|e| ReportError::Config(format!("Failed to create data directory: {}", e)))?;
    Ok(data_dir.join(DB_NAME))
}

fn str_to_pathbuf(dir_path: &str) -> ReportResult<PathBuf> {
    if dir_path.starts_with("~") {
        let mut path_buf = home_dir()?;
        if dir_path.len() > 2 && dir_path.starts_with("~/") {
            path_buf.push(&dir_path[2..]);
        }
        Ok(path_buf)
    } else if dir_path.starts_with("/") {
        Ok(PathBuf::from(dir_path))
    } else {
        Err(ReportError::Config(format!(
            "data directory must be absolute or home relative, and start with '~' or '/', it cannot be {}",
            dir_path
        )))
    }
}

fn parse_price(key: &str, value: &str, default: &str) -> ReportResult<Decimal> {
    let value = if value.trim().is_empty() { default } else { value.trim() };
    let price = Decimal::from_str(value)
        .map_err(|e| ReportError::Config(format!("{} must be a decimal amount, got '{}': {}", key, value, e)))?;
    if price.is_sign_negative() {
        return Err(ReportError::Config(format!("{} cannot be negative, got '{}'", key, value)));
    }
    Ok(price)
}

/// Typed pipeline settings from the `report` section
pub fn get_pipeline_settings(config: &Config) -> ReportResult<PipelineSettings> {
    let section = &config.report;

    let output_dir = match section.output_dir.trim() {
        "" => PathBuf::from("."),
        dir if dir.starts_with('~') || dir.starts_with('/') => str_to_pathbuf(dir)?,
        dir => PathBuf::from(dir),
    };

    let requested_by = if section.requested_by.trim().is_empty() {
        env::var("USER")
            .ok()
            .filter(|user| !user.is_empty())
            .unwrap_or_else(|| "local".to_string())
    } else {
        section.requested_by.trim().to_string()
    };

    Ok(PipelineSettings {
        currency_symbol: match section.currency_symbol.trim() {
            "" => DEFAULT_CURRENCY.to_string(),
            symbol => symbol.to_string(),
        },
        output_dir,
        onscreen_limit: section.onscreen_limit.unwrap_or(DEFAULT_ONSCREEN_LIMIT),
        price_tiers: PriceTiers {
            cheap_max: parse_price("cheap_max_price", &section.cheap_max_price, DEFAULT_CHEAP_MAX)?,
            premium_min: parse_price("premium_min_price", &section.premium_min_price, DEFAULT_PREMIUM_MIN)?,
        },
        requested_by,
    })
}
