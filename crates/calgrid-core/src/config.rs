use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::locale::Locale;
use crate::sync::{MonthSyncConfig, WeekSyncConfig};

const CONFIG_FILE: &str = "calgrid.toml";
const CONFIG_ENV_VAR: &str = "CALGRID_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First day of the display week, 0 = Sunday .. 6 = Saturday.
    pub first_day: u32,
    pub past_scroll_range: usize,
    pub future_scroll_range: usize,
    pub calendar_width: f64,
    pub calendar_height: f64,
    pub row_height: f64,
    /// Week-strip pages on each side of the center.
    pub num_pages: usize,
    pub animate_scroll: bool,
    pub static_header: bool,
    pub color: String,
    /// Optional `[locale]` table overriding the English display
    /// strings; omitted fields keep their defaults.
    pub locale: Option<Locale>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_day: 0,
            past_scroll_range: 50,
            future_scroll_range: 50,
            calendar_width: 360.0,
            calendar_height: 360.0,
            row_height: 46.0,
            num_pages: 50,
            animate_scroll: false,
            static_header: false,
            color: "on".to_string(),
            locale: None,
        }
    }
}

impl Config {
    /// Loads configuration from the first match of: an explicit
    /// override path, `$CALGRID_CONFIG`, `./calgrid.toml`, or the
    /// user config directory. A missing file means defaults; a file
    /// that exists but does not parse is an error.
    #[tracing::instrument(skip(override_path))]
    pub fn load(override_path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = resolve_config_path(override_path) else {
            warn!("no config path resolved; using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(file = %path.display(), "config file not found; using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path).with_context(|| {
            format!("failed reading config file {}", path.display())
        })?;
        let cfg: Self = toml::from_str(&raw).with_context(|| {
            format!("failed parsing config file {}", path.display())
        })?;
        cfg.validate()?;

        info!(
            file = %path.display(),
            first_day = cfg.first_day,
            past = cfg.past_scroll_range,
            future = cfg.future_scroll_range,
            "loaded config"
        );
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.first_day > 6 {
            return Err(anyhow!(
                "first_day must be 0..=6, got {}",
                self.first_day
            ));
        }
        if self.calendar_width <= 0.0 || self.calendar_height <= 0.0 {
            return Err(anyhow!("calendar dimensions must be positive"));
        }
        Ok(())
    }

    pub fn color_enabled(&self) -> anyhow::Result<bool> {
        match self.color.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => Ok(true),
            "off" | "no" | "false" | "0" => Ok(false),
            other => Err(anyhow!("invalid color setting: {other}")),
        }
    }

    pub fn month_sync(&self, horizontal: bool) -> MonthSyncConfig {
        MonthSyncConfig {
            past_scroll_range: self.past_scroll_range,
            future_scroll_range: self.future_scroll_range,
            calendar_width: self.calendar_width,
            calendar_height: self.calendar_height,
            row_height: self.row_height,
            first_day: self.first_day,
            horizontal,
            animate_scroll: self.animate_scroll,
            static_header: self.static_header,
        }
    }

    /// The configured locale, falling back to the English tables.
    pub fn display_locale(&self) -> Locale {
        self.locale.clone().unwrap_or_default()
    }

    pub fn week_sync(&self) -> WeekSyncConfig {
        WeekSyncConfig {
            num_pages: self.num_pages,
            page_width: self.calendar_width,
            first_day: self.first_day,
        }
    }
}

fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }

    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    if let Ok(dir) = std::env::current_dir() {
        let local = dir.join(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
    }

    dirs::config_dir().map(|dir| dir.join("calgrid").join("config.toml"))
}
