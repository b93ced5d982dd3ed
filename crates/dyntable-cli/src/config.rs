// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use dyntable_app::{DEFAULT_ACTIVE_COLOR, DEFAULT_INACTIVE_COLOR, IndicatorPalette, SortStrategy};
use serde::Deserialize;
use simplelog::LevelFilter;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "dyntable";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "DYNTABLE_CONFIG_PATH";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub sort: Sort,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            sort: Sort::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub inactive_color: Option<String>,
    pub active_color: Option<String>,
    pub show_hidden_rows: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            inactive_color: Some(DEFAULT_INACTIVE_COLOR.to_owned()),
            active_color: Some(DEFAULT_ACTIVE_COLOR.to_owned()),
            show_hidden_rows: Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sort {
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub path: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            path: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [ui], [sort], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(strategy) = &self.sort.strategy
            && SortStrategy::parse(strategy).is_none()
        {
            bail!(
                "sort.strategy in {} must be \"stable\" or \"relocate\", got {strategy:?}",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            parse_level(level)
                .with_context(|| format!("invalid log.level in {}", path.display()))?;
        }

        for (key, color) in [
            ("ui.inactive_color", &self.ui.inactive_color),
            ("ui.active_color", &self.ui.active_color),
        ] {
            if let Some(color) = color
                && !is_plain_css_color(color)
            {
                bail!(
                    "{key} in {} must be a CSS color name or #hex value, got {color:?}",
                    path.display()
                );
            }
        }

        Ok(())
    }

    pub fn palette(&self) -> IndicatorPalette {
        IndicatorPalette {
            inactive: self
                .ui
                .inactive_color
                .clone()
                .unwrap_or_else(|| DEFAULT_INACTIVE_COLOR.to_owned()),
            active: self
                .ui
                .active_color
                .clone()
                .unwrap_or_else(|| DEFAULT_ACTIVE_COLOR.to_owned()),
        }
    }

    pub fn show_hidden_rows(&self) -> bool {
        self.ui.show_hidden_rows.unwrap_or(false)
    }

    pub fn sort_strategy(&self) -> SortStrategy {
        self.sort
            .strategy
            .as_deref()
            .and_then(SortStrategy::parse)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        parse_level(self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => {
                let cache_root = dirs::cache_dir().ok_or_else(|| {
                    anyhow!("cannot resolve cache directory; set [log].path in the config")
                })?;
                Ok(cache_root.join(APP_NAME).join("dyntable.log"))
            }
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# dyntable config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# CSS colors for sort indicators\ninactive_color = \"{}\"\nactive_color = \"{}\"\n# Terminal viewer: show filtered-out rows dimmed\nshow_hidden_rows = false\n\n[sort]\n# \"stable\" or \"relocate\"\nstrategy = \"{}\"\n\n[log]\n# off, error, warn, info, debug, trace\nlevel = \"{}\"\n# Optional. Default is the platform cache dir (for example ~/.cache/dyntable/dyntable.log)\n# path = \"/absolute/path/to/dyntable.log\"\n",
            path.display(),
            DEFAULT_INACTIVE_COLOR,
            DEFAULT_ACTIVE_COLOR,
            SortStrategy::default().as_str(),
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter> {
    raw.parse::<LevelFilter>().map_err(|_| {
        anyhow!("unknown log level {raw:?}; use one of: off, error, warn, info, debug, trace")
    })
}

/// Rejects values that could break out of an inline `style` attribute.
fn is_plain_css_color(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|ch| ch.is_ascii_hexdigit());
    }
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphabetic())
}
