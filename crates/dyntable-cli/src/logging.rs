// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use simplelog::{LevelFilter, WriteLogger};
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::config::Config;

/// Sends `log` records to the configured file. The terminal viewer owns
/// stdout and stderr, so nothing is logged to the console.
pub fn init(config: &Config) -> Result<()> {
    let level = config.log_level()?;
    if level == LevelFilter::Off {
        return Ok(());
    }
    let path = config.log_path()?;
    init_file(&path, level)
}

fn init_file(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {}; set [log].path or [log].level = \"off\"",
                path.display()
            )
        })?;
    WriteLogger::init(level, simplelog::Config::default(), file)
        .context("install file logger")?;
    log::debug!("logging to {} at {level}", path.display());
    Ok(())
}
