use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use spendmail_ingest::TimestampPolicy;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_spendmail_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub batch: BatchSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseSection {
    /// "strict" fails a message on a bad Date header, "lenient" zeroes it
    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
    pub path: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            path: PathBuf::from("expenses.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Parse workers running at once
    pub workers: usize,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendmail_home()?.join("config.toml"))
}

/// Load from `path`, or the default location. A missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
