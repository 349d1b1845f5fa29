use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Dashboard settings. Every field has a default, so an absent or partial
/// `dashboard.json` is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset read once at startup.
    pub dataset_path: PathBuf,
    pub title: String,
    /// Bars shown in each product performance chart.
    pub product_top_n: usize,
    /// Bars shown in the state and city demography charts.
    pub demographic_top_n: usize,
    pub caption: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("all_dataset.csv"),
            title: "Kelly Collection Dashboard".to_string(),
            product_top_n: 5,
            demographic_top_n: 8,
            caption: "Copyright (c) Kelly 2024".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read the optional config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using default settings", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }
}
