//! View configuration loaded from `data/view_config.json`.
//!
//! Every field has a default, so a partial file only overrides what it
//! names. The enable flags only decide which curves a chart shows; the
//! history always records every category.

use crate::{
    chart::{ChartRequest, HistoryWindow},
    hit_test::TOOLTIP_TOLERANCE,
    history::DEFAULT_MAX_POINTS,
    resource::{Direction, EnabledCategories},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportFlags {
    pub goods:    bool,
    pub forestry: bool,
    pub farming:  bool,
    pub ore:      bool,
    pub oil:      bool,
    pub mail:     bool,
}

impl Default for ImportFlags {
    fn default() -> Self {
        Self {
            goods:    true,
            forestry: true,
            farming:  true,
            ore:      true,
            oil:      true,
            mail:     true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFlags {
    pub goods:    bool,
    pub forestry: bool,
    pub farming:  bool,
    pub ore:      bool,
    pub oil:      bool,
    pub mail:     bool,
    pub fish:     bool,
}

impl Default for ExportFlags {
    fn default() -> Self {
        Self {
            goods:    true,
            forestry: true,
            farming:  true,
            ore:      true,
            oil:      true,
            mail:     true,
            fish:     true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub imports:           ImportFlags,
    pub exports:           ExportFlags,
    pub default_direction: Direction,
    pub default_window:    HistoryWindow,
    pub max_points:        usize,
    pub tooltip_tolerance: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            imports:           ImportFlags::default(),
            exports:           ExportFlags::default(),
            default_direction: Direction::Import,
            default_window:    HistoryWindow::All,
            max_points:        DEFAULT_MAX_POINTS,
            tooltip_tolerance: TOOLTIP_TOLERANCE,
        }
    }
}

impl ViewConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("{} not found; using default view config", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        anyhow::ensure!(config.max_points > 0, "max_points must be at least 1");
        anyhow::ensure!(
            config.tooltip_tolerance > 0.0 && config.tooltip_tolerance < 1.0,
            "tooltip_tolerance must lie in (0, 1), got {}",
            config.tooltip_tolerance
        );
        Ok(config)
    }

    /// Flags in snapshot slot order.
    pub fn enabled(&self) -> EnabledCategories {
        let i = &self.imports;
        let e = &self.exports;
        EnabledCategories([
            i.goods, i.forestry, i.farming, i.ore, i.oil, i.mail,
            e.goods, e.forestry, e.farming, e.ore, e.oil, e.mail, e.fish,
        ])
    }

    /// The chart request a freshly opened panel starts with.
    pub fn chart_request(&self) -> ChartRequest {
        ChartRequest {
            direction:  self.default_direction,
            window:     self.default_window,
            enabled:    self.enabled(),
            max_points: self.max_points,
        }
    }
}
