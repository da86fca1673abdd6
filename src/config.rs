// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cooldown::DEFAULT_COOLDOWN_SECS;
use crate::insights::InsightParams;
use crate::store::{INSIGHT_MIN_CONFIDENCE, RECENT_MIN_CONFIDENCE};

pub const DEFAULT_CONFIG_PATH: &str = "config/signals.toml";

pub const ENV_CONFIG_PATH: &str = "SIGNALS_CONFIG_PATH";
pub const ENV_COOLDOWN_SECS: &str = "SIGNALS_COOLDOWN_SECS";
pub const ENV_RECENT_MIN_CONFIDENCE: &str = "SIGNALS_RECENT_MIN_CONFIDENCE";
pub const ENV_INSIGHT_MIN_CONFIDENCE: &str = "SIGNALS_INSIGHT_MIN_CONFIDENCE";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cooldown: CooldownCfg,
    pub thresholds: ThresholdsCfg,
    pub stats: StatsCfg,
    pub insights: InsightParams,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CooldownCfg {
    pub window_secs: i64,
}

impl Default for CooldownCfg {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_COOLDOWN_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdsCfg {
    /// Floor for the recent-activity list.
    pub recent_min_confidence: f32,
    /// Floor for insight input.
    pub insight_min_confidence: f32,
}

impl Default for ThresholdsCfg {
    fn default() -> Self {
        Self {
            recent_min_confidence: RECENT_MIN_CONFIDENCE,
            insight_min_confidence: INSIGHT_MIN_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsCfg {
    pub recent_limit: usize,
    pub insight_history_limit: usize,
}

impl Default for StatsCfg {
    fn default() -> Self {
        Self {
            recent_limit: 50,
            insight_history_limit: 500,
        }
    }
}

impl AppConfig {
    /// Parse a TOML file; missing sections/keys fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg: AppConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolve the config:
    /// 1) $SIGNALS_CONFIG_PATH (must exist)
    /// 2) config/signals.toml if present
    /// 3) built-in defaults
    ///
    /// then apply env overrides.
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
            if pb.exists() {
                Self::load_from(&pb)?
            } else {
                tracing::debug!(target: "config", "no config file, using defaults");
                Self::default()
            }
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = std::env::var(ENV_COOLDOWN_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
        {
            self.cooldown.window_secs = secs;
        }
        if let Some(v) = parse_confidence_env(std::env::var(ENV_RECENT_MIN_CONFIDENCE).ok()) {
            self.thresholds.recent_min_confidence = v;
        }
        if let Some(v) = parse_confidence_env(std::env::var(ENV_INSIGHT_MIN_CONFIDENCE).ok()) {
            self.thresholds.insight_min_confidence = v;
        }
        self.sanitized()
    }

    fn sanitized(mut self) -> Self {
        self.cooldown.window_secs = self.cooldown.window_secs.max(0);
        self.thresholds.recent_min_confidence =
            self.thresholds.recent_min_confidence.clamp(0.0, 1.0);
        self.thresholds.insight_min_confidence =
            self.thresholds.insight_min_confidence.clamp(0.0, 1.0);
        if self.insights.pattern_window == 0 {
            self.insights.pattern_window = InsightParams::default().pattern_window;
        }
        self
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_confidence_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}
