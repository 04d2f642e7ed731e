//! Session configuration, optionally loaded from a TOML file.
//!
//! All fields default to the reference tuning below, so a partial TOML
//! can override just the values it names. Validation is fail-fast:
//! [`Config::validate`] rejects any combination that would produce a
//! degenerate wave before the game is constructed.

use std::path::Path;

use log::warn;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("fps must be at least 1")]
    ZeroFps,
    #[error("{wave} vertical speed {v} yields an empty window (need fps/v >= 1)")]
    EmptyWindow { wave: &'static str, v: f64 },
    #[error("avatar speed must be non-negative, got {0}")]
    NegativeAvatarSpeed(f64),
    #[error("target rate {rate} must lie in (0, fps={fps}]")]
    RateOutOfRange { rate: f64, fps: u32 },
    #[error("target width must be positive, got {0}")]
    NonPositiveWidth(f64),
    #[error("bullet reload {rload}s is under one frame at fps={fps}")]
    ReloadTooShort { rload: f64, fps: u32 },
    #[error("hit timeout must be non-negative, got {0}")]
    NegativeTimeout(f64),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Starting horizontal position in x-units.
    pub x: f64,
    /// Vertical position in y-units (fixed; sits just below the field).
    pub y: f64,
    /// Horizontal speed in x-units per second.
    pub v: f64,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        AvatarConfig { x: 0.5, y: -0.05, v: 0.125 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Vertical speed in y-units per second.
    pub v: f64,
    /// Average number of targets spawned per second.
    pub rate: f64,
    /// Target width in x-units; half of it is the collision tolerance.
    pub width: f64,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        TargetsConfig { v: 0.1, rate: 1.0, width: 0.04 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulletsConfig {
    /// Vertical speed in y-units per second.
    pub v: f64,
    /// Reload time between consecutive bullets, in seconds.
    pub rload: f64,
}

impl Default for BulletsConfig {
    fn default() -> Self {
        BulletsConfig { v: 0.25, rload: 0.4 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HitsConfig {
    /// Time a hit marker stays visible, in seconds.
    pub timeout: f64,
}

impl Default for HitsConfig {
    fn default() -> Self {
        HitsConfig { timeout: 2.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fps: u32,
    pub avatar: AvatarConfig,
    pub targets: TargetsConfig,
    pub bullets: BulletsConfig,
    pub hits: HitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fps: 25,
            avatar: AvatarConfig::default(),
            targets: TargetsConfig::default(),
            bullets: BulletsConfig::default(),
            hits: HitsConfig::default(),
        }
    }
}

impl Config {
    /// Read a TOML file and merge it over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&text)?;
        Ok(cfg)
    }

    /// Window size (frames of exposure) for a wave of vertical speed `v`.
    pub fn window(&self, v: f64) -> usize {
        (self.fps as f64 / v) as usize
    }

    /// Reload interval in whole frames.
    pub fn reload_frames(&self) -> usize {
        (self.bullets.rload * self.fps as f64) as usize
    }

    /// Hit-marker lifetime in whole frames.
    pub fn timeout_frames(&self) -> u32 {
        (self.hits.timeout * self.fps as f64) as u32
    }

    /// Reject any configuration that would break a wave precondition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.avatar.v < 0.0 {
            return Err(ConfigError::NegativeAvatarSpeed(self.avatar.v));
        }
        for (wave, v) in [("targets", self.targets.v), ("bullets", self.bullets.v)] {
            if !(v > 0.0) || self.window(v) < 1 {
                return Err(ConfigError::EmptyWindow { wave, v });
            }
            if self.window(v) < 2 {
                warn!("{wave}: window of a single frame, sprites flash by");
            }
        }
        if !(self.targets.rate > 0.0) || self.targets.rate > self.fps as f64 {
            return Err(ConfigError::RateOutOfRange { rate: self.targets.rate, fps: self.fps });
        }
        if !(self.targets.width > 0.0) {
            return Err(ConfigError::NonPositiveWidth(self.targets.width));
        }
        if self.reload_frames() < 1 {
            return Err(ConfigError::ReloadTooShort { rload: self.bullets.rload, fps: self.fps });
        }
        if self.hits.timeout < 0.0 {
            return Err(ConfigError::NegativeTimeout(self.hits.timeout));
        }
        Ok(())
    }
}
