// Haze Engine Core Configuration
// Contains engine configuration structures and settings

use bevy::prelude::*;
use serde::{Serialize, Deserialize};
use std::path::Path;
use thiserror::Error;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EngineConfig {
    pub engine_name: String,
    pub window: WindowConfig,
    pub rendering: RenderingConfig,
    pub logging_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_name: "Haze Engine".to_string(),
            window: WindowConfig::default(),
            rendering: RenderingConfig::default(),
            logging_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Haze Engine".to_string(),
            width: 1280.0,
            height: 720.0,
            vsync: true,
        }
    }
}

/// Renderer settings consumed by the fog subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Hardware overbright shift; fog colors are scaled down to compensate.
    pub overbright_bits: u32,
    /// Procedural far clip distance before fog shortens it.
    pub far_clip: f32,
    /// Log the fog/far clip numbers every frame.
    pub fog_speeds: bool,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            overbright_bits: 0,
            far_clip: 8192.0,
            fog_speeds: false,
        }
    }
}

impl RenderingConfig {
    /// Light intensity multiplier applied to fog colors.
    pub fn identity_light(&self) -> f32 {
        1.0 / (1u32 << self.overbright_bits.min(4)) as f32
    }
}

/// Logging level settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for bevy::log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => bevy::log::Level::ERROR,
            LogLevel::Warn => bevy::log::Level::WARN,
            LogLevel::Info => bevy::log::Level::INFO,
            LogLevel::Debug => bevy::log::Level::DEBUG,
            LogLevel::Trace => bevy::log::Level::TRACE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }
}
