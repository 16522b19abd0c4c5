//! Configuration management.

use anyhow::{bail, Context, Result};
use monoframe_core::{Buttons, Error as CoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::scenes;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target frames per second (1-255)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Only idle when more than this many milliseconds remain before the
    /// next frame
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_ms: u64,

    /// Stop after this many frames (0 runs until interrupted)
    #[serde(default)]
    pub frames: u64,

    /// Scene to play
    #[serde(default = "default_scene")]
    pub scene: String,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
}

/// Where presented frames go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Redraw the frame in the terminal with half-block characters
    #[default]
    Terminal,
    /// Write numbered PNG snapshots
    Png,
    /// Discard frames
    #[serde(rename = "none")]
    Null,
}

/// Output sink configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Sink type
    #[serde(default)]
    pub kind: OutputKind,

    /// Snapshot directory (png only)
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Integer upscale factor (png only)
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Keep every n-th frame (png only)
    #[serde(default = "default_every")]
    pub every: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: OutputKind::default(),
            dir: default_output_dir(),
            scale: default_scale(),
            every: default_every(),
        }
    }
}

/// Simulated input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Buttons reported as held for the whole run ("left", "a", ...)
    #[serde(default)]
    pub held: Vec<String>,
}

impl InputConfig {
    /// Resolves the held button names to a mask.
    pub fn buttons(&self) -> Result<Buttons> {
        let mut mask = Buttons::NONE;
        for name in &self.held {
            match Buttons::from_name(name) {
                Some(button) => mask |= button,
                None => bail!("Unknown button: {}", name),
            }
        }
        Ok(mask)
    }
}

// Default value functions
fn default_frame_rate() -> u32 {
    60
}

fn default_idle_threshold() -> u64 {
    1
}

fn default_scene() -> String {
    "shapes".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

fn default_scale() -> u32 {
    4
}

fn default_every() -> u64 {
    1
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }

    /// Checks values the types alone cannot.
    pub fn validate(&self) -> Result<()> {
        if !(1..=255).contains(&self.frame_rate) {
            return Err(CoreError::InvalidFrameRate(self.frame_rate).into());
        }
        scenes::create_scene(&self.scene)?;
        if self.output.scale == 0 {
            bail!("Output scale must be at least 1");
        }
        if self.output.every == 0 {
            bail!("Output interval must be at least 1");
        }
        self.input.buttons()?;
        Ok(())
    }

    /// Frame rate as the scheduler takes it. Only meaningful after
    /// [`Config::validate`].
    pub fn frame_rate_u8(&self) -> u8 {
        self.frame_rate.clamp(1, 255) as u8
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            idle_threshold_ms: default_idle_threshold(),
            frames: 0,
            scene: default_scene(),
            output: OutputConfig::default(),
            input: InputConfig::default(),
        }
    }
}
