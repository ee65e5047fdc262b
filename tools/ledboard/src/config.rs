//! Configuration file (ledboard.toml) support
//!
//! Every key is optional; missing keys fall back to the board defaults.
//! Command-line flags override whatever the file sets (see [`Overrides`]).
//! A relative `display.font` path is taken relative to the directory the
//! config file lives in.
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 38400
//!
//! [timing]
//! row_shift = 0.05
//! col_shift = 0.01
//! row_in_hold = 1.0
//! row_out_hold = 1.0
//! hold_time = 0.0
//!
//! [display]
//! truncate = false
//! row_shift_in = true
//! row_shift_out = true
//! font = "fonts/wide.txt"
//! ```

use crate::render::RenderOptions;
use crate::sink::{DEFAULT_PORT, NOMINAL_BAUD};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub serial: SerialSection,
    pub timing: TimingSection,
    pub display: DisplaySection,
}

/// `[serial]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialSection {
    pub port: String,
    pub baud_rate: u32,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: NOMINAL_BAUD,
        }
    }
}

/// `[timing]` section, all values in seconds
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSection {
    pub row_shift: f64,
    pub col_shift: f64,
    pub row_in_hold: f64,
    pub row_out_hold: f64,
    pub hold_time: f64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            row_shift: 0.05,
            col_shift: 0.01,
            row_in_hold: 1.0,
            row_out_hold: 1.0,
            hold_time: 0.0,
        }
    }
}

/// `[display]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    pub truncate: bool,
    pub row_shift_in: bool,
    pub row_shift_out: bool,
    pub font: Option<PathBuf>,
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        if let (Some(font), Some(dir)) = (&config.display.font, path.parent()) {
            if font.is_relative() {
                config.display.font = Some(dir.join(font));
            }
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.render_options()?;
        if config.serial.baud_rate == 0 {
            bail!("serial.baud_rate must be positive");
        }
        Ok(config)
    }

    /// Render options described by this configuration
    pub fn render_options(&self) -> Result<RenderOptions> {
        let t = &self.timing;
        Ok(RenderOptions {
            truncate: self.display.truncate,
            row_shift_in: self.display.row_shift_in,
            row_shift_out: self.display.row_shift_out,
            row_shift: seconds("timing.row_shift", t.row_shift)?,
            col_shift: seconds("timing.col_shift", t.col_shift)?,
            row_in_hold: seconds("timing.row_in_hold", t.row_in_hold)?,
            row_out_hold: seconds("timing.row_out_hold", t.row_out_hold)?,
            hold_time: seconds("timing.hold_time", t.hold_time)?,
        })
    }
}

/// Command-line settings layered over the config file
///
/// Switches can only turn a feature on; delays replace the configured value
/// when given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub truncate: bool,
    pub row_shift_in: bool,
    pub row_shift_out: bool,
    pub row_shift: Option<f64>,
    pub col_shift: Option<f64>,
    pub row_in_hold: Option<f64>,
    pub row_out_hold: Option<f64>,
    pub hold_time: Option<f64>,
}

impl RenderOptions {
    /// Apply command-line overrides on top of these options
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self> {
        self.truncate |= overrides.truncate;
        self.row_shift_in |= overrides.row_shift_in;
        self.row_shift_out |= overrides.row_shift_out;

        let delays = [
            ("--row-shift", overrides.row_shift, &mut self.row_shift),
            ("--col-shift", overrides.col_shift, &mut self.col_shift),
            ("--row-in-hold", overrides.row_in_hold, &mut self.row_in_hold),
            ("--row-out-hold", overrides.row_out_hold, &mut self.row_out_hold),
            ("--hold-time", overrides.hold_time, &mut self.hold_time),
        ];
        for (name, value, slot) in delays {
            if let Some(v) = value {
                *slot = seconds(name, v)?;
            }
        }

        Ok(self)
    }
}

/// Convert a delay given in seconds, rejecting negative and non-finite values
///
/// Rounds to the nearest nanosecond so decimal settings like `0.05` come
/// out exact.
pub fn seconds(name: &str, value: f64) -> Result<Duration> {
    let nanos = (value * 1e9).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        bail!("{} must be a non-negative number of seconds, got {}", name, value);
    }
    Ok(Duration::from_nanos(nanos as u64))
}
