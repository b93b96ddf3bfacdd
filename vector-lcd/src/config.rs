//! Pipeline configuration
//!
//! Every field defaults to the constants of the shipping hardware, so an
//! empty (or absent) config file reproduces stock behaviour. A TOML file
//! only needs the keys it changes:
//!
//! ```toml
//! [spi]
//! device = "/dev/spidev0.0"
//!
//! [output]
//! scaled = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LcdError, Result};

/// Transfer unit used when the spidev module does not report one
pub const DEFAULT_MAX_TRANSFER: usize = 4096;

/// SPI transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiSettings {
    /// Character device of the panel's SPI bus
    pub device: PathBuf,
    /// Module parameter reporting the largest single write spidev accepts
    pub bufsiz_path: PathBuf,
    /// Fallback when `bufsiz_path` is missing or unusable
    pub default_max_transfer: usize,
    /// Bus clock; `None` keeps whatever the kernel configured
    pub speed_hz: Option<u32>,
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/spidev1.0"),
            bufsiz_path: PathBuf::from("/sys/module/spidev/parameters/bufsiz"),
            default_max_transfer: DEFAULT_MAX_TRANSFER,
            speed_hz: None,
        }
    }
}

/// GPIO pin assignments (sysfs numbering)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpioSettings {
    pub sysfs_root: PathBuf,
    /// Data/command select, shared by both controllers
    pub dc_pin: u32,
    pub santek_reset_pin: u32,
    pub midas_reset_pin: u32,
}

impl Default for GpioSettings {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from("/sys/class/gpio"),
            dc_pin: 110,
            santek_reset_pin: 55,
            midas_reset_pin: 96,
        }
    }
}

/// Hardware revision probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            program: "emr-cat".to_string(),
            args: vec!["v".to_string()],
        }
    }
}

/// Output thread settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// SCHED_FIFO priority requested for the output thread
    pub priority: i32,
    /// Nearest-neighbour scaling instead of cropping (Santek only)
    pub scaled: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            priority: 60,
            scaled: false,
        }
    }
}

/// Producer pacing, used by frame sources driving the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub frame_time_us: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            frame_time_us: 16_750,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcdConfig {
    pub spi: SpiSettings,
    pub gpio: GpioSettings,
    pub probe: ProbeSettings,
    pub output: OutputSettings,
    pub source: SourceSettings,
}

impl LcdConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| LcdError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_content(&content, path)
    }

    /// Parse TOML content; `path` is only used in error messages
    pub fn parse_content(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| LcdError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override the scaling choice (command line wins over the file)
    pub fn with_scaled(mut self, scaled: bool) -> Self {
        self.output.scaled = scaled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_hardware() {
        let config = LcdConfig::default();
        assert_eq!(config.spi.device, PathBuf::from("/dev/spidev1.0"));
        assert_eq!(config.spi.default_max_transfer, 4096);
        assert_eq!(config.gpio.dc_pin, 110);
        assert_eq!(config.gpio.santek_reset_pin, 55);
        assert_eq!(config.gpio.midas_reset_pin, 96);
        assert_eq!(config.probe.program, "emr-cat");
        assert_eq!(config.output.priority, 60);
        assert!(!config.output.scaled);
        assert_eq!(config.source.frame_time_us, 16_750);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let content = r#"
[spi]
device = "/dev/spidev0.0"

[output]
scaled = true
"#;
        let config = LcdConfig::parse_content(content, Path::new("test")).unwrap();

        assert_eq!(config.spi.device, PathBuf::from("/dev/spidev0.0"));
        assert_eq!(config.spi.default_max_transfer, 4096);
        assert!(config.output.scaled);
        assert_eq!(config.output.priority, 60);
        assert_eq!(config.gpio, GpioSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[gpio]\ndc_pin = 7").unwrap();

        let config = LcdConfig::load(file.path()).unwrap();
        assert_eq!(config.gpio.dc_pin, 7);
        assert_eq!(config.gpio.santek_reset_pin, 55);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = LcdConfig::parse_content("[spi\n", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, LcdError::ConfigParse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file() {
        let err = LcdConfig::load(Path::new("/nonexistent/vector-lcd.toml")).unwrap_err();
        assert!(matches!(err, LcdError::ConfigRead { .. }));
    }

    #[test]
    fn test_cli_override() {
        let config = LcdConfig::default().with_scaled(true);
        assert!(config.output.scaled);
    }
}
