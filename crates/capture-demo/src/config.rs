use core::time::Duration;
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use capturable::PixelFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::scene::Booking;

const FILE_NAME: &str = "capture-demo.toml";

/// User configuration for the demo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Format the ticket is captured in.
    pub pixel_format: PixelFormat,

    /// Time between paint passes when nothing requests one.
    pub frame_interval_ms: u64,

    /// Number of times the preview button is pressed.
    pub captures: u32,

    /// Where captures are saved, defaults to the picture directory.
    pub output_dir: Option<PathBuf>,

    /// If successful captures are written to disk.
    pub save_captures: bool,

    /// Size the ticket is laid out at.
    pub ticket_size: [u32; 2],

    /// The booking shown on the ticket.
    pub booking_id: String,

    /// Seats on the booking.
    pub seats: u32,
}

impl Config {
    /// Load the config from the config directory.
    ///
    /// `Ok(None)` if there is no config file yet.
    pub fn try_load() -> Result<Option<Self>, Error> {
        Self::try_load_from(&Self::file_path())
    }

    /// Load the config from `path`, `Ok(None)` if the file does not exist.
    pub fn try_load_from(path: &Path) -> Result<Option<Self>, Error> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(Error::Read(error)),
        };

        let config = toml::from_str(&contents)?;
        Ok(Some(config))
    }

    /// Write the config to the config directory.
    pub fn save(&self) -> Result<(), Error> {
        self.save_to(&Self::file_path())
    }

    /// Write the config to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string.as_bytes()).map_err(Error::Write)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Path of the config file.
    pub fn file_path() -> PathBuf {
        config_dir().join(FILE_NAME)
    }

    /// The configured frame interval.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// The booking described by the config.
    pub fn booking(&self) -> Booking {
        Booking {
            id: self.booking_id.clone(),
            seats: self.seats,
        }
    }

    /// Where captures should be written.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(capture_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::default(),
            frame_interval_ms: 16,
            captures: 1,
            output_dir: None,
            save_captures: true,
            ticket_size: [360, 480],
            booking_id: Booking::default().id,
            seats: Booking::default().seats,
        }
    }
}

/// Path to the config directory, falling back to the working directory.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("Capture Demo"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default directory for saved captures.
pub fn capture_dir() -> PathBuf {
    dirs::picture_dir()
        .map(|dir| dir.join("Captures"))
        .unwrap_or_else(|| PathBuf::from("captures"))
}

/// Create the config directory if it does not exist.
pub fn create_config_dir() -> io::Result<()> {
    fs::create_dir_all(config_dir())
}

/// Error variants from loading or saving the config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The config file exists but could not be read.
    #[error("Could not read the config file:\n{0}")]
    Read(#[source] io::Error),

    /// The config file could not be written.
    #[error("Could not write the config file:\n{0}")]
    Write(#[source] io::Error),

    /// The config file is not valid.
    #[error("The config file is invalid:\n{0}")]
    Deserialize(#[from] toml::de::Error),

    /// The config could not be serialized.
    #[error("Could not serialize the config:\n{0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use capturable::PixelFormat;

    use super::Config;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(Config::try_load_from(&path).unwrap().is_none());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            pixel_format: PixelFormat::RgbaF16,
            captures: 3,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::try_load_from(&path).unwrap(), Some(config));
    }

    #[test]
    fn partial_file_uses_defaults() {
        let config: Config = toml::from_str("pixel_format = \"alpha8\"\ncaptures = 2\n").unwrap();

        assert_eq!(config.pixel_format, PixelFormat::Alpha8);
        assert_eq!(config.captures, 2);
        assert_eq!(config.frame_interval_ms, Config::default().frame_interval_ms);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "captures = \"many\"").unwrap();

        assert!(Config::try_load_from(&path).is_err());
    }
}
