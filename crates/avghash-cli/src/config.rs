use anyhow::{Context, Result, bail};
use avghash::DEFAULT_SIDE;
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What the tool does with its input images.
#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Print the 64-bit code and the fingerprint of every input image
    #[default]
    Hash,
    /// Compare the first two input images and print their similarity
    Diff,
    /// Resample the first input image to a square and save it
    Scale,
    /// Convert the first input image to grayscale and save it
    Gray,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    /// Side length used by `scale`.
    pub side: u32,
    /// Side length images are reduced to before fingerprinting.
    /// Anything other than 8 yields a fingerprint that does not fit the 64-bit code.
    pub hash_side: u32,
    /// Output file for `scale` and `gray`.
    pub output: PathBuf,
    /// Print reports as JSON instead of text.
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Hash,
            side: DEFAULT_SIDE,
            hash_side: DEFAULT_SIDE,
            output: PathBuf::from("output.jpg"),
            json: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// `<platform config dir>/avghash/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "avghash").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.side == 0 {
            bail!("side shall be greater than 0");
        }
        if self.hash_side == 0 {
            bail!("hash_side shall be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = Config::from_toml_str(
            r#"
            mode = "diff"
            side = 32
            hash_side = 16
            output = "thumb.png"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Diff);
        assert_eq!(config.side, 32);
        assert_eq!(config.hash_side, 16);
        assert_eq!(config.output, PathBuf::from("thumb.png"));
        assert!(config.json);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_toml_str("mode = \"gray\"").unwrap();
        assert_eq!(config.mode, Mode::Gray);
        assert_eq!(config.side, 8);
        assert_eq!(config.hash_side, 8);
        assert_eq!(config.output, PathBuf::from("output.jpg"));
        assert!(!config.json);

        assert_eq!(Config::from_toml_str("").unwrap(), Config::default_config());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Config::from_toml_str("mode = \"blur\"").is_err());
    }

    #[test]
    fn test_zero_side_is_rejected() {
        assert!(Config::from_toml_str("side = 0").is_err());
        assert!(Config::from_toml_str("hash_side = 0").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("avghash-no-such-config.toml");
        assert!(Config::load_from_file(missing).is_err());
    }
}
