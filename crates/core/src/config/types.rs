//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::invoker::InvokerConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Album/orchestration settings.
    #[serde(default)]
    pub album: AlbumSettings,

    /// External image tool settings.
    #[serde(default)]
    pub invoker: InvokerConfig,
}

/// Settings controlling the album run itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumSettings {
    /// Maximum simultaneously running image workers.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Thumbnail size as a percentage of the original.
    #[serde(default = "default_thumbnail_percent")]
    pub thumbnail_percent: u8,

    /// Medium-size image as a percentage of the original.
    #[serde(default = "default_medium_percent")]
    pub medium_percent: u8,

    /// Path of the generated gallery page.
    #[serde(default = "default_page_path")]
    pub page_path: PathBuf,

    /// Directory receiving the derived image files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_max_concurrent() -> usize {
    3
}

fn default_thumbnail_percent() -> u8 {
    10
}

fn default_medium_percent() -> u8 {
    25
}

fn default_page_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AlbumSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            thumbnail_percent: default_thumbnail_percent(),
            medium_percent: default_medium_percent(),
            page_path: default_page_path(),
            output_dir: default_output_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AlbumSettings::default();
        assert_eq!(settings.max_concurrent, 3);
        assert_eq!(settings.thumbnail_percent, 10);
        assert_eq!(settings.medium_percent, 25);
        assert_eq!(settings.page_path, PathBuf::from("index.html"));
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.album.max_concurrent, 3);
        assert_eq!(config.invoker.magick_path, PathBuf::from("magick"));
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            [album]
            max_concurrent = 5
            thumbnail_percent = 15
            medium_percent = 40
            page_path = "gallery.html"
            output_dir = "/tmp/out"

            [invoker]
            magick_path = "/usr/bin/magick"
            timeout_secs = 120
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.album.max_concurrent, 5);
        assert_eq!(config.album.thumbnail_percent, 15);
        assert_eq!(config.album.page_path, PathBuf::from("gallery.html"));
        assert_eq!(config.invoker.timeout_secs, 120);
    }
}
