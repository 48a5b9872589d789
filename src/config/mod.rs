use serde::Deserialize;
use std::path::PathBuf;

use crate::geometry::DEFAULT_TOLERATED_ANGLE;
use crate::io::DEFAULT_TRACKS_DIR;

fn default_tracks_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TRACKS_DIR)
}
fn default_tolerated_angle() -> f64 {
    DEFAULT_TOLERATED_ANGLE
}
fn default_verbose() -> bool {
    false
}

/// Settings read from `trackutils.toml`
#[derive(Debug, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_tracks_dir")]
    pub tracks_dir: PathBuf,
    #[serde(default = "default_tolerated_angle")]
    pub tolerated_angle: f64,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Where to write the waypoint plot, if anywhere
    #[serde(default)]
    pub svg: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            tracks_dir: default_tracks_dir(),
            tolerated_angle: default_tolerated_angle(),
            verbose: default_verbose(),
            svg: None,
        }
    }
}

impl FileConfig {
    /// Load the first config file found in the usual locations
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match Self::parse(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
                    }
                }
            }
        }
        None
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("trackutils.toml"));
    paths.push(PathBuf::from(".trackutils.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("trackutils").join("config.toml"));
        paths.push(config_dir.join("trackutils.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".trackutils.toml"));
    }

    paths
}
