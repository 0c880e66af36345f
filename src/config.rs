//! Server settings from the environment.

use crate::logic::PointsConfig;
use crate::models::TournamentError;
use std::path::PathBuf;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// `HOST`, `PORT` and `POINTS_TABLES` (path to a JSON points config).
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub points_tables: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            points_tables: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT {:?}, using {}", p, default_port());
                default_port()
            }),
            None => default_port(),
        };
        Self {
            host: lookup("HOST").unwrap_or_else(default_host),
            port,
            points_tables: lookup("POINTS_TABLES").map(PathBuf::from),
        }
    }

    /// Points tables from `POINTS_TABLES`, or the built-in defaults.
    pub fn points_config(&self) -> Result<PointsConfig, TournamentError> {
        match &self.points_tables {
            Some(path) => PointsConfig::load(path),
            None => Ok(PointsConfig::default()),
        }
    }
}
