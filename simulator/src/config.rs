//! Simulator settings: command line, optional TOML file, resolved result.
//!
//! Precedence is CLI flag, then file value, then built-in default. The file
//! has two optional tables:
//!
//! ```toml
//! [engine]
//! theme = "ember"
//! scale = 1.5
//! needle = "beam"
//! simulation = "releasable"
//!
//! [link]
//! host = "192.168.4.1"
//! port = 5000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use cluster_common::EngineConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::transport::Endpoint;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PATH: &str = "/ws";

/// Vehicle telemetry cluster, desktop build.
#[derive(Parser, Debug, Default)]
#[command(name = "cluster", version, about)]
pub struct Args {
    /// Backend host
    #[arg(long)]
    pub host: Option<String>,

    /// Backend port
    #[arg(long)]
    pub port: Option<u16>,

    /// Use wss:// instead of ws://
    #[arg(long)]
    pub secure: bool,

    /// Websocket path on the backend
    #[arg(long)]
    pub path: Option<String>,

    /// Theme name, or a query string such as `theme=ember`
    #[arg(long)]
    pub theme: Option<String>,

    /// Display scale factor
    #[arg(long)]
    pub scale: Option<f32>,

    /// Path to a TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Generate random telemetry locally instead of connecting
    #[arg(long)]
    pub demo: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// `[link]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub secure: Option<bool>,
    pub path: Option<String>,
    pub demo: Option<bool>,
}

/// Whole settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub engine: EngineConfig,
    pub link: LinkFile,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Everything the binary needs after merging all sources.
#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineConfig,
    pub endpoint: Endpoint,
    pub demo: bool,
}

impl Settings {
    /// Read the file named by `--config` (if any) and merge.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => SettingsFile::load(path)?,
            None => SettingsFile::default(),
        };
        Ok(Self::resolve(args, file))
    }

    pub fn resolve(
        args: &Args,
        file: SettingsFile,
    ) -> Self {
        let mut engine = file.engine;
        if let Some(theme) = &args.theme {
            engine.theme = if theme.contains('=') {
                cluster_common::ThemeId::from_query(theme).name().into()
            } else {
                theme.clone()
            };
        }
        if let Some(scale) = args.scale {
            engine.scale = scale;
        }

        let link = file.link;
        let endpoint = Endpoint {
            host: args.host.clone().or(link.host).unwrap_or_else(|| DEFAULT_HOST.into()),
            port: args.port.or(link.port).unwrap_or(DEFAULT_PORT),
            secure: args.secure || link.secure.unwrap_or(false),
            path: args.path.clone().or(link.path).unwrap_or_else(|| DEFAULT_PATH.into()),
        };

        Self {
            engine,
            endpoint,
            demo: args.demo || link.demo.unwrap_or(false),
        }
    }
}
