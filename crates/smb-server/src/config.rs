//! Server configuration: listen address, credit/dialect ceilings, and the trait-object
//! collaborators (filesystem backend, user/share registry, pipe handler) a deployment wires
//! in. Loadable from a TOML file and overridable from the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use serde::Deserialize;

use crate::backend::FilesystemBackend;
use crate::ntlm::{NtHashCipher, NtlmMessageCodec};
use crate::pipe::PipeHandler;
use crate::registry::UserShareRegistry;

/// Statically configured, non-overridable parts of a deployment, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_max_credits")]
    pub max_credits: u16,
    #[serde(default = "default_server_name")]
    pub server_name: String,
    #[serde(default = "default_durable_reclaim_secs")]
    pub durable_reclaim_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen() -> String {
    "0.0.0.0:445".to_owned()
}
fn default_max_credits() -> u16 {
    8192
}
fn default_server_name() -> String {
    "RUSTSMB".to_owned()
}
fn default_durable_reclaim_secs() -> u64 {
    120
}
fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_credits: default_max_credits(),
            server_name: default_server_name(),
            durable_reclaim_secs: default_durable_reclaim_secs(),
            log_level: default_log_level(),
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// CLI overrides layered on top of [`FileConfig`].
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file; defaults are used for anything it omits.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub listen: Option<String>,

    #[arg(long)]
    pub max_credits: Option<u16>,

    #[arg(long)]
    pub log_level: Option<String>,
}

/// The fully resolved configuration handed to [`crate::server::run`].
pub struct ServerConfig {
    pub listen: String,
    pub max_credits: u16,
    pub server_name: String,
    pub durable_reclaim_secs: u64,
    pub log_level: String,
    pub backend: Arc<dyn FilesystemBackend>,
    pub registry: Arc<dyn UserShareRegistry>,
    pub pipe_handler: Arc<dyn PipeHandler>,
    pub ntlm_codec: Arc<dyn NtlmMessageCodec>,
    pub ntlmv1_cipher: Option<Arc<dyn NtHashCipher>>,
}

impl ServerConfig {
    /// Merges an optional TOML file with CLI overrides (CLI wins).
    pub fn resolve(
        cli: &Cli,
        backend: Arc<dyn FilesystemBackend>,
        registry: Arc<dyn UserShareRegistry>,
        pipe_handler: Arc<dyn PipeHandler>,
        ntlm_codec: Arc<dyn NtlmMessageCodec>,
        ntlmv1_cipher: Option<Arc<dyn NtHashCipher>>,
    ) -> std::io::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self {
            listen: cli.listen.clone().unwrap_or(file.listen),
            max_credits: cli.max_credits.unwrap_or(file.max_credits),
            server_name: file.server_name,
            durable_reclaim_secs: file.durable_reclaim_secs,
            log_level: cli.log_level.clone().unwrap_or(file.log_level),
            backend,
            registry,
            pipe_handler,
            ntlm_codec,
            ntlmv1_cipher,
        })
    }
}
