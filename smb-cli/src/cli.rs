//! CLI surface for the `smb-cli` server binary. Wraps [`smb_server::config::Cli`]'s
//! listen/credit/log overrides with the registry-file argument this binary adds on top.

use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub server: smb_server::config::Cli,

    /// Path to a TOML file describing users and shares (see
    /// [`smb_server::registry::StaticRegistryConfig`]). Required unless `--demo-share` is
    /// given, since an empty registry accepts no logons and exports nothing.
    #[arg(long)]
    pub registry: Option<std::path::PathBuf>,

    /// Exports the given local directory as a read-write share named `demo`, bypassing the
    /// registry file. Convenient for trying the server without writing a TOML config.
    #[arg(long)]
    pub demo_share: Option<std::path::PathBuf>,
}
