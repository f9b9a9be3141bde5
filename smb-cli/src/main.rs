mod cli;

use std::sync::Arc;

use clap::Parser;
use smb_server::backend::StdFsBackend;
use smb_server::config::ServerConfig;
use smb_server::ntlm::NullNtlmCodec;
use smb_server::pipe::NullPipeHandler;
use smb_server::registry::{StaticRegistry, StaticRegistryConfig, UserRecord, UserShareRegistry};
use smb_server::tree::{Share, ShareFlags, ShareType};

use cli::Cli;

/// A one-share, no-auth registry for `--demo-share`, bypassing the TOML-driven
/// [`StaticRegistry`] for a quick try-it-out run.
struct DemoRegistry {
    share: Share,
}

impl UserShareRegistry for DemoRegistry {
    fn find_user(&self, _username: &str, _domain: &str) -> Option<UserRecord> {
        None
    }

    fn find_share(&self, name: &str) -> Option<Share> {
        name.eq_ignore_ascii_case(&self.share.name)
            .then(|| self.share.clone())
    }

    fn list_shares(&self) -> Vec<Share> {
        vec![self.share.clone()]
    }
}

fn build_registry(cli: &Cli) -> std::io::Result<Arc<dyn UserShareRegistry>> {
    if let Some(path) = &cli.demo_share {
        return Ok(Arc::new(DemoRegistry {
            share: Share {
                name: "demo".to_owned(),
                share_type: ShareType::Disk,
                local_path: path.to_string_lossy().into_owned(),
                flags: ShareFlags::default(),
            },
        }));
    }
    let path = cli.registry.as_deref().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "either --registry or --demo-share must be given",
        )
    })?;
    let text = std::fs::read_to_string(path)?;
    let config: StaticRegistryConfig =
        toml::from_str(&text).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(Arc::new(StaticRegistry::from_config(config)))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let registry = build_registry(&cli)?;

    let config = ServerConfig::resolve(
        &cli.server,
        Arc::new(StdFsBackend),
        registry,
        Arc::new(NullPipeHandler),
        Arc::new(NullNtlmCodec),
        None,
    )?;

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    smb_server::server::run(config).await
}
