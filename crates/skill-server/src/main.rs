use std::io;
use std::path::PathBuf;

use clap::Parser;

use skill_server::logging::init_logging;
use skill_server::server::run_server_with_config;
use skill_server::{SkillConfig, StorageKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "skill-server")]
#[command(about = "Tomato Helper skill endpoint")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(
        long,
        env = "DEBUG",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    debug: Option<bool>,

    /// Server port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Directory for stored sessions
    #[arg(long, env = "TOMATO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL of the audio assets
    #[arg(long, env = "BASE_URL")]
    audio_base_url: Option<String>,

    /// Only accept requests for this application id
    #[arg(long, env = "SKILL_APP_ID")]
    app_id: Option<String>,

    /// Session storage backend
    #[arg(long, env = "SKILL_STORAGE", value_enum)]
    storage: Option<StorageArg>,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum StorageArg {
    File,
    Memory,
}

impl From<StorageArg> for StorageKind {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::File => StorageKind::File,
            StorageArg::Memory => StorageKind::Memory,
        }
    }
}

impl Cli {
    fn apply(self, config: &mut SkillConfig) {
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(url) = self.audio_base_url {
            config.audio_base_url = url;
        }
        if let Some(app_id) = self.app_id {
            config.app_id = Some(app_id).filter(|id| !id.trim().is_empty());
        }
        if let Some(storage) = self.storage {
            config.storage = storage.into();
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let (mut config, config_error) = match SkillConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (SkillConfig::from_env(), Some(e)),
    };
    let log_level = cli.log_level.clone();
    cli.apply(&mut config);

    if log_level.is_some() {
        env_logger::init();
    } else {
        init_logging(config.debug);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }

    log::info!("Starting Tomato Helper skill server on port {}", config.port);
    log::info!("  Storage: {:?}", config.storage);
    log::info!("  Audio base URL: {}", config.audio_base_url);
    match &config.app_id {
        Some(app_id) => log::info!("  Application id: {}", app_id),
        None => log::warn!("  Application id verification disabled"),
    }

    if config.debug {
        log::debug!("Debug mode enabled");
        log::debug!("  Data dir: {}", config.data_dir.display());
    }

    run_server_with_config(config).await
}
