use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use cmd::command::server;
use cmd::config::Config;
use cmd::error::Error;
use cmd::error::Result;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Clone)]
pub struct Cfg {
    #[arg(long)]
    config: PathBuf,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Run server
    Server(Cfg),
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let Some(command) = &args.command else {
        return Err(Error::BadRequest("no command specified".to_string()));
    };

    let cfg: Config = match command {
        Commands::Server(cfg) => {
            let config = config::Config::builder()
                .add_source(config::File::from(cfg.config.clone()))
                .build()?;
            config.try_deserialize()?
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cfg.log.level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Error::SetGlobalDefaultError)?;

    let version = env!("CARGO_PKG_VERSION");
    info!("Taskany v{version}");

    match command {
        Commands::Server(_) => {
            server::start(cfg.try_into()?).await?;
        }
    }

    Ok(())
}
