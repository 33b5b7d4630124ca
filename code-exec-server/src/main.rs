use clap::Parser;
use code_exec::ExecConfig;
use code_exec_server::{create_app, run_server};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scratch directory for staged sources and binaries
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Quiet period before a changed buffer runs, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ExecConfig::from_file(path)?,
        None => ExecConfig::default(),
    };
    if let Some(scratch_dir) = args.scratch_dir {
        config = config.with_scratch_dir(scratch_dir);
    }
    if let Some(debounce_ms) = args.debounce_ms {
        anyhow::ensure!(debounce_ms > 0, "--debounce-ms must be greater than zero");
        config = config.with_debounce_ms(debounce_ms);
    }

    let app = create_app(config).await?;
    run_server(app, args.addr).await?;

    Ok(())
}
