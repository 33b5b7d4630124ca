use appstack::{render_preview, render_result, run_once, watch_with, RunReport, TerminalDisplay};
use clap::{Parser, Subcommand};
use code_exec::{ExecConfig, Language, Registry};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Scratch directory for staged sources and binaries
    #[arg(long, global = true)]
    scratch_dir: Option<PathBuf>,

    /// Quiet period before a changed file runs, in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a source file once and print its output
    Run {
        file: PathBuf,
        /// Language of the file, inferred from its extension when omitted
        #[arg(short, long)]
        language: Option<Language>,
    },
    /// Re-run a source file every time it changes, until interrupted
    Watch {
        file: PathBuf,
        #[arg(short, long)]
        language: Option<Language>,
    },
    /// List languages and whether their toolchain is installed
    Languages,
}

impl Cli {
    fn exec_config(&self) -> anyhow::Result<ExecConfig> {
        let mut config = match &self.config {
            Some(path) => ExecConfig::from_file(path)?,
            None => ExecConfig::default(),
        };
        if let Some(scratch_dir) = &self.scratch_dir {
            config = config.with_scratch_dir(scratch_dir.clone());
        }
        if let Some(debounce_ms) = self.debounce_ms {
            anyhow::ensure!(debounce_ms > 0, "--debounce-ms must be greater than zero");
            config = config.with_debounce_ms(debounce_ms);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so program output stays clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.exec_config()?;

    match cli.command {
        Command::Run { file, language } => {
            let report = run_once(&config, &file, language).await?;
            match &report {
                RunReport::Output(result) => print!("{}", render_result(result)),
                RunReport::Preview(state) => print!("{}", render_preview(*state)),
            }
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Watch { file, language } => {
            let display = TerminalDisplay::new(std::io::stdout());
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for ctrl-c: {}", e);
                }
            };
            watch_with(&config, &file, language, display, shutdown).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Languages => {
            for status in Registry::new(&config).availability() {
                println!(
                    "{:<8} .{:<4} {:<10} {}",
                    status.language.display_name(),
                    status.extension,
                    status.program,
                    if status.available { "available" } else { "missing" }
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
