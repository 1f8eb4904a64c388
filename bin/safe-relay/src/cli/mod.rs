use crate::utils::run_until_ctrl_c;
use clap::{value_parser, Parser, Subcommand};

pub mod args;
pub mod commands;

/// The main Safe Relay CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "Safe Relay", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict the address of a Safe and whether it is deployed
    #[command(name = "predict")]
    Predict(commands::PredictCommand),

    /// Sign a Safe transaction and submit it to the relay (deploying the Safe if needed)
    #[command(name = "relay")]
    Relay(Box<commands::RelayCommand>),

    /// Create an owner wallet
    #[command(name = "create-wallet")]
    CreateWallet(commands::CreateWalletCommand),

    /// Decode call data submitted to the relay
    #[command(name = "decode")]
    Decode(commands::DecodeCommand),
}

pub fn run() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let level = cli.get_log_level();
    let targets = ["safe_relay", "safe_relay_contracts", "safe_relay_primitives", "safe_relay_relayer"]
        .map(|target| format!("{target}={level}"))
        .join(",");
    let rust_log = match std::env::var("RUST_LOG") {
        Ok(val) => format!("{val},{targets}"),
        Err(_) => targets,
    };
    std::env::set_var("RUST_LOG", rust_log);
    tracing_subscriber::fmt::init();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    let task = async move {
        match cli.command {
            Commands::Predict(command) => command.execute().await,
            Commands::Relay(command) => command.execute().await,
            Commands::CreateWallet(command) => command.execute(),
            Commands::Decode(command) => command.execute(),
        }
    };

    rt.block_on(run_until_ctrl_c(task))
}
