//! walletd command-line interface
//!
//! Initializes wallets for one or more chains in the configured network mode
//! and reports the resulting keys, addresses and accounts.

mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use walletd_core::config::DEFAULT_CONFIG_FILE;
use walletd_core::credentials::DEFAULT_ENV_FILE;
use walletd_core::{
    Chain, ConfigStore, EnvCredentialSource, InitStatus, JsonConfigStore, NetworkMode, WalletConfig,
    WalletService,
};

#[derive(Parser)]
#[command(name = "walletd")]
#[command(about = "Multi-chain wallet initialization and account provisioning")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Operator credentials file
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize wallets for the given chains
    Init {
        /// Chains to initialize (btc, eth, sol, xmr, hbar, icp)
        #[arg(required = true, num_args = 1..)]
        chains: Vec<Chain>,

        /// Print the private keys
        #[arg(long)]
        show_private_key: bool,

        /// Create real accounts for wallets that did not get one, mainnet included
        #[arg(long)]
        provision: bool,
    },
    /// Initialize wallets for every supported chain
    InitAll {
        /// Print the private keys
        #[arg(long)]
        show_private_key: bool,
    },
    /// Show the network mode, or persist a new one
    ///
    /// Switching moves endpoints that still hold the old mode's defaults to
    /// the new mode's defaults. Edited endpoints and credentials are kept.
    Mode {
        mode: Option<NetworkMode>,
    },
    /// Print the active configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("walletd={0},walletd_core={0}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = JsonConfigStore::new(&cli.config);
    let config = store
        .load()
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    debug!(path = %cli.config.display(), mode = %config.mode, "loaded configuration");

    match cli.command {
        Commands::Init { chains, show_private_key, provision } => {
            let service = build_service(config, &cli.env_file)?;
            run_init(&service, &chains, show_private_key, provision).await?;
        }
        Commands::InitAll { show_private_key } => {
            let service = build_service(config, &cli.env_file)?;
            run_init(&service, &Chain::ALL, show_private_key, false).await?;
        }
        Commands::Mode { mode: Some(mode) } => {
            let next = config.with_mode(mode);
            store.save(&next).context("Failed to save configuration")?;
            println!("Network mode set to {}", mode);
        }
        Commands::Mode { mode: None } => {
            println!("{}", config.mode);
        }
        Commands::Config => {
            output::print_config(&config)?;
        }
    }

    Ok(())
}

fn build_service(config: WalletConfig, env_file: &Path) -> anyhow::Result<WalletService> {
    let credentials = EnvCredentialSource::new(Some(env_file.to_path_buf()), &config);
    let service = WalletService::with_default_creators(config, Arc::new(credentials))
        .context("Invalid configuration")?;
    Ok(service)
}

async fn run_init(
    service: &WalletService,
    chains: &[Chain],
    show_private_key: bool,
    provision: bool,
) -> anyhow::Result<()> {
    println!("Network mode: {}", service.mode());

    let mut failures = 0usize;
    for (chain, result) in service.init_all(chains).await {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                error!(%chain, error = %e, "initialization failed");
                eprintln!("{}: initialization failed: {}", chain, e);
                failures += 1;
                continue;
            }
        };

        let report = if provision && report.status != InitStatus::Provisioned {
            match service.provision(chain).await {
                Ok(provisioned) => provisioned,
                Err(e) => {
                    eprintln!("{}: provisioning failed: {}", chain, e);
                    failures += 1;
                    report
                }
            }
        } else {
            report
        };

        output::print_report(&report);
        if show_private_key {
            if let Some(wallet) = service.wallet(chain) {
                output::print_private_key(&wallet)?;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} chains failed", failures, chains.len());
    }
    Ok(())
}
