use std::env;

use anyhow::Result;
use chainparams_host::{build_registry, ChainFlags, ParamsSummary};
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Network to run on: main, test, dev or regtest. Falls back to the CHAIN
    /// environment variable.
    #[clap(long)]
    chain: Option<String>,

    /// Use the test network
    #[clap(long)]
    testnet: bool,

    /// Use the regression test network
    #[clap(long)]
    regtest: bool,

    /// Use a development network. The optional name yields devnet-<name>.
    #[clap(long, num_args = 0..=1, default_missing_value = "")]
    devnet: Option<String>,

    /// Override a regtest deployment as deployment:start:timeout. May be repeated.
    #[clap(long = "vbparams")]
    vbparams: Vec<String>,

    /// Print the parameter summary as JSON
    #[clap(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv().ok();

    // INFO is the default level if RUST_LOG is not set
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
        )
        .init();

    let args = Args::parse();
    let flags = ChainFlags {
        chain: args.chain.or_else(|| env::var("CHAIN").ok()),
        testnet: args.testnet,
        regtest: args.regtest,
        devnet: args.devnet,
    };

    let network = flags.resolve()?;
    let options = flags.registry_options();
    let registry = build_registry(network, options.clone(), &args.vbparams)?;
    if chainparams_core::install(registry).is_err() {
        anyhow::bail!("chain parameters were already installed");
    }

    let params = chainparams_core::select_params(network.as_str());
    let summary = ParamsSummary::new(params, &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    info!("Network: {}", summary.network);
    if let Some(name) = &summary.devnet_name {
        info!("  Devnet name: {}", name);
    }
    info!("  Genesis block: {}", summary.genesis_hash);
    info!("  Genesis merkle root: {}", summary.genesis_merkle_root);
    if let Some(hash) = &summary.devnet_genesis_hash {
        info!("  Devnet genesis block: {}", hash);
    }
    info!("  Message start: {}", summary.message_start);
    info!("  Default port: {}", summary.default_port);
    info!("  Proof-of-work limit: {}", summary.pow_limit);
    info!("  Last proof-of-work block: {}", summary.last_pow_block);
    for deployment in &summary.deployments {
        info!(
            "  Deployment {} (bit {}): start {}, timeout {}, {}/{} blocks",
            deployment.pos,
            deployment.bit,
            deployment.start_time,
            deployment.timeout,
            deployment.threshold,
            deployment.window_size
        );
    }

    Ok(())
}
