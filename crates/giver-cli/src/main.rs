//! Command-line miner: searches for a winning nonce against pre-fetched
//! giver parameters and prints the transfer deep link to submit it.

mod params;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use giver_core::{
    mine_parallel, to_decimal_string, to_nano, transfer_link, MineConfig, MsgAddress,
    ProgressObserver,
};
use num_bigint::BigUint;

use crate::params::{load_params_file, resolve_mining_data};

/// The onboarding challenge's PoW giver collection.
const DEFAULT_COLLECTION: &str = "EQDk8N7xM5D669LC2YACrseBJtDyFqwtSPCNhRWXU7kjEptX";

#[derive(Parser, Debug)]
#[command(about, version)]
struct Args {
    #[arg(long, value_name = "ADDRESS", help = "Wallet address that receives the minted item")]
    wallet: String,

    #[arg(
        long,
        value_name = "ADDRESS",
        default_value = DEFAULT_COLLECTION,
        help = "PoW giver collection contract"
    )]
    collection: String,

    #[arg(long, value_name = "TON", default_value = "0.05", help = "Amount attached to the mine transaction, in TON")]
    amount: String,

    #[arg(long, value_name = "FILE", help = "JSON file with the get_mining_data values")]
    mining_data: Option<PathBuf>,

    #[arg(long, value_name = "HEX", help = "Proof-of-work complexity bound")]
    complexity: Option<String>,

    #[arg(long, value_name = "HEX", help = "Per-epoch mining seed")]
    seed: Option<String>,

    #[arg(long, value_name = "HEX", help = "Unix time of the last successful mine")]
    last_success: Option<String>,

    #[arg(long, value_name = "HEX", help = "Contract retargeting delta")]
    target_delta: Option<String>,

    #[arg(long, value_name = "HEX", help = "Minimum complexity power limit")]
    min_cpl: Option<String>,

    #[arg(long, value_name = "HEX", help = "Maximum complexity power limit")]
    max_cpl: Option<String>,

    #[arg(long, value_name = "COUNT", help = "Mining worker threads; defaults to all cores")]
    workers: Option<usize>,

    #[arg(long, value_name = "SECONDS", default_value_t = 300, help = "Message expiry window")]
    horizon: u64,

    #[arg(long, value_name = "COUNT", help = "Give up after this many attempts per worker")]
    attempt_cap: Option<u64>,

    #[arg(long, value_name = "SCHEME", default_value = "ton", help = "Deep link URI scheme")]
    scheme: String,
}

/// Counts attempts across all workers and logs liveness periodically.
#[derive(Clone)]
struct ConsoleProgress {
    total: Arc<AtomicU64>,
    every: u64,
}

impl ProgressObserver for ConsoleProgress {
    fn on_attempt(&mut self, _nonce: u64, hash: &BigUint) {
        let n = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        if n % self.every == 0 {
            info!("mined {} hashes, last: {}", n, to_decimal_string(hash));
        }
    }
}

fn init_log() {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("giver_miner=debug".parse().unwrap())
        .add_directive("info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn main() -> Result<()> {
    init_log();

    let args = Args::parse();

    let file = match &args.mining_data {
        Some(path) => Some(load_params_file(path)?),
        None => None,
    };
    let data = resolve_mining_data(
        file,
        args.complexity.as_deref(),
        args.seed.as_deref(),
        args.last_success.as_deref(),
        args.target_delta.as_deref(),
        args.min_cpl.as_deref(),
        args.max_cpl.as_deref(),
    )?;

    let wallet = MsgAddress::parse(&args.wallet).context("invalid wallet address")?;
    let collection = MsgAddress::parse(&args.collection).context("invalid collection address")?;
    let amount_nano = to_nano(&args.amount).context("invalid TON amount")?;

    let workers = args.workers.unwrap_or_else(num_cpus::get);
    let config = MineConfig {
        horizon: Duration::from_secs(args.horizon),
        attempt_cap: args.attempt_cap,
        ..MineConfig::default()
    };

    info!(
        "mining for {} against complexity {} with {} workers",
        wallet,
        to_decimal_string(&data.complexity),
        workers
    );

    let observer = ConsoleProgress {
        total: Arc::new(AtomicU64::new(0)),
        every: 100_000,
    };
    let total = observer.total.clone();
    let stop = Arc::new(AtomicBool::new(false));

    let started = Instant::now();
    let outcome = mine_parallel(&data, &wallet, &config, workers, stop, observer)
        .context("mining did not produce a solution")?;

    let elapsed = started.elapsed();
    info!(
        "solution found: nonce {}, hash {} ({} attempts in {:.1?})",
        outcome.params.nonce,
        to_decimal_string(&outcome.hash),
        total.load(Ordering::Relaxed) + 1,
        elapsed
    );
    info!("submit quickly: another miner's transaction rotates the seed");

    let link = transfer_link(&outcome.cell, &collection, amount_nano, &args.scheme)?;
    println!("{link}");

    Ok(())
}
