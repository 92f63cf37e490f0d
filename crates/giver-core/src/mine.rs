//! The proof-of-work search loop.
//!
//! A candidate wins when the hash of its encoded message is strictly below
//! the contract's complexity bound. The loop re-stamps the expiry window
//! before every attempt so a long search cannot produce an already-stale
//! message, and it checks the caller's stop flag after every hash.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, warn};

use crate::address::MsgAddress;
use crate::cell::Cell;
use crate::error::MineError;
use crate::message::{encode_mine_message, MineParams};

/// The six values of the giver's `get_mining_data` response.
///
/// Only `complexity` and `seed` drive the search; the rest are carried for
/// display and session bookkeeping.
#[derive(Debug, Clone)]
pub struct MiningData {
    /// Acceptance bound: a candidate wins iff its hash is strictly below.
    pub complexity: BigUint,
    /// Unix time of the last successful mine transaction.
    pub last_success: u64,
    /// Per-epoch seed mixed into every candidate.
    pub seed: BigUint,
    pub target_delta: u64,
    pub min_cpl: u64,
    pub max_cpl: u64,
}

/// Tuning knobs for one search session.
#[derive(Debug, Clone)]
pub struct MineConfig {
    /// Expiry window stamped on every candidate. 300 seconds comfortably
    /// covers transaction submission latency.
    pub horizon: Duration,
    /// Give up with [`MineError::Exhausted`] after this many attempts.
    pub attempt_cap: Option<u64>,
    /// First nonce tried.
    pub start_nonce: u64,
    /// Nonce step between attempts. Parallel workers use their worker
    /// count here so the nonce space partitions without coordination.
    pub stride: u64,
}

impl Default for MineConfig {
    fn default() -> Self {
        MineConfig {
            horizon: Duration::from_secs(300),
            attempt_cap: None,
            start_nonce: 0,
            stride: 1,
        }
    }
}

/// The winning candidate and its encoding.
#[derive(Debug, Clone)]
pub struct MineOutcome {
    /// Parameters of the accepted message.
    pub params: MineParams,
    /// The encoded message cell, ready for container serialization.
    pub cell: Cell,
    /// Hash that beat the complexity bound.
    pub hash: BigUint,
    /// Attempts this worker spent, the winning one included.
    pub attempts: u64,
}

/// Receives one call per failed attempt.
///
/// Implementations decide how to surface liveness; the engine itself never
/// prints. Any `FnMut(u64, &BigUint)` closure qualifies.
pub trait ProgressObserver {
    fn on_attempt(&mut self, nonce: u64, hash: &BigUint);
}

impl<F: FnMut(u64, &BigUint)> ProgressObserver for F {
    fn on_attempt(&mut self, nonce: u64, hash: &BigUint) {
        self(nonce, hash)
    }
}

/// Observer that discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_attempt(&mut self, _nonce: u64, _hash: &BigUint) {}
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Search for a nonce whose message hash beats `data.complexity`.
///
/// Runs until success, until `stop` is raised ([`MineError::Cancelled`],
/// observed at least once per attempt), or until the attempt cap is hit.
/// A `complexity` of zero can never be beaten; callers must bound such a
/// session with the stop flag or a cap, or this loop will not terminate.
pub fn mine<O: ProgressObserver>(
    data: &MiningData,
    recipient: &MsgAddress,
    config: &MineConfig,
    stop: &AtomicBool,
    observer: &mut O,
) -> Result<MineOutcome, MineError> {
    if data.complexity.is_zero() {
        warn!("complexity is zero; no candidate can win this session");
    }

    let mut params = MineParams {
        expire: 0,
        recipient: *recipient,
        nonce: config.start_nonce,
        seed: data.seed.clone(),
    };
    let mut attempts: u64 = 0;

    loop {
        params.expire = stamp_expiry(config.horizon);
        let msg = encode_mine_message(&params)?;
        attempts += 1;

        if msg.hash < data.complexity {
            return Ok(MineOutcome {
                params,
                cell: msg.cell,
                hash: msg.hash,
                attempts,
            });
        }

        observer.on_attempt(params.nonce, &msg.hash);

        if stop.load(Ordering::Relaxed) {
            return Err(MineError::Cancelled);
        }
        if let Some(cap) = config.attempt_cap {
            if attempts >= cap {
                return Err(MineError::Exhausted { attempts });
            }
        }

        params.nonce += config.stride;
    }
}

/// Race `workers` threads over disjoint nonce strides; first solution wins.
///
/// Worker `i` starts at `start_nonce + i` and steps by `workers`, so the
/// threads cover the same sequence a single worker would, without overlap.
/// The winner raises the shared stop flag; the other workers observe it
/// after their current hash and exit without further work. Exactly one
/// outcome is returned even if two workers solve near-simultaneously.
pub fn mine_parallel<O>(
    data: &MiningData,
    recipient: &MsgAddress,
    config: &MineConfig,
    workers: usize,
    stop: Arc<AtomicBool>,
    observer: O,
) -> Result<MineOutcome, MineError>
where
    O: ProgressObserver + Clone + Send + 'static,
{
    if workers <= 1 {
        let mut observer = observer;
        return mine(data, recipient, config, &stop, &mut observer);
    }

    let (tx, rx) = mpsc::channel::<Result<MineOutcome, MineError>>();
    let mut handles = Vec::with_capacity(workers);

    for id in 0..workers {
        let data = data.clone();
        let recipient = *recipient;
        let config = MineConfig {
            start_nonce: config.start_nonce + id as u64,
            stride: workers as u64,
            ..config.clone()
        };
        let stop = Arc::clone(&stop);
        let tx = tx.clone();
        let mut observer = observer.clone();

        handles.push(thread::spawn(move || {
            debug!(worker = id, start_nonce = config.start_nonce, "mining worker started");
            let result = mine(&data, &recipient, &config, &stop, &mut observer);
            match &result {
                // Terminal for the whole session: signal the other workers.
                Ok(_) | Err(MineError::Encode(_)) => stop.store(true, Ordering::Relaxed),
                Err(_) => {}
            }
            let _ = tx.send(result);
            debug!(worker = id, "mining worker stopped");
        }));
    }
    drop(tx);

    // First success wins; later successes are discarded. Without a winner,
    // report the most specific failure seen.
    let mut winner: Option<MineOutcome> = None;
    let mut failure: Option<MineError> = None;
    for result in rx {
        match result {
            Ok(outcome) => {
                if winner.is_none() {
                    winner = Some(outcome);
                }
            }
            Err(err) => failure = Some(worse_of(failure.take(), err)),
        }
    }
    for handle in handles {
        let _ = handle.join();
    }

    match winner {
        Some(outcome) => Ok(outcome),
        None => Err(failure.unwrap_or(MineError::Cancelled)),
    }
}

fn stamp_expiry(horizon: Duration) -> u32 {
    (unix_now() + horizon.as_secs()) as u32
}

fn worse_of(current: Option<MineError>, new: MineError) -> MineError {
    fn rank(err: &MineError) -> u8 {
        match err {
            MineError::Encode(_) => 2,
            MineError::Exhausted { .. } => 1,
            MineError::Cancelled => 0,
        }
    }
    match current {
        Some(current) if rank(&current) >= rank(&new) => current,
        _ => new,
    }
}
