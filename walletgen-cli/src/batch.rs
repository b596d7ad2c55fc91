//! Parallel batch generation
//!
//! Each wallet is an independent blocking job on the tokio blocking pool.
//! A semaphore bounds how many exist at once, and results are collected in
//! request order regardless of completion order.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use walletgen::{AddressSet, NetworkParams, Wallet};

use crate::config::{ErrorPolicy, GeneratorConfig};
use crate::error::CliError;

/// One generated wallet, as written by the output layer
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedWallet {
    /// 1-based position in the batch
    pub index: usize,
    pub addresses: AddressSet,
    pub mnemonic: String,
}

/// A wallet dropped under [`ErrorPolicy::Skip`]
#[derive(Debug)]
pub struct SkippedWallet {
    pub index: usize,
    pub error: walletgen::Error,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub wallets: Vec<GeneratedWallet>,
    pub skipped: Vec<SkippedWallet>,
}

/// Generate a single wallet and its four addresses
pub fn generate_one(index: usize, bits: usize, network: &NetworkParams) -> walletgen::Result<GeneratedWallet> {
    let wallet = Wallet::generate(bits)?;
    let addresses = wallet.derive_all_addresses(network)?;

    debug!(index, "wallet generated");
    Ok(GeneratedWallet {
        index,
        addresses,
        mnemonic: wallet.mnemonic(),
    })
}

/// Generate `config.count` wallets with fresh entropy
pub async fn run_batch(config: &GeneratorConfig) -> Result<BatchReport, CliError> {
    let bits = config.bits;
    let network = config.network;

    run_batch_with(config, move |index| generate_one(index, bits, &network)).await
}

/// Run `generate` for indices `1..=config.count` under the configured
/// worker limit and error policy
///
/// A job is only spawned once a worker permit is free, so at most
/// `config.workers` jobs exist at a time.
#[instrument(skip_all, fields(count = config.count, workers = config.workers))]
pub async fn run_batch_with<F>(config: &GeneratorConfig, generate: F) -> Result<BatchReport, CliError>
where
    F: Fn(usize) -> walletgen::Result<GeneratedWallet> + Send + Sync + 'static,
{
    let generate = Arc::new(generate);
    let semaphore = Arc::new(Semaphore::new(config.workers));
    let mut pending: VecDeque<(usize, Job)> = VecDeque::with_capacity(config.workers);
    let mut report = BatchReport::default();

    for index in 1..=config.count {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| CliError::Batch(e.to_string()))?;

        // Collect finished jobs from the front so results stay in request order
        while pending.front().is_some_and(|(_, job)| job.is_finished()) {
            if let Some((done, job)) = pending.pop_front() {
                collect(config.on_error, &mut report, done, job, &pending).await?;
            }
        }

        let generate = Arc::clone(&generate);
        let job = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            (*generate)(index)
        });
        pending.push_back((index, job));
    }

    while let Some((index, job)) = pending.pop_front() {
        collect(config.on_error, &mut report, index, job, &pending).await?;
    }

    info!(
        generated = report.wallets.len(),
        skipped = report.skipped.len(),
        "batch complete"
    );
    Ok(report)
}

type Job = JoinHandle<walletgen::Result<GeneratedWallet>>;

async fn collect(
    policy: ErrorPolicy,
    report: &mut BatchReport,
    index: usize,
    job: Job,
    rest: &VecDeque<(usize, Job)>,
) -> Result<(), CliError> {
    let outcome = job
        .await
        .map_err(|e| CliError::Batch(format!("wallet #{} task failed: {}", index, e)))?;

    match outcome {
        Ok(wallet) => report.wallets.push(wallet),
        Err(error) => match policy {
            ErrorPolicy::Halt => {
                for (_, job) in rest {
                    job.abort();
                }
                return Err(CliError::Generation { index, source: error });
            }
            ErrorPolicy::Skip => {
                warn!(index, error = %error, "skipping wallet");
                report.skipped.push(SkippedWallet { index, error });
            }
        },
    }
    Ok(())
}
