use crossbeam::channel::{bounded, Receiver, Sender};
use log::*;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use super::types::{LocusOutcome, LocusProcessor, OUTCOMES_PER_THREAD};
use crate::core::error::{Result, SnpclustError};
use crate::engine::partition::LocusGroup;

/// Parallel locus executor driven by a [`LocusProcessor`] implementation.
#[derive(Debug)]
pub struct LocusRunner<R: 'static + LocusProcessor + Send + Sync> {
    loci: Vec<LocusGroup>,
    threads: usize,
    pool: rayon::ThreadPool,
    processor: R,
}

impl<R: LocusProcessor + Send + Sync> LocusRunner<R> {
    /// Create a new [`LocusRunner`]; `threads` defaults to every available CPU.
    pub fn new(loci: Vec<LocusGroup>, threads: Option<usize>, processor: R) -> Result<Self> {
        let threads = std::cmp::max(threads.unwrap_or_else(num_cpus::get), 1);
        info!("Using {} worker threads.", threads);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;

        Ok(Self {
            loci,
            threads,
            pool,
            processor,
        })
    }

    /// Launch processing of every locus. Outcomes arrive in completion order.
    pub fn process(self) -> Receiver<LocusOutcome<R::Output>> {
        let LocusRunner {
            loci,
            threads,
            pool,
            processor,
        } = self;

        let channel_size = threads.saturating_mul(OUTCOMES_PER_THREAD).max(1);
        debug!("Creating outcome channel of length {}", channel_size);
        let (sender, receiver) = bounded(channel_size);

        thread::spawn(move || {
            pool.install(move || run(loci, &processor, sender));
        });
        receiver
    }
}

fn run<R: LocusProcessor + Send + Sync>(
    loci: Vec<LocusGroup>,
    processor: &R,
    sender: Sender<LocusOutcome<R::Output>>,
) {
    let total = loci.len();
    info!("Processing {} loci", total);
    let completed = AtomicUsize::new(0);
    let log_step = std::cmp::max(1, total / 10);

    loci.into_par_iter()
        .enumerate()
        .for_each_with(sender, |snd, (index, locus)| {
            trace!("Processing locus {} ({} bp)", index, locus.bases());
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                processor.process_locus(index, &locus)
            }))
            .unwrap_or_else(|payload| {
                Err(SnpclustError::LocusPanicked {
                    index,
                    message: panic_message(payload.as_ref()),
                })
            });
            if let Err(err) = &result {
                error!("Locus {} failed: {}", index, err);
            }

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done == total || done % log_step == 0 {
                info!(
                    "Processed {:.1}% ({} / {} loci)",
                    (done as f64 / total as f64) * 100.0,
                    done,
                    total
                );
            }

            let outcome = LocusOutcome {
                index,
                bases: locus.bases(),
                result,
            };
            if snd.send(outcome).is_err() {
                warn!("Outcome channel closed; locus {} result discarded", index);
            }
        });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
