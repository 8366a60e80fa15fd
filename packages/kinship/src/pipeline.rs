//! Ordered Pipeline
//!
//! Bounded-parallelism map that hands results back in input order.
//!
//! ```text
//!             ┌── in[0] ──▶ worker 0 ── out[0] ──┐
//! dispatcher ─┼── in[1] ──▶ worker 1 ── out[1] ──┼──▶ collector (caller thread)
//!   k % W     └── in[W-1] ▶ worker W-1 out[W-1] ─┘      k % W, round-robin
//! ```
//!
//! Item `k` always travels through worker `k % W` at queue position
//! `k / W`, so draining the output queues round-robin reproduces the input
//! order without a reorder buffer.
//!
//! Failure and cancellation share one set-once cell, first wins. A failing
//! item records its error (or `Cancelled`, if the caller's token fired
//! before it failed) and cancels the run: the dispatcher stops, queued
//! items are dropped, items already being transformed finish, and the
//! collector stops at the first missing slot.

use crate::config::PipelineConfig;
use crate::error::{KinshipError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::OnceLock;
use std::thread;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Order-preserving worker pool
#[derive(Debug, Clone)]
pub struct OrderedPipeline {
    config: PipelineConfig,
    cancel: CancellationToken,
}

impl OrderedPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Tie runs to an external cancellation token.
    ///
    /// Each run works on a child of `token`: cancelling `token` stops the
    /// run, while a failing run never cancels `token` itself.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Transform every input, collecting the outputs in input order
    pub fn run<I, T, O, F>(&self, inputs: I, transform: F) -> Result<Vec<O>>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send,
        T: Send,
        O: Send,
        F: Fn(T) -> Result<O> + Sync,
    {
        let mut outputs = Vec::new();
        self.run_with(inputs, transform, |output| outputs.push(output))?;
        Ok(outputs)
    }

    /// Transform every input, handing each output to `sink` in input order.
    ///
    /// `sink` runs on the calling thread. On failure or cancellation `sink`
    /// has seen an in-order prefix of the outputs. Returns the number of
    /// outputs delivered.
    pub fn run_with<I, T, O, F, S>(&self, inputs: I, transform: F, mut sink: S) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send,
        T: Send,
        O: Send,
        F: Fn(T) -> Result<O> + Sync,
        S: FnMut(O),
    {
        let jobs = self.config.jobs;
        let depth = self.config.queue_depth;
        let parent = &self.cancel;
        let cancel = self.cancel.child_token();
        let failure: OnceLock<KinshipError> = OnceLock::new();
        let inputs = inputs.into_iter();

        debug!("Ordered pipeline starting: {} workers, queue depth {}", jobs, depth);

        let (in_txs, in_rxs): (Vec<Sender<T>>, Vec<Receiver<T>>) =
            (0..jobs).map(|_| bounded(depth)).unzip();
        let (out_txs, out_rxs): (Vec<Sender<O>>, Vec<Receiver<O>>) =
            (0..jobs).map(|_| bounded(depth)).unzip();

        let (collected, dispatched, exhausted) = thread::scope(|scope| {
            for (in_rx, out_tx) in in_rxs.into_iter().zip(out_txs) {
                let cancel = &cancel;
                let failure = &failure;
                let transform = &transform;
                scope.spawn(move || {
                    for item in in_rx.iter() {
                        if cancel.is_cancelled() {
                            record_cancellation(parent, failure);
                            break;
                        }
                        match transform(item) {
                            Ok(output) => {
                                if out_tx.send(output).is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                // first failure wins, later ones are dropped
                                if parent.is_cancelled() {
                                    let _ = failure.set(KinshipError::Cancelled);
                                } else {
                                    let _ = failure.set(err);
                                }
                                cancel.cancel();
                                break;
                            }
                        }
                    }
                });
            }

            let dispatcher = {
                let cancel = &cancel;
                let failure = &failure;
                scope.spawn(move || {
                    let mut dispatched = 0usize;
                    for (k, item) in inputs.enumerate() {
                        if cancel.is_cancelled() {
                            record_cancellation(parent, failure);
                            return (dispatched, false);
                        }
                        if in_txs[k % jobs].send(item).is_err() {
                            return (dispatched, false);
                        }
                        dispatched += 1;
                    }
                    (dispatched, true)
                })
            };

            let mut collected = 0usize;
            while let Ok(output) = out_rxs[collected % jobs].recv() {
                sink(output);
                collected += 1;
            }

            // Unblock workers stuck on a full output queue, then the
            // dispatcher stuck on a full input queue.
            cancel.cancel();
            drop(out_rxs);

            let (dispatched, exhausted) = match dispatcher.join() {
                Ok(progress) => progress,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            (collected, dispatched, exhausted)
        });

        if let Some(err) = failure.into_inner() {
            warn!(
                "Ordered pipeline aborted after {} of {} dispatched items: {}",
                collected, dispatched, err
            );
            return Err(err);
        }
        if !exhausted || collected < dispatched {
            warn!(
                "Ordered pipeline cancelled after {} of {} dispatched items",
                collected, dispatched
            );
            return Err(KinshipError::Cancelled);
        }

        debug!("Ordered pipeline finished: {} items", collected);
        Ok(collected)
    }
}

/// Record `Cancelled` if the caller's token (not the run's own child) fired
fn record_cancellation(parent: &CancellationToken, failure: &OnceLock<KinshipError>) {
    if parent.is_cancelled() {
        let _ = failure.set(KinshipError::Cancelled);
    }
}

/// One-shot ordered map over `inputs` with `jobs` workers
pub fn ordered_map<I, T, O, F>(
    cancel: &CancellationToken,
    jobs: usize,
    inputs: I,
    transform: F,
) -> Result<Vec<O>>
where
    I: IntoIterator<Item = T>,
    I::IntoIter: Send,
    T: Send,
    O: Send,
    F: Fn(T) -> Result<O> + Sync,
{
    OrderedPipeline::new(PipelineConfig::default().with_jobs(jobs))?
        .with_cancellation(cancel.clone())
        .run(inputs, transform)
}
