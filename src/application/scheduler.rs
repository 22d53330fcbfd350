use crate::config::EngineConfig;
use crate::domain::generator::TransactionGenerator;
use crate::domain::ports::OracleBox;
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::{Result, SettlementError};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// One-shot deferred retry. Heap order is fire time, ties broken by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RetryEntry {
    due: Instant,
    id: u64,
}

/// Drives every transaction through the settlement state machine.
///
/// The scheduler is the single writer: it owns the transaction collection,
/// the generator, and the retry queue, and every mutation happens inside its
/// one `run` task. Two periodic cadences (generation and scan) and the
/// per-transaction one-shot retry timers are multiplexed with `select!`, so
/// no two attempts against the same transaction can ever overlap.
pub struct RetryScheduler {
    config: EngineConfig,
    generator: TransactionGenerator,
    oracle: OracleBox,
    transactions: Vec<Transaction>,
    retry_queue: BinaryHeap<Reverse<RetryEntry>>,
    scheduled: HashSet<u64>,
    generation_done: bool,
}

impl RetryScheduler {
    pub fn new(config: EngineConfig, generator: TransactionGenerator, oracle: OracleBox) -> Self {
        Self {
            config,
            generator,
            oracle,
            transactions: Vec::new(),
            retry_queue: BinaryHeap::new(),
            scheduled: HashSet::new(),
            generation_done: false,
        }
    }

    /// Runs the engine to completion and returns the final collection.
    ///
    /// Terminates once the generation cap has been reached and no
    /// transaction remains in a live state. Fatal only on id-space
    /// exhaustion; per-attempt oracle errors never abort the loop.
    pub async fn run(mut self) -> Result<Vec<Transaction>> {
        let mut generation_tick = time::interval(self.config.tick);
        let mut scan_tick = time::interval(self.config.tick);
        generation_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        scan_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if self.generation_done && !self.has_live_transactions() {
                break;
            }

            let next_retry = self.retry_queue.peek().map(|Reverse(entry)| entry.due);
            tokio::select! {
                _ = generation_tick.tick(), if !self.generation_done => {
                    self.generate_one()?;
                }
                _ = time::sleep_until(next_retry.unwrap_or_else(Instant::now)),
                        if next_retry.is_some() => {
                    self.fire_due_retries().await;
                }
                _ = scan_tick.tick() => {
                    self.scan().await;
                }
            }
        }

        self.log_snapshot();
        Ok(self.transactions)
    }

    fn has_live_transactions(&self) -> bool {
        self.transactions.iter().any(|tx| tx.status.is_live())
    }

    fn generate_one(&mut self) -> Result<()> {
        match self.generator.generate() {
            Ok(tx) => {
                info!(id = tx.id, amount = %tx.amount, "transaction generated");
                self.transactions.push(tx);
                if self.generator.is_exhausted() {
                    info!(
                        population = self.transactions.len(),
                        "population limit reached, generation stopped"
                    );
                    self.generation_done = true;
                }
                Ok(())
            }
            Err(SettlementError::PopulationExhausted) => {
                self.generation_done = true;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Attempts every live transaction that is not already waiting on a
    /// deferred retry, in collection order.
    async fn scan(&mut self) {
        let eligible: Vec<u64> = self
            .transactions
            .iter()
            .filter(|tx| tx.status.is_live() && !self.scheduled.contains(&tx.id))
            .map(|tx| tx.id)
            .collect();

        if eligible.is_empty() {
            debug!("no transactions eligible for settlement");
            return;
        }
        for id in eligible {
            self.attempt(id).await;
        }
    }

    /// Pops and attempts every retry whose timer has fired.
    async fn fire_due_retries(&mut self) {
        let now = Instant::now();
        while let Some(&Reverse(entry)) = self.retry_queue.peek() {
            if entry.due > now {
                break;
            }
            self.retry_queue.pop();
            self.scheduled.remove(&entry.id);
            debug!(id = entry.id, "retry timer fired");
            self.attempt(entry.id).await;
        }
    }

    /// One settlement attempt against a single transaction.
    ///
    /// Status is checked before acting: a retry timer may fire after the
    /// periodic scan already drove this transaction to a terminal state, and
    /// terminal states are never revisited.
    async fn attempt(&mut self, id: u64) {
        let Some(index) = self.transactions.iter().position(|tx| tx.id == id) else {
            return;
        };
        if self.transactions[index].status.is_terminal() {
            debug!(
                id,
                status = %self.transactions[index].status,
                "skipping settlement of terminal transaction"
            );
            return;
        }

        let verdict = self.oracle.settle(id).await;
        let attempt_limit = self.config.attempt_limit;

        let retry_attempt = {
            let tx = &mut self.transactions[index];
            let old_status = tx.status;
            match verdict {
                Ok(true) => {
                    // An accepted attempt does not count against the attempt
                    // budget; attempts only tracks rejections.
                    tx.status = TransactionStatus::Success;
                    info!(
                        id,
                        old_status = %old_status,
                        new_status = %tx.status,
                        attempts = tx.attempts,
                        "settlement accepted"
                    );
                    None
                }
                Ok(false) => {
                    if tx.attempts < attempt_limit {
                        tx.status = TransactionStatus::Failed;
                        tx.attempts += 1;
                        info!(
                            id,
                            old_status = %old_status,
                            new_status = %tx.status,
                            attempts = tx.attempts,
                            "settlement rejected, will retry"
                        );
                        Some(tx.attempts)
                    } else {
                        tx.status = TransactionStatus::Rejected;
                        info!(
                            id,
                            old_status = %old_status,
                            new_status = %tx.status,
                            attempts = tx.attempts,
                            "settlement rejected permanently"
                        );
                        None
                    }
                }
                Err(err) => {
                    warn!(id, error = %err, "oracle error, transaction left unchanged");
                    None
                }
            }
        };

        if let Some(attempt) = retry_attempt {
            let delay = self.config.retry_delay(attempt);
            self.schedule_retry(id, attempt, delay);
        }
    }

    fn schedule_retry(&mut self, id: u64, attempt: u32, delay: Duration) {
        let due = Instant::now() + delay;
        self.retry_queue.push(Reverse(RetryEntry { due, id }));
        self.scheduled.insert(id);
        debug!(
            id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "retry scheduled"
        );
    }

    fn log_snapshot(&self) {
        let succeeded = self
            .transactions
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Success)
            .count();
        let rejected = self
            .transactions
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Rejected)
            .count();
        info!(
            total = self.transactions.len(),
            succeeded, rejected, "settlement run complete"
        );
        for tx in &self.transactions {
            debug!(
                id = tx.id,
                status = %tx.status,
                attempts = tx.attempts,
                amount = %tx.amount,
                "final transaction state"
            );
        }
    }
}
