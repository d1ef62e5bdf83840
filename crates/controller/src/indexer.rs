//! Acceptance indexing: per-transaction records and per-action counters.

use crate::metrics::ActionMetrics;
use seqchain_storage::{store_transaction, KeyValueStore, StorageError, WriteBatch};
use seqchain_types::{action_registry, StatelessBlock};
use tracing::{debug, warn};

/// Indexer errors
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error("block {height} carries {txs} transactions but {results} results")]
    ResultCountMismatch {
        height: u64,
        txs: usize,
        results: usize,
    },
    #[error(transparent)]
    Write(#[from] StorageError),
}

/// Summary of one indexed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexOutcome {
    pub records: usize,
    /// Successful transactions whose action kind was counted
    pub counted: usize,
    /// Successful transactions with an unrecognized action tag
    pub unknown: usize,
}

/// Record every transaction of an accepted block and count successful
/// actions by kind.
///
/// Records are staged in one batch and committed together; on any error the
/// batch is dropped and nothing reaches `store`. Counters bumped before a
/// failed commit stay bumped.
pub fn index_accepted<S: KeyValueStore>(
    store: &S,
    metrics: &ActionMetrics,
    block: &StatelessBlock,
) -> Result<IndexOutcome, IndexError> {
    let executed = block
        .executed()
        .ok_or_else(|| IndexError::ResultCountMismatch {
            height: block.height,
            txs: block.txs.len(),
            results: block.results().len(),
        })?;

    let timestamp = block.timestamp();
    let mut batch = store.new_batch();
    let mut outcome = IndexOutcome::default();

    for (tx, result) in executed {
        let id = tx.id();
        store_transaction(&mut batch, &id, timestamp, result.success, result.units)?;
        outcome.records += 1;

        if !result.success {
            continue;
        }
        match action_registry().lookup(tx.action.type_id) {
            Some(kind) => {
                metrics.record(kind);
                outcome.counted += 1;
            }
            None => {
                warn!(
                    type_id = tx.action.type_id,
                    tx = %hex::encode(id),
                    height = block.height,
                    "unknown action kind, not counted"
                );
                outcome.unknown += 1;
            }
        }
    }

    batch.commit()?;
    debug!(
        height = block.height,
        records = outcome.records,
        counted = outcome.counted,
        "indexed accepted block"
    );
    Ok(outcome)
}
