use crate::result::ExecutionResult;
use crate::transaction::Transaction;
use blake3::Hasher as Blake3;
use serde::{Deserialize, Serialize};

/// Canonical identifier for a block (32-byte digest).
pub type BlockId = [u8; 32];

const HASH_DOMAIN: &[u8] = b"seqchain-block";

/// A block as delivered by the host once execution has produced its results.
///
/// `results[i]` is the outcome of `txs[i]`; the host guarantees both lists are
/// ordered identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatelessBlock {
    pub parent: BlockId,
    pub height: u64,
    /// Block timestamp (unix milliseconds)
    pub timestamp: i64,
    pub txs: Vec<Transaction>,
    #[serde(default)]
    results: Vec<ExecutionResult>,
}

impl StatelessBlock {
    pub fn new(
        parent: BlockId,
        height: u64,
        timestamp: i64,
        txs: Vec<Transaction>,
        results: Vec<ExecutionResult>,
    ) -> Self {
        Self {
            parent,
            height,
            timestamp,
            txs,
            results,
        }
    }

    /// Compute the block id over header fields and transaction ids.
    pub fn id(&self) -> BlockId {
        let mut hasher = Blake3::new();
        hasher.update(HASH_DOMAIN);
        hasher.update(&self.parent);
        hasher.update(&self.height.to_be_bytes());
        hasher.update(&self.timestamp.to_be_bytes());
        for tx in &self.txs {
            hasher.update(&tx.id());
        }
        *hasher.finalize().as_bytes()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    /// Pair every transaction with its result, or `None` when the counts differ.
    pub fn executed(&self) -> Option<impl Iterator<Item = (&Transaction, &ExecutionResult)>> {
        if self.txs.len() != self.results.len() {
            return None;
        }
        Some(self.txs.iter().zip(self.results.iter()))
    }
}
