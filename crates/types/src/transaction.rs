use crate::action::{Action, ActionKind};
use crate::auth::Auth;
use blake3::Hasher as Blake3;
use serde::{Deserialize, Serialize};

/// Transaction identifier (32-byte blake3 digest).
pub type TxId = [u8; 32];

const HASH_DOMAIN: &[u8] = b"seqchain-tx";

/// A sequencer chain transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Expiry timestamp (unix milliseconds)
    pub timestamp: i64,
    /// Chain the transaction is bound to
    pub chain_id: [u8; 32],
    /// Maximum fee the signer is willing to pay
    pub max_fee: u64,
    /// Action to execute
    pub action: Action,
    /// Signer identity
    pub auth: Auth,
}

impl Transaction {
    pub fn new(timestamp: i64, chain_id: [u8; 32], max_fee: u64, action: Action, auth: Auth) -> Self {
        Self {
            timestamp,
            chain_id,
            max_fee,
            action,
            auth,
        }
    }

    /// Canonical transaction id
    pub fn id(&self) -> TxId {
        let mut hasher = Blake3::new();
        hasher.update(HASH_DOMAIN);
        hasher.update(&self.timestamp.to_be_bytes());
        hasher.update(&self.chain_id);
        hasher.update(&self.max_fee.to_be_bytes());
        hasher.update(&[self.action.type_id]);
        hasher.update(&(self.action.payload.len() as u64).to_be_bytes());
        hasher.update(&self.action.payload);
        hasher.update(&[self.auth.type_id]);
        hasher.update(&self.auth.signer);
        *hasher.finalize().as_bytes()
    }

    pub fn id_hex(&self) -> String {
        hex::encode(self.id())
    }

    /// Known action kind, or `None` when the tag is outside the known set.
    pub fn action_kind(&self) -> Option<ActionKind> {
        self.action.kind()
    }
}
