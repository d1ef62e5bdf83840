use seqchain_types::TxId;

/// State-tree layout conventions the host needs to commit blocks.
///
/// Implementations are stateless; every method only builds keys.
pub trait StateManager: Send + Sync {
    fn height_key(&self) -> Vec<u8>;
    fn timestamp_key(&self) -> Vec<u8>;
    fn fee_key(&self) -> Vec<u8>;

    /// Keys the host must lock to charge fees to `sponsor`.
    fn sponsor_state_keys(&self, sponsor: &[u8; 32]) -> Vec<Vec<u8>>;

    fn incoming_warp_key_prefix(&self, source_chain: &[u8; 32], msg_id: &[u8; 32]) -> Vec<u8>;
    fn outgoing_warp_key_prefix(&self, tx_id: &TxId) -> Vec<u8>;
}
