use seqchain_types::TxId;
use seqchain_vm::StateManager;

const BALANCE_PREFIX: u8 = 0x00;
const ASSET_PREFIX: u8 = 0x01;
const ORDER_PREFIX: u8 = 0x02;
const LOAN_PREFIX: u8 = 0x03;
const HEIGHT_PREFIX: u8 = 0x04;
const TIMESTAMP_PREFIX: u8 = 0x05;
const FEE_PREFIX: u8 = 0x06;
const INCOMING_WARP_PREFIX: u8 = 0x07;
const OUTGOING_WARP_PREFIX: u8 = 0x08;

/// Asset id of the chain's native token.
pub const NATIVE_ASSET: [u8; 32] = [0u8; 32];

fn key(prefix: u8, parts: &[&[u8]]) -> Vec<u8> {
    let len = 1 + parts.iter().map(|part| part.len()).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    out.push(prefix);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// State-tree layout of the sequencer application.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeqStateManager;

impl SeqStateManager {
    pub fn balance_key(&self, address: &[u8; 32], asset: &[u8; 32]) -> Vec<u8> {
        key(BALANCE_PREFIX, &[address, asset])
    }

    pub fn asset_key(&self, asset: &[u8; 32]) -> Vec<u8> {
        key(ASSET_PREFIX, &[asset])
    }

    pub fn order_key(&self, order: &[u8; 32]) -> Vec<u8> {
        key(ORDER_PREFIX, &[order])
    }

    /// Outstanding amount of `asset` exported to `destination` chain.
    pub fn loan_key(&self, asset: &[u8; 32], destination: &[u8; 32]) -> Vec<u8> {
        key(LOAN_PREFIX, &[asset, destination])
    }
}

impl StateManager for SeqStateManager {
    fn height_key(&self) -> Vec<u8> {
        vec![HEIGHT_PREFIX]
    }

    fn timestamp_key(&self) -> Vec<u8> {
        vec![TIMESTAMP_PREFIX]
    }

    fn fee_key(&self) -> Vec<u8> {
        vec![FEE_PREFIX]
    }

    fn sponsor_state_keys(&self, sponsor: &[u8; 32]) -> Vec<Vec<u8>> {
        vec![self.balance_key(sponsor, &NATIVE_ASSET)]
    }

    fn incoming_warp_key_prefix(&self, source_chain: &[u8; 32], msg_id: &[u8; 32]) -> Vec<u8> {
        key(INCOMING_WARP_PREFIX, &[source_chain, msg_id])
    }

    fn outgoing_warp_key_prefix(&self, tx_id: &TxId) -> Vec<u8> {
        key(OUTGOING_WARP_PREFIX, &[tx_id])
    }
}
