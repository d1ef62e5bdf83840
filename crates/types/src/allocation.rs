use serde::{Deserialize, Serialize};

/// Initial balance credited at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Hex-encoded 32-byte account address
    pub address: String,
    pub balance: u64,
}

impl Allocation {
    /// Decode the address, or `None` when it is not 32 bytes of hex.
    pub fn address_bytes(&self) -> Option<[u8; 32]> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(self.address.trim_start_matches("0x"), &mut out).ok()?;
        Some(out)
    }
}
