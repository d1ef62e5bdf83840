use serde::{Deserialize, Serialize};

/// Outcome of executing one transaction, produced by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Resource units consumed
    pub units: u64,
    #[serde(default)]
    pub output: Vec<u8>,
}

impl ExecutionResult {
    pub fn success(units: u64) -> Self {
        Self {
            success: true,
            units,
            output: Vec::new(),
        }
    }

    pub fn failure(units: u64, output: Vec<u8>) -> Self {
        Self {
            success: false,
            units,
            output,
        }
    }
}
