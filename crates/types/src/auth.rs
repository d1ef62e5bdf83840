use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication scheme attached to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    Ed25519,
}

impl AuthKind {
    pub const ALL: [AuthKind; 1] = [AuthKind::Ed25519];

    pub const fn type_id(self) -> u8 {
        self as u8
    }

    pub fn from_type_id(type_id: u8) -> Option<Self> {
        Self::ALL.get(type_id as usize).copied()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AuthKind::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signer identity and scheme tag. Signature verification belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub type_id: u8,
    pub signer: [u8; 32],
}

impl Auth {
    pub fn ed25519(signer: [u8; 32]) -> Self {
        Self {
            type_id: AuthKind::Ed25519.type_id(),
            signer,
        }
    }

    pub fn kind(&self) -> Option<AuthKind> {
        AuthKind::from_type_id(self.type_id)
    }
}
