use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of action carried by a sequencer transaction.
///
/// The discriminant doubles as the wire type id, so the order of the variants
/// is part of the transaction format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateAsset,
    MintAsset,
    BurnAsset,
    ModifyAsset,
    Transfer,
    SequencerMsg,
    ImportAsset,
    ExportAsset,
}

impl ActionKind {
    /// Number of known action kinds.
    pub const COUNT: usize = 8;

    /// Every known action kind, ordered by type id.
    pub const ALL: [ActionKind; Self::COUNT] = [
        ActionKind::CreateAsset,
        ActionKind::MintAsset,
        ActionKind::BurnAsset,
        ActionKind::ModifyAsset,
        ActionKind::Transfer,
        ActionKind::SequencerMsg,
        ActionKind::ImportAsset,
        ActionKind::ExportAsset,
    ];

    /// Wire type id of this action kind.
    pub const fn type_id(self) -> u8 {
        self as u8
    }

    /// Dense index, suitable for fixed-size per-kind tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolve a wire type id. Unknown ids yield `None`.
    pub fn from_type_id(type_id: u8) -> Option<Self> {
        Self::ALL.get(type_id as usize).copied()
    }

    /// Stable snake_case label used in logs and metric labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionKind::CreateAsset => "create_asset",
            ActionKind::MintAsset => "mint_asset",
            ActionKind::BurnAsset => "burn_asset",
            ActionKind::ModifyAsset => "modify_asset",
            ActionKind::Transfer => "transfer",
            ActionKind::SequencerMsg => "sequencer_msg",
            ActionKind::ImportAsset => "import_asset",
            ActionKind::ExportAsset => "export_asset",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action payload as carried on the wire: a type id tag plus opaque bytes.
///
/// The tag is kept raw so transactions produced by newer software (with action
/// kinds this build does not know) still decode and index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub type_id: u8,
    #[serde(default)]
    pub payload: Vec<u8>,
}

impl Action {
    pub fn new(kind: ActionKind, payload: Vec<u8>) -> Self {
        Self {
            type_id: kind.type_id(),
            payload,
        }
    }

    /// Action with an arbitrary tag, including ones outside the known set.
    pub fn raw(type_id: u8, payload: Vec<u8>) -> Self {
        Self { type_id, payload }
    }

    pub fn kind(&self) -> Option<ActionKind> {
        ActionKind::from_type_id(self.type_id)
    }
}
