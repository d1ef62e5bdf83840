use crate::action::ActionKind;
use crate::auth::AuthKind;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Registry errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("type id {0} is already registered")]
    Duplicate(u8),
}

/// Mapping from wire type id to a decoded kind.
///
/// The host uses these tables to decode transactions; the controller only
/// builds them and hands them over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry<K> {
    entries: BTreeMap<u8, K>,
}

impl<K: Copy> TypeRegistry<K> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, type_id: u8, kind: K) -> Result<(), RegistryError> {
        if self.entries.contains_key(&type_id) {
            return Err(RegistryError::Duplicate(type_id));
        }
        self.entries.insert(type_id, kind);
        Ok(())
    }

    fn from_table(table: impl IntoIterator<Item = (u8, K)>) -> Self {
        Self {
            entries: table.into_iter().collect(),
        }
    }

    pub fn lookup(&self, type_id: u8) -> Option<K> {
        self.entries.get(&type_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, K)> + '_ {
        self.entries.iter().map(|(id, kind)| (*id, *kind))
    }
}

impl<K: Copy> Default for TypeRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

pub type ActionRegistry = TypeRegistry<ActionKind>;
pub type AuthRegistry = TypeRegistry<AuthKind>;

static ACTION_REGISTRY: Lazy<ActionRegistry> = Lazy::new(|| {
    TypeRegistry::from_table(ActionKind::ALL.into_iter().map(|kind| (kind.type_id(), kind)))
});

static AUTH_REGISTRY: Lazy<AuthRegistry> = Lazy::new(|| {
    TypeRegistry::from_table(AuthKind::ALL.into_iter().map(|kind| (kind.type_id(), kind)))
});

/// Action registry for every action kind this chain understands.
pub fn action_registry() -> &'static ActionRegistry {
    &ACTION_REGISTRY
}

/// Auth registry for every signature scheme this chain understands.
pub fn auth_registry() -> &'static AuthRegistry {
    &AUTH_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_action_registry_covers_all_kinds() {
        let registry = action_registry();
        assert_eq!(registry.len(), ActionKind::COUNT);
        for kind in ActionKind::ALL {
            assert_eq!(registry.lookup(kind.type_id()), Some(kind));
        }
        assert_eq!(registry.lookup(200), None);
    }

    #[test]
    fn auth_registry_has_ed25519() {
        assert_eq!(auth_registry().lookup(0), Some(AuthKind::Ed25519));
        assert_eq!(auth_registry().len(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ActionRegistry::new();
        registry.register(4, ActionKind::Transfer).unwrap();
        assert_eq!(
            registry.register(4, ActionKind::MintAsset),
            Err(RegistryError::Duplicate(4))
        );
        assert_eq!(registry.lookup(4), Some(ActionKind::Transfer));
    }
}
