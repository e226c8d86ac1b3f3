use std::collections::HashSet;

use super::types::{VerbDescriptor, VerbKind};

/// The set of verbs offered to players, in registration order.
///
/// Built once at startup from configuration and handed to the engine and the
/// bridge's game by reference.
#[derive(Debug, Clone, Default)]
pub struct VerbRegistry {
    verbs: Vec<VerbDescriptor>,
}

impl VerbRegistry {
    /// Build a registry. Later duplicates of an id are dropped.
    pub fn new(verbs: Vec<VerbDescriptor>) -> Self {
        let mut seen = HashSet::new();
        let verbs = verbs
            .into_iter()
            .filter(|v| seen.insert(v.id.clone()))
            .collect();
        Self { verbs }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.verbs.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerbDescriptor> {
        self.verbs.iter()
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&VerbDescriptor> {
        self.verbs.iter().find(|v| v.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn by_name(&self, name: &str) -> Option<&VerbDescriptor> {
        self.verbs
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
    }

    /// The direction-aggregating verb, if one is registered.
    pub fn travel_verb(&self) -> Option<&VerbDescriptor> {
        self.verbs.iter().find(|v| v.kind == VerbKind::Travel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_registration_order_and_drops_duplicates() {
        let reg = VerbRegistry::new(vec![
            VerbDescriptor::new("look", "Look", 1010, VerbKind::Intransitive),
            VerbDescriptor::new("take", "Get", 2020, VerbKind::Transitive),
            VerbDescriptor::new("look", "Peer", 9999, VerbKind::Intransitive),
        ]);
        let names: Vec<_> = reg.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Look", "Get"]);
        assert_eq!(reg.by_name("get").map(|v| v.id.as_str()), Some("take"));
        assert!(reg.travel_verb().is_none());
    }
}
