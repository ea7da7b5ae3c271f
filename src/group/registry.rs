//! Registry Module
//!
//! Named-group table. A registry is created once at startup and passed
//! to whatever needs it (router state, tests), rather than living in a
//! module-level global; tests get isolated registries for free.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::{Group, Loader};

// == Registry ==
/// Table of named groups; many readers, one writer.
///
/// Groups are never removed once registered.
#[derive(Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group and registers it under `name`, replacing any
    /// previous registration.
    ///
    /// # Arguments
    /// * `name` - Namespace identifier
    /// * `max_bytes` - Cache byte budget; 0 means unbounded
    /// * `loader` - Source of authoritative values on a miss
    pub fn new_group(&self, name: &str, max_bytes: u64, loader: Arc<dyn Loader>) -> Arc<Group> {
        let group = Arc::new(Group::new(name, max_bytes, loader));
        self.groups
            .write()
            .insert(name.to_string(), Arc::clone(&group));
        info!(group = name, max_bytes, "registered group");
        group
    }

    // == Get Group ==
    /// Looks up a group by name.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("groups", &self.groups.read().len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::LoaderFn;

    fn echo_loader() -> Arc<dyn Loader> {
        Arc::new(LoaderFn(|key: &str| Ok(key.as_bytes().to_vec())))
    }

    #[test]
    fn test_lookup_registered_group() {
        let registry = Registry::new();
        registry.new_group("scores", 1024, echo_loader());

        let group = registry.get_group("scores").expect("group registered");
        assert_eq!(group.name(), "scores");
    }

    #[test]
    fn test_unknown_group_is_none() {
        let registry = Registry::new();
        assert!(registry.get_group("missing").is_none());
    }

    #[test]
    fn test_new_group_overwrites() {
        let registry = Registry::new();
        let first = registry.new_group("g", 1024, echo_loader());
        let second = registry.new_group("g", 2048, echo_loader());

        let current = registry.get_group("g").unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert!(!Arc::ptr_eq(&current, &first));
    }

    #[test]
    fn test_registries_are_isolated() {
        let a = Registry::new();
        let b = Registry::new();
        a.new_group("only-in-a", 1024, echo_loader());

        assert!(a.get_group("only-in-a").is_some());
        assert!(b.get_group("only-in-a").is_none());
    }
}
