//! Process-global map of named metrics registries.
//!
//! Tests that exercise more than one component often give each its own
//! registry and address it by name; this keeps the lookup in one place so
//! the inspection and wait helpers can resolve a registry lazily, on every
//! poll.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use prometheus::Registry;
use std::collections::BTreeMap;

/// The name helpers fall back to when no registry name is given.
pub const DEFAULT_REGISTRY_NAME: &str = "default";

lazy_static! {
    static ref REGISTRIES: RwLock<BTreeMap<String, Registry>> = RwLock::new(BTreeMap::new());
}

/// Registers a fresh registry under `name`, or returns the one already
/// registered. Registries are `Arc`-backed, so the returned clone shares
/// state with every other holder of the same name.
pub fn setup(name: &str) -> Registry {
    let mut registries = REGISTRIES.write();
    registries
        .entry(name.to_string())
        .or_insert_with(Registry::new)
        .clone()
}

/// Looks up the registry registered under `name`, without creating one.
pub fn get(name: &str) -> Option<Registry> {
    REGISTRIES.read().get(name).cloned()
}

/// Drops the registry registered under `name`. Existing clones keep working;
/// only the name binding is released.
pub fn stop(name: &str) {
    REGISTRIES.write().remove(name);
}
