//! Process-wide boot registry.
//!
//! Every repository type boots once per process: the first repository created
//! under a boot key computes the key's global scopes, later ones share them.
//! Concurrent first use is serialized on the registry entry, so boot hooks run
//! at most once per key. Hooks run while the entry is locked and must not
//! create repositories or query the registry themselves.

use std::sync::Arc;

use dashmap::DashMap;
use drupal_jsonapi_client::{ClientConfig, ConsumerScope, ScopeSet};
use once_cell::sync::Lazy;
use tracing::debug;

/// Installs class-level scopes when a boot key is first used.
pub type BootHook = Arc<dyn Fn(&mut ScopeSet, &ClientConfig) + Send + Sync>;

static BOOTED: Lazy<DashMap<String, Arc<ScopeSet>>> = Lazy::new(DashMap::new);
static BOOT_HOOKS: Lazy<DashMap<String, Vec<BootHook>>> = Lazy::new(DashMap::new);

/// Register a hook for `key`. Only affects keys that have not booted yet.
pub fn register_boot_hook<F>(key: impl Into<String>, hook: F)
where
    F: Fn(&mut ScopeSet, &ClientConfig) + Send + Sync + 'static,
{
    BOOT_HOOKS.entry(key.into()).or_default().push(Arc::new(hook));
}

/// Global scopes of `key`, booting it on first use.
pub fn boot_if_not_booted(key: &str, config: &ClientConfig) -> Arc<ScopeSet> {
    if let Some(booted) = BOOTED.get(key) {
        return Arc::clone(booted.value());
    }

    let entry = BOOTED
        .entry(key.to_string())
        .or_insert_with(|| Arc::new(boot(key, config)));
    Arc::clone(entry.value())
}

pub fn is_booted(key: &str) -> bool {
    BOOTED.contains_key(key)
}

fn boot(key: &str, config: &ClientConfig) -> ScopeSet {
    let mut scopes = ScopeSet::new();

    let consumer = ConsumerScope::from_config(config);
    if consumer.consumer_id().is_some() {
        scopes.with_scope_instance(consumer);
    }

    let hooks: Vec<BootHook> = BOOT_HOOKS
        .get(key)
        .map(|hooks| hooks.value().clone())
        .unwrap_or_default();
    for hook in &hooks {
        hook(&mut scopes, config);
    }

    debug!(boot_key = key, scopes = scopes.len(), "booted repository");
    scopes
}
