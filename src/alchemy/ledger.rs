//! Discovery ledger: the set of recipe names a player has ever brewed.
//!
//! Persistence is best effort. The ledger is stored as a JSON array of names
//! under a fixed key; absent, corrupt or mistyped values load as empty, and
//! failed writes are logged and otherwise ignored so the ledger keeps working
//! from memory for the rest of the session.
//!
//! Lifecycle: [`DiscoveryLedger::open`] → [`DiscoveryLedger::reconcile`]
//! against the current catalog (drops stale names and saves) → one
//! [`DiscoveryLedger::unlock`] per successful brew. Entries are never removed
//! once unlocked within a session.

use std::collections::BTreeSet;

use crate::alchemy::catalog::Catalog;
use crate::alchemy::errors::AlchemyError;
use crate::alchemy::store::KeyValueStore;
use crate::alchemy::types::Progress;
use crate::logutil::escape_log;

/// Default storage key for the ledger.
pub const DEFAULT_LEDGER_KEY: &str = "dex_discovered_v1";

/// Read the persisted name set. Never fails; anything unusable reads as empty.
pub fn load_names<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> BTreeSet<String> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            log::warn!("ledger: unable to read '{}': {}", key, e);
            return BTreeSet::new();
        }
    };
    match serde_json::from_str::<serde_json::Value>(&raw) {
        // Non-string elements are skipped rather than rejecting the whole list
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        Ok(_) => {
            log::warn!("ledger: value under '{}' is not a list; starting empty", key);
            BTreeSet::new()
        }
        Err(e) => {
            log::warn!("ledger: value under '{}' is corrupt ({}); starting empty", key, e);
            BTreeSet::new()
        }
    }
}

/// Write the name set as a JSON array.
pub fn save_names<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    names: &BTreeSet<String>,
) -> Result<(), AlchemyError> {
    let data = serde_json::to_string(names)?;
    store.set(key, &data)
}

/// Names from `loaded` that still exist in `catalog`.
pub fn reconciled(loaded: &BTreeSet<String>, catalog: &Catalog) -> BTreeSet<String> {
    let valid = catalog.recipe_names();
    loaded
        .iter()
        .filter(|name| valid.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Count of catalog recipe names present in `names`, out of the catalog size.
pub fn progress_of(names: &BTreeSet<String>, catalog: &Catalog) -> Progress {
    Progress {
        unlocked: catalog
            .recipe_names()
            .into_iter()
            .filter(|name| names.contains(*name))
            .count(),
        total: catalog.len(),
    }
}

pub struct DiscoveryLedger<S: KeyValueStore> {
    store: S,
    key: String,
    discovered: BTreeSet<String>,
    write_failed: bool,
}

impl<S: KeyValueStore> DiscoveryLedger<S> {
    /// Load the ledger from `store` under `key`. No validation against a
    /// catalog happens here; call [`reconcile`](Self::reconcile) next.
    pub fn open(store: S, key: &str) -> Self {
        let discovered = load_names(&store, key);
        log::debug!("ledger: loaded {} names from '{}'", discovered.len(), key);
        Self {
            store,
            key: key.to_string(),
            discovered,
            write_failed: false,
        }
    }

    /// Drop names that are not in `catalog` and persist the result immediately.
    pub fn reconcile(&mut self, catalog: &Catalog) -> &BTreeSet<String> {
        let kept = reconciled(&self.discovered, catalog);
        let dropped = self.discovered.len() - kept.len();
        if dropped > 0 {
            log::info!("ledger: dropped {} names no longer in the catalog", dropped);
        }
        self.discovered = kept;
        self.persist();
        &self.discovered
    }

    /// Record a successful brew of `name`. Returns true when the name was newly
    /// added. Already-known names and names missing from `catalog` are ignored
    /// without touching storage.
    pub fn unlock(&mut self, name: &str, catalog: &Catalog) -> bool {
        if name.is_empty() || self.discovered.contains(name) {
            return false;
        }
        if !catalog.contains_recipe(name) {
            log::debug!("ledger: ignoring unlock of unknown recipe '{}'", escape_log(name));
            return false;
        }
        self.discovered.insert(name.to_string());
        log::info!("ledger: unlocked '{}'", escape_log(name));
        self.persist();
        true
    }

    pub fn progress(&self, catalog: &Catalog) -> Progress {
        progress_of(&self.discovered, catalog)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.discovered.contains(name)
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.discovered
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// False once a write has failed; the ledger is then session-only.
    pub fn is_persistent(&self) -> bool {
        !self.write_failed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        match save_names(&self.store, &self.key, &self.discovered) {
            Ok(()) => self.write_failed = false,
            Err(e) => {
                if !self.write_failed {
                    log::warn!(
                        "ledger: unable to save '{}' ({}); keeping discoveries in memory",
                        self.key,
                        e
                    );
                } else {
                    log::debug!("ledger: save of '{}' failed again: {}", self.key, e);
                }
                self.write_failed = true;
            }
        }
    }
}
