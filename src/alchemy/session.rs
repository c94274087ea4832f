use rand::Rng;

use crate::alchemy::catalog::Catalog;
use crate::alchemy::dex::{dex_entries, DexEntry, DexFilter};
use crate::alchemy::ledger::DiscoveryLedger;
use crate::alchemy::matching::attempt_brew;
use crate::alchemy::store::KeyValueStore;
use crate::alchemy::types::{BrewOutcome, HeatLevel, Progress, Selection};
use crate::logutil::{escape_list, escape_log};

/// # Brewing Session
///
/// Owns everything one player interacts with: the loaded [`Catalog`], the
/// [`DiscoveryLedger`] and the in-progress [`Selection`]. Callers pass the
/// session into each action instead of sharing module-level state.
///
/// ## Lifecycle
///
/// 1. [`Session::start`] loads the ledger and reconciles it with the catalog
/// 2. The player toggles materials and picks a heat level
/// 3. [`Session::brew`] decides the outcome and unlocks the recipe on success
/// 4. [`Session::reset_selection`] clears the choices for the next attempt
///
/// The selection is left untouched by `brew`, so a player can repeat the same
/// attempt.
///
/// ```rust,no_run
/// use cauldron::alchemy::{Catalog, Collation, HeatLevel, MemoryStore, Session};
///
/// let catalog = Catalog::from_json_str(
///     r#"[{ "name": "回春丹", "materials": ["人參", "甘草"], "fire": "小火" }]"#,
///     None,
///     Collation::Stroke,
/// ).unwrap();
/// let mut session = Session::start(catalog, MemoryStore::new(), "dex");
/// session.toggle_material("人參");
/// session.toggle_material("甘草");
/// session.choose_heat(HeatLevel::Low);
/// let outcome = session.brew(&mut rand::thread_rng());
/// assert!(outcome.is_success());
/// ```
pub struct Session<S: KeyValueStore> {
    catalog: Catalog,
    ledger: DiscoveryLedger<S>,
    selection: Selection,
}

impl<S: KeyValueStore> Session<S> {
    pub fn start(catalog: Catalog, store: S, ledger_key: &str) -> Self {
        let mut ledger = DiscoveryLedger::open(store, ledger_key);
        ledger.reconcile(&catalog);
        Self {
            catalog,
            ledger,
            selection: Selection::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &DiscoveryLedger<S> {
        &self.ledger
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns true when the material is selected after the toggle.
    pub fn toggle_material(&mut self, material: &str) -> bool {
        self.selection.toggle(material)
    }

    pub fn choose_heat(&mut self, heat: HeatLevel) {
        self.selection.heat = Some(heat);
    }

    /// Replace the whole selection at once.
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Clear the current selection. No ledger or catalog state changes.
    pub fn reset_selection(&mut self) {
        self.selection.clear();
    }

    /// Attempt a brew with the current selection and unlock the recipe on success.
    pub fn brew<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BrewOutcome {
        let outcome = attempt_brew(&self.selection, self.catalog.recipes(), rng);
        match &outcome {
            BrewOutcome::Success {
                recipe,
                yield_percent,
            } => {
                log::info!(
                    "brewed '{}' at {}% yield",
                    escape_log(&recipe.name),
                    yield_percent
                );
                self.ledger.unlock(&recipe.name, &self.catalog);
            }
            other => log::debug!(
                "brew attempt {} at {:?}: {:?}",
                escape_list(&self.selection.materials),
                self.selection.heat,
                other
            ),
        }
        outcome
    }

    pub fn progress(&self) -> Progress {
        self.ledger.progress(&self.catalog)
    }

    pub fn is_unlocked(&self, recipe_name: &str) -> bool {
        self.ledger.contains(recipe_name)
    }

    pub fn dex(&self, filter: &DexFilter) -> Vec<DexEntry<'_>> {
        dex_entries(&self.catalog, self.ledger.names(), filter)
    }

    /// Startup summary, e.g. `loaded (json): recipes 12, materials 30 | dex 3/12`.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "loaded ({}): recipes {}, materials {} | dex {}",
            self.catalog.origin(),
            self.catalog.recipes().len(),
            self.catalog.materials().len(),
            self.progress()
        );
        if !self.ledger.is_persistent() {
            line.push_str(" (not saved)");
        }
        line
    }
}
