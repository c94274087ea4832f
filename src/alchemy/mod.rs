//! Alchemy brewing core: recipe catalog, matching engine and discovery ledger.
//!
//! The catalog is loaded once per session, every brew attempt is decided by
//! [`matching::evaluate`] (pure) plus a yield roll, and successful brews are
//! recorded in the [`ledger::DiscoveryLedger`]. [`session::Session`] wires the
//! three together for callers.

pub mod catalog;
pub mod collation;
pub mod dex;
pub mod errors;
pub mod ledger;
pub mod matching;
pub mod session;
pub mod store;
pub mod types;

pub use catalog::{
    derive_materials, load_catalog, Catalog, CatalogPaths, MaterialOrigin, MaterialSeed,
    RecipeSeed,
};
pub use collation::{sort_names, Collation};
pub use dex::{dex_entries, DexEntry, DexFilter};
pub use errors::AlchemyError;
pub use ledger::{
    load_names, progress_of, reconciled, save_names, DiscoveryLedger, DEFAULT_LEDGER_KEY,
};
pub use matching::{attempt_brew, evaluate, roll_yield, set_equals, Verdict};
pub use session::Session;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SledStore};
pub use types::*;
