//! # Cauldron - Alchemy Brewing Simulator
//!
//! Cauldron is the engine behind a small alchemy game: players pick materials
//! and a heat setting, the engine checks the combination against a recipe
//! catalog, and every recipe brewed successfully is recorded in a persistent
//! discovery book.
//!
//! ## Features
//!
//! - **Data-driven catalog**: recipes and materials loaded from JSON, with material
//!   lists derived (stroke-order sorted) when no material file is supplied.
//! - **Set-based matching**: material order and repeats never matter; heat must match exactly.
//! - **Discovery book**: unlocked recipes persisted in sled or a JSON file, reconciled
//!   against the current catalog on every start.
//! - **Best-effort persistence**: storage failures are logged and the session keeps going.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cauldron::alchemy::{load_catalog, HeatLevel, Selection, Session, SledStore};
//! use cauldron::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("cauldron.toml").await?;
//!     let catalog = load_catalog(&config.catalog.paths()).await?;
//!     let store = SledStore::open(&config.storage.path)?;
//!
//!     let mut session = Session::start(catalog, store, &config.storage.key);
//!     session.select(Selection::new().with_heat(HeatLevel::Low).with_materials(["人參", "甘草"]));
//!     println!("{}", session.brew(&mut rand::thread_rng()).message());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`alchemy`] - Catalog, matching engine, discovery ledger and session
//! - [`config`] - Configuration management
//! - [`logutil`] - Log line sanitizing helpers

pub mod alchemy;
pub mod config;
pub mod logutil;
