//! Test utilities & fixtures.
//! Catalog fixtures live under `tests/test-data-int`.

use cauldron::alchemy::{Catalog, Collation};
use std::path::{Path, PathBuf};

/// Return the path to the static integration test fixture directory.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

/// Five-recipe catalog (丹A..丹E) with an explicit material list.
#[allow(dead_code)]
pub fn five_recipe_catalog() -> Catalog {
    let recipes = std::fs::read_to_string(fixture_root().join("recipes.json")).expect("recipes");
    let materials =
        std::fs::read_to_string(fixture_root().join("materials.json")).expect("materials");
    Catalog::from_json_str(&recipes, Some(&materials), Collation::Stroke).expect("catalog")
}

/// Later catalog revision: keeps 丹A, drops 丹B..丹E, adds 丹F.
#[allow(dead_code)]
pub fn revised_catalog() -> Catalog {
    let recipes =
        std::fs::read_to_string(fixture_root().join("recipes_v2.json")).expect("recipes v2");
    Catalog::from_json_str(&recipes, None, Collation::Stroke).expect("catalog v2")
}
