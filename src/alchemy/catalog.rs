//! Recipe catalog loading and normalization.
//!
//! Catalog files are plain JSON so curators can edit recipes without recompiling:
//!
//! - recipes: `[{ "name": "回春丹", "materials": ["人參", "甘草"], "fire": "小火", "type": "丹藥" }]`
//! - materials (optional): `["人參", { "name": "甘草", "emoji": "🌿", "effects": "調和諸藥" }]`
//!
//! When the material source is absent, empty or unreadable the material list is
//! derived from the recipes and sorted with the configured [`Collation`].
//!
//! Two recipes sharing a name, or sharing the same heat and material set, are a
//! catalog authoring mistake. They are loaded anyway (with a warning) and the
//! earlier entry wins everywhere a single recipe is picked.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::alchemy::collation::{sort_names, Collation};
use crate::alchemy::errors::AlchemyError;
use crate::alchemy::types::{HeatLevel, Material, Recipe};
use crate::logutil::escape_log;

/// Recipe record as it appears in a catalog source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSeed {
    pub name: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(alias = "heatLevel", alias = "heat_level", alias = "heat")]
    pub fire: HeatLevel,
    #[serde(
        default,
        rename = "type",
        alias = "resultType",
        alias = "result_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_type: Option<String>,
}

/// Material record as it appears in a catalog source: a bare name or an enriched record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaterialSeed {
    Name(String),
    Record {
        name: String,
        #[serde(default)]
        emoji: Option<String>,
        #[serde(default)]
        effects: Option<String>,
    },
}

impl MaterialSeed {
    fn into_material(self) -> Material {
        match self {
            MaterialSeed::Name(name) => Material::new(&name),
            MaterialSeed::Record {
                name,
                emoji,
                effects,
            } => Material {
                name,
                emoji: emoji.unwrap_or_default(),
                effects: effects.unwrap_or_default(),
            },
        }
    }
}

/// Where the material list of a catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialOrigin {
    /// Taken from the material source.
    Supplied,
    /// Union of all recipe materials.
    Derived,
}

impl fmt::Display for MaterialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialOrigin::Supplied => f.write_str("json"),
            MaterialOrigin::Derived => f.write_str("json-unioned"),
        }
    }
}

/// File locations for [`load_catalog`].
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub recipes: PathBuf,
    pub materials: Option<PathBuf>,
    pub collation: Collation,
}

/// Immutable per-session collection of recipes and materials.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    materials: Vec<Material>,
    origin: MaterialOrigin,
}

impl Catalog {
    /// Normalize seeds from any provider into a catalog. A `None` or empty
    /// material list is replaced by the derived union of recipe materials.
    pub fn from_seeds(
        recipes: Vec<RecipeSeed>,
        materials: Option<Vec<MaterialSeed>>,
        collation: Collation,
    ) -> Self {
        let recipes: Vec<Recipe> = recipes.into_iter().map(normalize_recipe).collect();
        warn_on_conflicts(&recipes);

        let (materials, origin) = match materials {
            Some(seeds) if !seeds.is_empty() => (dedup_materials(seeds), MaterialOrigin::Supplied),
            _ => (
                derive_materials(&recipes, collation),
                MaterialOrigin::Derived,
            ),
        };

        Self {
            recipes,
            materials,
            origin,
        }
    }

    /// Parse catalog JSON text. A malformed recipe document is a
    /// [`AlchemyError::CatalogLoad`]; a malformed material document is ignored
    /// and the material list derived instead.
    pub fn from_json_str(
        recipes_json: &str,
        materials_json: Option<&str>,
        collation: Collation,
    ) -> Result<Self, AlchemyError> {
        let recipes = parse_recipes("recipes", recipes_json)?;
        let materials = materials_json.and_then(|text| parse_materials("materials", text));
        Ok(Self::from_seeds(recipes, materials, collation))
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn origin(&self) -> MaterialOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Names of every recipe in the catalog.
    pub fn recipe_names(&self) -> HashSet<&str> {
        self.recipes.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn contains_recipe(&self, name: &str) -> bool {
        self.recipes.iter().any(|r| r.name == name)
    }

    /// First recipe with the given name.
    pub fn find_recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Display label for a material name; unknown names render bare.
    pub fn material_label(&self, name: &str) -> String {
        match self.material(name) {
            Some(material) => material.label(),
            None => name.to_string(),
        }
    }
}

/// Load a catalog from JSON files. The recipe file is required; the material
/// file is optional and falls back to the derived list when missing or broken.
pub async fn load_catalog(paths: &CatalogPaths) -> Result<Catalog, AlchemyError> {
    let recipes_name = paths.recipes.display().to_string();
    let contents = tokio::fs::read_to_string(&paths.recipes)
        .await
        .map_err(|e| AlchemyError::catalog_load(&recipes_name, e))?;
    let recipes = parse_recipes(&recipes_name, &contents)?;

    let materials = match &paths.materials {
        Some(path) => read_materials(path).await,
        None => None,
    };

    let catalog = Catalog::from_seeds(recipes, materials, paths.collation);
    log::info!(
        "catalog loaded from {} ({}): {} recipes, {} materials",
        recipes_name,
        catalog.origin(),
        catalog.recipes().len(),
        catalog.materials().len()
    );
    Ok(catalog)
}

async fn read_materials(path: &Path) -> Option<Vec<MaterialSeed>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => parse_materials(&path.display().to_string(), &text),
        Err(e) => {
            log::warn!(
                "material source {} unavailable ({}); deriving from recipes",
                path.display(),
                e
            );
            None
        }
    }
}

fn parse_recipes(source_name: &str, text: &str) -> Result<Vec<RecipeSeed>, AlchemyError> {
    serde_json::from_str(text).map_err(|e| AlchemyError::catalog_load(source_name, e))
}

fn parse_materials(source_name: &str, text: &str) -> Option<Vec<MaterialSeed>> {
    match serde_json::from_str::<Vec<MaterialSeed>>(text) {
        Ok(seeds) => Some(seeds),
        Err(e) => {
            log::warn!(
                "material source {} is malformed ({}); deriving from recipes",
                source_name,
                e
            );
            None
        }
    }
}

fn normalize_recipe(seed: RecipeSeed) -> Recipe {
    let mut recipe = Recipe::new(&seed.name, seed.fire);
    for material in &seed.materials {
        recipe = recipe.with_material(material);
    }
    recipe.result_type = seed.result_type.filter(|kind| !kind.is_empty());
    if recipe.materials.is_empty() {
        log::warn!(
            "recipe '{}' has no materials and can never be brewed",
            escape_log(&recipe.name)
        );
    }
    recipe
}

fn dedup_materials(seeds: Vec<MaterialSeed>) -> Vec<Material> {
    let mut seen = HashSet::new();
    let mut materials = Vec::with_capacity(seeds.len());
    for material in seeds.into_iter().map(MaterialSeed::into_material) {
        if seen.insert(material.name.clone()) {
            materials.push(material);
        } else {
            log::warn!("duplicate material '{}' ignored", escape_log(&material.name));
        }
    }
    materials
}

/// Union of every recipe's materials, deduplicated and sorted with `collation`.
pub fn derive_materials(recipes: &[Recipe], collation: Collation) -> Vec<Material> {
    let unique: BTreeSet<&str> = recipes
        .iter()
        .flat_map(|r| r.materials.iter().map(String::as_str))
        .collect();
    let mut names: Vec<String> = unique.into_iter().map(str::to_string).collect();
    sort_names(&mut names, collation);
    names.iter().map(|name| Material::new(name)).collect()
}

fn warn_on_conflicts(recipes: &[Recipe]) {
    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut keys: HashMap<(HeatLevel, BTreeSet<&str>), &str> = HashMap::new();
    for recipe in recipes {
        *names.entry(recipe.name.as_str()).or_default() += 1;
        let key = (
            recipe.heat,
            recipe.materials.iter().map(String::as_str).collect(),
        );
        if let Some(first) = keys.get(&key) {
            log::warn!(
                "recipe '{}' shadows '{}' (same heat and materials); the earlier entry wins",
                escape_log(&recipe.name),
                escape_log(first)
            );
        } else {
            keys.insert(key, recipe.name.as_str());
        }
    }
    for (name, count) in names {
        if count > 1 {
            log::warn!("recipe name '{}' appears {} times", escape_log(name), count);
        }
    }
}
