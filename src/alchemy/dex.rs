//! Discovery book view: which recipes are unlocked, filtered by a keyword.

use std::collections::BTreeSet;

use crate::alchemy::catalog::Catalog;
use crate::alchemy::types::Recipe;

/// Filter for [`dex_entries`].
#[derive(Debug, Clone, Default)]
pub struct DexFilter {
    /// Substring matched against recipe names and material names. Blank means no filter.
    pub keyword: String,
    /// Include recipes that have not been brewed yet.
    pub show_locked: bool,
}

impl DexFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = keyword.to_string();
        self
    }

    pub fn with_locked(mut self, show_locked: bool) -> Self {
        self.show_locked = show_locked;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DexEntry<'a> {
    pub recipe: &'a Recipe,
    pub unlocked: bool,
}

impl DexEntry<'_> {
    /// One-line rendering. Locked entries hide everything but the material count.
    pub fn render(&self, catalog: &Catalog) -> String {
        if !self.unlocked {
            return format!("？？？（未解鎖） ？？？ × {}", self.recipe.materials.len());
        }
        let materials: Vec<String> = self
            .recipe
            .materials
            .iter()
            .map(|m| catalog.material_label(m))
            .collect();
        format!(
            "{} — {}｜{}",
            self.recipe.display_name(),
            self.recipe.heat,
            materials.join("、")
        )
    }
}

/// Unlocked recipes in catalog order, followed by locked ones when requested,
/// narrowed by the filter keyword.
pub fn dex_entries<'a>(
    catalog: &'a Catalog,
    discovered: &BTreeSet<String>,
    filter: &DexFilter,
) -> Vec<DexEntry<'a>> {
    let keyword = filter.keyword.trim();
    let entry = |recipe: &'a Recipe| DexEntry {
        recipe,
        unlocked: discovered.contains(&recipe.name),
    };
    let unlocked = catalog.recipes().iter().map(entry).filter(|e| e.unlocked);
    let locked = catalog
        .recipes()
        .iter()
        .map(entry)
        .filter(|e| !e.unlocked && filter.show_locked);

    unlocked
        .chain(locked)
        .filter(|e| keyword.is_empty() || matches_keyword(e.recipe, keyword))
        .collect()
}

fn matches_keyword(recipe: &Recipe, keyword: &str) -> bool {
    recipe.name.contains(keyword) || recipe.materials.iter().any(|m| m.contains(keyword))
}
