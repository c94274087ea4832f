//! Brew matching engine.
//!
//! A brew matches a recipe when the heat is equal and the chosen materials are
//! set-equal to the recipe's materials (order and repeats ignored). The match
//! decision is pure; the yield roll is a separate call that takes the RNG
//! explicitly so callers and tests control the randomness.
//!
//! When several recipes would match the same selection the first one in
//! catalog order is returned.

use rand::Rng;
use std::collections::HashSet;
use std::hash::Hash;

use crate::alchemy::types::{BrewOutcome, Recipe, Selection, YIELD_MAX, YIELD_MIN};

/// Deterministic part of a brew attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    NoHeatSelected,
    NoMaterialsSelected,
    NoMatch,
    Matched(&'a Recipe),
}

/// Set equality over two collections: order-insensitive and duplicate-insensitive.
pub fn set_equals<T, A, B>(a: A, b: B) -> bool
where
    T: Eq + Hash,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let left: HashSet<T> = a.into_iter().collect();
    let right: HashSet<T> = b.into_iter().collect();
    left == right
}

/// Decide which recipe, if any, the selection produces. Heat is checked
/// before materials.
pub fn evaluate<'a>(selection: &Selection, recipes: &'a [Recipe]) -> Verdict<'a> {
    let Some(heat) = selection.heat else {
        return Verdict::NoHeatSelected;
    };
    if selection.materials.is_empty() {
        return Verdict::NoMaterialsSelected;
    }
    recipes
        .iter()
        .find(|recipe| {
            recipe.heat == heat
                && set_equals(
                    recipe.materials.iter().map(String::as_str),
                    selection.materials.iter().map(String::as_str),
                )
        })
        .map_or(Verdict::NoMatch, Verdict::Matched)
}

/// Uniform integer in `[YIELD_MIN, YIELD_MAX]`.
pub fn roll_yield<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(YIELD_MIN..=YIELD_MAX)
}

/// Run one brew attempt: [`evaluate`] plus a yield roll on success. Has no
/// other side effects; unlocking the discovery book is the caller's job.
pub fn attempt_brew<R: Rng + ?Sized>(
    selection: &Selection,
    recipes: &[Recipe],
    rng: &mut R,
) -> BrewOutcome {
    match evaluate(selection, recipes) {
        Verdict::NoHeatSelected => BrewOutcome::NoHeatSelected,
        Verdict::NoMaterialsSelected => BrewOutcome::NoMaterialsSelected,
        Verdict::NoMatch => BrewOutcome::NoMatch,
        Verdict::Matched(recipe) => BrewOutcome::Success {
            recipe: recipe.clone(),
            yield_percent: roll_yield(rng),
        },
    }
}
