//! Integration tests for the brew matching engine
//!
//! Covers:
//! - Precondition order (heat before materials)
//! - Set-equality matching against the fixture catalog
//! - Yield range and rough uniformity
//! - Purity of the match decision across repeated calls

mod common;

use cauldron::alchemy::{
    attempt_brew, evaluate, set_equals, BrewOutcome, HeatLevel, Selection, Verdict, YIELD_MAX,
    YIELD_MIN,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn heat_strategy() -> impl Strategy<Value = Option<HeatLevel>> {
    prop_oneof![
        Just(None),
        Just(Some(HeatLevel::Low)),
        Just(Some(HeatLevel::Medium)),
        Just(Some(HeatLevel::High)),
        Just(Some(HeatLevel::NoneRequired)),
    ]
}

fn material_strategy() -> impl Strategy<Value = Vec<String>> {
    let pool = vec!["人參", "靈芝", "甘草", "薄荷", "當歸", "川芎", "硃砂", "龍骨", "茯苓", "艾葉"];
    prop::collection::vec(prop::sample::select(pool), 0..5)
        .prop_map(|v| v.into_iter().map(str::to_string).collect())
}

#[test]
fn dan_a_examples() {
    let catalog = common::five_recipe_catalog();
    let mut rng = StdRng::seed_from_u64(42);

    let reordered = Selection::new()
        .with_heat(HeatLevel::Low)
        .with_materials(["靈芝", "人參"]);
    let outcome = attempt_brew(&reordered, catalog.recipes(), &mut rng);
    assert_eq!(outcome.recipe().map(|r| r.name.as_str()), Some("丹A"));

    let too_hot = Selection::new()
        .with_heat(HeatLevel::High)
        .with_materials(["靈芝", "人參"]);
    assert_eq!(
        attempt_brew(&too_hot, catalog.recipes(), &mut rng),
        BrewOutcome::NoMatch
    );

    let subset = Selection::new().with_heat(HeatLevel::Low).with_material("人參");
    assert_eq!(
        attempt_brew(&subset, catalog.recipes(), &mut rng),
        BrewOutcome::NoMatch
    );
}

#[test]
fn precondition_order() {
    let catalog = common::five_recipe_catalog();
    let mut rng = StdRng::seed_from_u64(1);

    // no heat wins even with no materials
    assert_eq!(
        attempt_brew(&Selection::new(), catalog.recipes(), &mut rng),
        BrewOutcome::NoHeatSelected
    );
    let materials_only = Selection::new().with_materials(["人參", "靈芝"]);
    assert_eq!(
        attempt_brew(&materials_only, catalog.recipes(), &mut rng),
        BrewOutcome::NoHeatSelected
    );
    for heat in HeatLevel::ALL {
        let selection = Selection::new().with_heat(heat);
        assert_eq!(
            attempt_brew(&selection, catalog.recipes(), &mut rng),
            BrewOutcome::NoMaterialsSelected
        );
    }
}

#[test]
fn unreferenced_material_never_matches() {
    let catalog = common::five_recipe_catalog();
    // 艾葉 is listed as a material but used by no recipe
    assert!(catalog.material("艾葉").is_some());
    for heat in HeatLevel::ALL {
        let selection = Selection::new().with_heat(heat).with_material("艾葉");
        assert_eq!(evaluate(&selection, catalog.recipes()), Verdict::NoMatch);
    }
}

#[test]
fn yield_is_within_bounds_over_many_successes() {
    let catalog = common::five_recipe_catalog();
    let selection = Selection::new()
        .with_heat(HeatLevel::High)
        .with_materials(["龍骨", "硃砂"]);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut counts = vec![0u32; (YIELD_MAX - YIELD_MIN + 1) as usize];
    for _ in 0..10_000 {
        match attempt_brew(&selection, catalog.recipes(), &mut rng) {
            BrewOutcome::Success {
                recipe,
                yield_percent,
            } => {
                assert_eq!(recipe.name, "丹D");
                assert!((YIELD_MIN..=YIELD_MAX).contains(&yield_percent));
                counts[(yield_percent - YIELD_MIN) as usize] += 1;
            }
            other => panic!("expected success, got {other:?}"),
        }
    }
    // Every value is reachable and none dominates
    assert!(counts.iter().all(|&c| c > 0), "{counts:?}");
    let max = *counts.iter().max().unwrap();
    let min = *counts.iter().min().unwrap();
    assert!(max < min * 4, "skewed distribution: min {min}, max {max}");
}

proptest! {
    #[test]
    fn prop_set_equals_is_symmetric_and_order_free(
        a in material_strategy(),
        b in material_strategy(),
    ) {
        prop_assert_eq!(set_equals(&a, &b), set_equals(&b, &a));
        let mut reversed = a.clone();
        reversed.reverse();
        prop_assert!(set_equals(&a, &reversed));
        let mut doubled = a.clone();
        doubled.extend(a.iter().cloned());
        prop_assert!(set_equals(&a, &doubled));
    }

    #[test]
    fn prop_match_decision_is_pure(
        heat in heat_strategy(),
        materials in material_strategy(),
        seed in any::<u64>(),
    ) {
        let catalog = common::five_recipe_catalog();
        let mut selection = Selection::new().with_materials(&materials);
        selection.heat = heat;

        let first = evaluate(&selection, catalog.recipes());
        let second = evaluate(&selection, catalog.recipes());
        prop_assert_eq!(first, second);

        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = attempt_brew(&selection, catalog.recipes(), &mut rng);
        match first {
            Verdict::NoHeatSelected => prop_assert_eq!(outcome, BrewOutcome::NoHeatSelected),
            Verdict::NoMaterialsSelected => {
                prop_assert_eq!(outcome, BrewOutcome::NoMaterialsSelected)
            }
            Verdict::NoMatch => prop_assert_eq!(outcome, BrewOutcome::NoMatch),
            Verdict::Matched(recipe) => {
                prop_assert_eq!(outcome.recipe(), Some(recipe));
                prop_assert_eq!(Some(recipe.heat), heat);
            }
        }
    }
}
