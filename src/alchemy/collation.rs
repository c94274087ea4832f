//! Ordering for derived material lists.
//!
//! Stroke order is the traditional dictionary order for Traditional Chinese
//! herb names; ICU4X ships it as the `stroke` collation type for `zh`.

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    /// zh-Hant stroke-count ordering.
    #[default]
    Stroke,
    /// Unicode scalar value ordering.
    CodePoint,
}

/// Sort `names` in place using `collation`. Ties under the collator are broken by
/// code point so the result is a total order.
pub fn sort_names(names: &mut [String], collation: Collation) {
    match collation {
        Collation::CodePoint => names.sort(),
        Collation::Stroke => match stroke_collator() {
            Some(collator) => names.sort_by(|a, b| compare_with(&collator, a, b)),
            None => names.sort(),
        },
    }
}

fn stroke_collator() -> Option<Collator> {
    let locale = locale!("zh-u-co-stroke");
    match Collator::try_new(&(&locale).into(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!(
                "stroke collation unavailable ({}); falling back to code point order",
                e
            );
            None
        }
    }
}

fn compare_with(collator: &Collator, a: &str, b: &str) -> Ordering {
    collator.compare(a, b).then_with(|| a.cmp(b))
}
