use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::alchemy::errors::AlchemyError;

/// Lowest yield percentage a successful brew can report.
pub const YIELD_MIN: u8 = 30;
/// Highest yield percentage a successful brew can report.
pub const YIELD_MAX: u8 = 99;

/// Heat setting for a brew. Serialized with the locale labels used by the
/// catalog files; English aliases are accepted on input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeatLevel {
    #[serde(rename = "小火", alias = "low")]
    Low,
    #[serde(rename = "中火", alias = "medium")]
    Medium,
    #[serde(rename = "大火", alias = "high")]
    High,
    #[serde(rename = "免用火", alias = "none")]
    NoneRequired,
}

impl HeatLevel {
    pub const ALL: [HeatLevel; 4] = [
        HeatLevel::Low,
        HeatLevel::Medium,
        HeatLevel::High,
        HeatLevel::NoneRequired,
    ];

    /// Locale label shown to players and stored in catalog files.
    pub fn label(self) -> &'static str {
        match self {
            HeatLevel::Low => "小火",
            HeatLevel::Medium => "中火",
            HeatLevel::High => "大火",
            HeatLevel::NoneRequired => "免用火",
        }
    }
}

impl fmt::Display for HeatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HeatLevel {
    type Err = AlchemyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "小火" | "low" => Ok(HeatLevel::Low),
            "中火" | "medium" => Ok(HeatLevel::Medium),
            "大火" | "high" => Ok(HeatLevel::High),
            "免用火" | "none" => Ok(HeatLevel::NoneRequired),
            _ => Err(AlchemyError::UnknownHeatLevel(trimmed.to_string())),
        }
    }
}

/// A selectable ingredient. Display metadata defaults to empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub effects: String,
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            emoji: String::new(),
            effects: String::new(),
        }
    }

    pub fn with_emoji(mut self, emoji: &str) -> Self {
        self.emoji = emoji.to_string();
        self
    }

    pub fn with_effects(mut self, effects: &str) -> Self {
        self.effects = effects.to_string();
        self
    }

    /// `"<emoji> <name>"`, or the bare name when no emoji is set.
    pub fn label(&self) -> String {
        if self.emoji.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.emoji, self.name)
        }
    }
}

/// A named target produced from an exact material set at one heat level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    /// Distinct material names in authoring order.
    pub materials: Vec<String>,
    pub heat: HeatLevel,
    /// Display-only classification of the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
}

impl Recipe {
    pub fn new(name: &str, heat: HeatLevel) -> Self {
        Self {
            name: name.to_string(),
            materials: Vec::new(),
            heat,
            result_type: None,
        }
    }

    /// Add a material; repeats are ignored.
    pub fn with_material(mut self, material: &str) -> Self {
        if !self.materials.iter().any(|m| m == material) {
            self.materials.push(material.to_string());
        }
        self
    }

    pub fn with_result_type(mut self, result_type: &str) -> Self {
        self.result_type = Some(result_type.to_string());
        self
    }

    /// Name followed by the result type in full-width brackets when present.
    pub fn display_name(&self) -> String {
        match &self.result_type {
            Some(kind) if !kind.is_empty() => format!("{}（{}）", self.name, kind),
            _ => self.name.clone(),
        }
    }
}

/// One brewing attempt: chosen materials plus an optional heat level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub materials: BTreeSet<String>,
    pub heat: Option<HeatLevel>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heat(mut self, heat: HeatLevel) -> Self {
        self.heat = Some(heat);
        self
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.materials.insert(material.to_string());
        self
    }

    pub fn with_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for material in materials {
            self.materials.insert(material.as_ref().to_string());
        }
        self
    }

    /// Flip a material in or out of the selection. Returns true when it is now selected.
    pub fn toggle(&mut self, material: &str) -> bool {
        if self.materials.remove(material) {
            false
        } else {
            self.materials.insert(material.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.materials.clear();
        self.heat = None;
    }
}

/// Outcome of one brewing attempt. Only `Success` is a match; the rest are
/// ordinary user-input states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewOutcome {
    NoHeatSelected,
    NoMaterialsSelected,
    NoMatch,
    Success { recipe: Recipe, yield_percent: u8 },
}

impl BrewOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BrewOutcome::Success { .. })
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match self {
            BrewOutcome::Success { recipe, .. } => Some(recipe),
            _ => None,
        }
    }

    /// Player-facing message for the outcome.
    pub fn message(&self) -> String {
        match self {
            BrewOutcome::NoHeatSelected => "⚠️ 請先選擇火候。".to_string(),
            BrewOutcome::NoMaterialsSelected => "⚠️ 請至少選擇一味藥材。".to_string(),
            BrewOutcome::NoMatch => {
                "❌ 你煉出了一鍋黑不溜丟的糊糊。（需同時符合配方材料與火候，順序無關）".to_string()
            }
            BrewOutcome::Success {
                recipe,
                yield_percent,
            } => format!(
                "✅ 成功煉成：{}\n本次良率：{}%",
                recipe.display_name(),
                yield_percent
            ),
        }
    }
}

/// Unlocked versus total recipe counts for the discovery book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub unlocked: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.unlocked, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_level_parses_labels_and_aliases() {
        assert_eq!("小火".parse::<HeatLevel>().unwrap(), HeatLevel::Low);
        assert_eq!(" High ".parse::<HeatLevel>().unwrap(), HeatLevel::High);
        assert_eq!("none".parse::<HeatLevel>().unwrap(), HeatLevel::NoneRequired);
        assert!(matches!(
            "lukewarm".parse::<HeatLevel>(),
            Err(AlchemyError::UnknownHeatLevel(ref s)) if s == "lukewarm"
        ));
    }

    #[test]
    fn heat_level_serde_uses_locale_label() {
        let json = serde_json::to_string(&HeatLevel::Medium).unwrap();
        assert_eq!(json, "\"中火\"");
        let back: HeatLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(back, HeatLevel::Medium);
    }

    #[test]
    fn recipe_builder_collapses_repeated_materials() {
        let recipe = Recipe::new("丹A", HeatLevel::Low)
            .with_material("人參")
            .with_material("靈芝")
            .with_material("人參");
        assert_eq!(recipe.materials, vec!["人參", "靈芝"]);
    }

    #[test]
    fn display_name_includes_result_type() {
        let plain = Recipe::new("回春丹", HeatLevel::Low);
        assert_eq!(plain.display_name(), "回春丹");
        let typed = plain.with_result_type("丹藥");
        assert_eq!(typed.display_name(), "回春丹（丹藥）");
    }

    #[test]
    fn selection_toggle_round_trips() {
        let mut selection = Selection::new();
        assert!(selection.toggle("甘草"));
        assert!(selection.materials.contains("甘草"));
        assert!(!selection.toggle("甘草"));
        assert!(selection.materials.is_empty());
    }

    #[test]
    fn material_label_omits_missing_emoji() {
        assert_eq!(Material::new("甘草").label(), "甘草");
        assert_eq!(Material::new("人參").with_emoji("🌿").label(), "🌿 人參");
    }
}
