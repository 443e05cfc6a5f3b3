use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::VisualType;

/// Visual-need scoring configuration.
///
/// Every field falls back to the built-in rule table when left out, so a
/// config file only has to name what it changes.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   keyword_weight: 15
///   series_bonuses: { A: 5, B: 10, C: 15, D: 20, E: 25 }
///   difficulty_buckets:
///     - { range: ">=7", bonus: 10 }
///     - { range: ">=4", bonus: 5 }
///   thresholds: { visual_needed: 30, medium: 40, high: 60 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Points added for every keyword found in the content
    pub keyword_weight: u32,

    /// Upper clamp for the reported score
    pub max_score: u32,

    /// Keyword groups, checked in order. The first group with a hit decides
    /// the visual type.
    pub keywords: Vec<KeywordGroup>,

    /// Category bonuses. The first rule whose category matches and whose
    /// keyword requirement holds is applied.
    pub category_bonuses: Vec<CategoryBonus>,

    /// Bonus per series letter (exact match)
    pub series_bonuses: BTreeMap<String, u32>,

    /// Difficulty buckets. First matching range wins.
    pub difficulty_buckets: Vec<DifficultyBucket>,

    pub thresholds: Thresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 15,
            max_score: 100,
            keywords: default_keyword_groups(),
            category_bonuses: vec![
                CategoryBonus {
                    category: "spatial".to_string(),
                    requires_any: None,
                    bonus: 20,
                },
                CategoryBonus {
                    category: "logique".to_string(),
                    requires_any: Some(strings(&["ensemble", "venn", "intersection"])),
                    bonus: 25,
                },
                CategoryBonus {
                    category: "numerique".to_string(),
                    requires_any: Some(strings(&["fibonacci", "progression", "spirale"])),
                    bonus: 15,
                },
            ],
            series_bonuses: [("A", 5), ("B", 10), ("C", 15), ("D", 20), ("E", 25)]
                .into_iter()
                .map(|(series, bonus)| (series.to_string(), bonus))
                .collect(),
            difficulty_buckets: vec![
                DifficultyBucket {
                    range: ">=7".to_string(),
                    bonus: 10,
                },
                DifficultyBucket {
                    range: ">=4".to_string(),
                    bonus: 5,
                },
            ],
            thresholds: Thresholds::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_keyword_groups() -> Vec<KeywordGroup> {
    let table: [(VisualType, &[&str]); 8] = [
        (
            VisualType::Matrices,
            &["matrice", "matrix", "2x2", "3x3", "4x4", "rotation", "transformation"],
        ),
        (
            VisualType::Geometry,
            &["géométrie", "forme", "triangle", "carré", "cercle", "rotation", "symétrie"],
        ),
        (
            VisualType::Spatial,
            &["spatial", "rotation", "3d", "4d", "dé", "cube", "perspective"],
        ),
        (
            VisualType::Sets,
            &["ensemble", "venn", "intersection", "union", "∪", "∩", "inclusion-exclusion"],
        ),
        (
            VisualType::Sequences,
            &["motif", "pattern", "séquence", "progression", "fibonacci", "spirale"],
        ),
        (
            VisualType::Graphs,
            &["graphe", "arbre", "réseau", "sommet", "arête", "connexion"],
        ),
        (
            VisualType::Logic,
            &["diagramme", "schéma", "logique booléenne", "table de vérité"],
        ),
        (
            VisualType::Fractals,
            &["fractal", "auto-similaire", "itération", "récursif"],
        ),
    ];

    table
        .into_iter()
        .map(|(visual_type, keywords)| KeywordGroup {
            visual_type,
            keywords: strings(keywords),
        })
        .collect()
}

/// Trigger substrings for one visual type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordGroup {
    pub visual_type: VisualType,
    pub keywords: Vec<String>,
}

/// Bonus for a question category, optionally gated on content keywords.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryBonus {
    pub category: String,

    /// When set, at least one of these must appear in the content
    #[serde(default)]
    pub requires_any: Option<Vec<String>>,

    pub bonus: u32,
}

/// Maps a difficulty range to a bonus.
/// Range format: "<N", "<=N", ">N", ">=N", "N", "N-M" (inclusive range)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DifficultyBucket {
    pub range: String,
    pub bonus: u32,
}

/// Score cut-offs for the need flag and the priority tiers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub visual_needed: u32,
    pub medium: u32,
    pub high: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            visual_needed: 30,
            medium: 40,
            high: 60,
        }
    }
}
