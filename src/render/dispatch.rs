use anyhow::Result;
use tracing::{debug, info};

use super::generator::VisualGenerator;
use super::visuals::SequenceKind;
use crate::question::Question;

pub const FIBONACCI_SAMPLE: &[i64] = &[1, 1, 2, 3, 5, 8, 13];
pub const ARITHMETIC_SAMPLE: &[i64] = &[2, 4, 6, 8, 10, 12];
pub const NUMERIC_CATEGORY_SAMPLE: &[i64] = &[1, 2, 3, 4, 5, 6];

/// Diagram chosen for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    MatrixRotation,
    Venn,
    Sequence(SequenceKind, &'static [i64]),
    SpatialTransformation,
    PatternCompletion,
    LogicDiagram,
}

impl VisualKind {
    pub fn name(&self) -> &'static str {
        match self {
            VisualKind::MatrixRotation => "matrix_rotation",
            VisualKind::Venn => "venn",
            VisualKind::Sequence(..) => "sequence",
            VisualKind::SpatialTransformation => "spatial_transformation",
            VisualKind::PatternCompletion => "pattern_completion",
            VisualKind::LogicDiagram => "logic_diagram",
        }
    }
}

/// What the rules look at: lowercased content and the raw category.
struct Probe<'a> {
    content: String,
    category: &'a str,
}

impl Probe<'_> {
    fn has(&self, needle: &str) -> bool {
        self.content.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.content.contains(n))
    }
}

struct DispatchRule {
    name: &'static str,
    select: fn(&Probe<'_>) -> Option<VisualKind>,
}

/// Checked top to bottom, first hit wins. Keywords overlap between rules
/// ("transformation" and "motif" can share a question), so order matters.
const RULES: &[DispatchRule] = &[
    DispatchRule {
        name: "matrice+rotation",
        select: |p| (p.has("matrice") && p.has("rotation")).then_some(VisualKind::MatrixRotation),
    },
    DispatchRule {
        name: "sets",
        select: |p| {
            p.has_any(&["inclusion-exclusion", "ensemble", "∪", "∩", "venn"])
                .then_some(VisualKind::Venn)
        },
    },
    DispatchRule {
        name: "fibonacci",
        select: |p| {
            p.has("fibonacci")
                .then_some(VisualKind::Sequence(SequenceKind::Fibonacci, FIBONACCI_SAMPLE))
        },
    },
    DispatchRule {
        name: "progression",
        select: |p| {
            p.has_any(&["progression", "suite", "séquence"])
                .then_some(VisualKind::Sequence(SequenceKind::Arithmetic, ARITHMETIC_SAMPLE))
        },
    },
    DispatchRule {
        name: "spatial keywords",
        select: |p| {
            p.has_any(&["transformation", "3d", "4d", "géométrique", "spatial"])
                .then_some(VisualKind::SpatialTransformation)
        },
    },
    DispatchRule {
        name: "pattern keywords",
        select: |p| {
            p.has_any(&["motif", "pattern", "complétez", "manque"])
                .then_some(VisualKind::PatternCompletion)
        },
    },
    DispatchRule {
        name: "logic keywords",
        // "si.*alors" is matched as literal text
        select: |p| {
            p.has_any(&["logique", "si.*alors", "déduction", "raisonnement"])
                .then_some(VisualKind::LogicDiagram)
        },
    },
    DispatchRule {
        name: "category spatial",
        select: |p| {
            (p.category == "spatial").then(|| {
                if p.has("matrice") || p.has("rotation") {
                    VisualKind::MatrixRotation
                } else if p.has("transformation") {
                    VisualKind::SpatialTransformation
                } else {
                    VisualKind::PatternCompletion
                }
            })
        },
    },
    DispatchRule {
        name: "category logique",
        select: |p| {
            (p.category == "logique").then(|| {
                if p.has("ensemble") || p.has("∪") {
                    VisualKind::Venn
                } else {
                    VisualKind::LogicDiagram
                }
            })
        },
    },
    DispatchRule {
        name: "category numerique",
        select: |p| {
            (p.category == "numerique").then_some(VisualKind::Sequence(
                SequenceKind::Arithmetic,
                NUMERIC_CATEGORY_SAMPLE,
            ))
        },
    },
];

/// The diagram the decision list picks for `question`, if any.
pub fn select_visual(question: &Question) -> Option<VisualKind> {
    let probe = Probe {
        content: question.content_lower(),
        category: &question.category,
    };
    RULES.iter().find_map(|rule| {
        let kind = (rule.select)(&probe)?;
        debug!(rule = rule.name, visual = kind.name(), "dispatch rule matched");
        Some(kind)
    })
}

/// Render `kind` for `question`.
pub fn render_kind(kind: VisualKind, question: &Question, generator: &VisualGenerator) -> Result<String> {
    match kind {
        VisualKind::MatrixRotation => generator.matrix_rotation(),
        VisualKind::Venn => generator.venn_diagram(),
        VisualKind::Sequence(sequence, data) => generator.sequence(sequence, data),
        VisualKind::SpatialTransformation => generator.spatial_transformation(question),
        VisualKind::PatternCompletion => generator.pattern_completion(),
        VisualKind::LogicDiagram => generator.logic_diagram(),
    }
}

/// Data URI of the diagram for `question`, or an empty string when no rule
/// applies.
pub fn generate_visual_for_question(
    question_id: &str,
    question: &Question,
    generator: &VisualGenerator,
) -> Result<String> {
    let Some(kind) = select_visual(question) else {
        info!(question = question_id, "no visual for question");
        return Ok(String::new());
    };
    let uri = render_kind(kind, question, generator)?;
    info!(
        question = question_id,
        visual = kind.name(),
        chars = uri.len(),
        "rendered visual"
    );
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::encode::DATA_URI_PREFIX;
    use crate::render::RenderConfig;

    fn select(content: &str, category: &str) -> Option<VisualKind> {
        select_visual(&Question::with_category(content, category))
    }

    fn small() -> VisualGenerator {
        VisualGenerator::new(&RenderConfig {
            dpi: 10,
            ..RenderConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_matrice_and_rotation_win_regardless_of_category() {
        for category in ["spatial", "logique", "numerique", "", "verbal"] {
            assert_eq!(
                select("Matrice avec rotation et ensemble", category),
                Some(VisualKind::MatrixRotation)
            );
        }
    }

    #[test]
    fn test_matrice_alone_is_not_enough() {
        assert_eq!(select("Une matrice simple", ""), None);
        assert_eq!(select("Une matrice simple", "spatial"), Some(VisualKind::MatrixRotation));
    }

    #[test]
    fn test_set_triggers() {
        for content in [
            "Principe inclusion-exclusion",
            "Deux ensembles",
            "A ∪ B",
            "A ∩ B",
            "Diagramme de VENN",
        ] {
            assert_eq!(select(content, ""), Some(VisualKind::Venn), "{}", content);
        }
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            select("Suite de Fibonacci", ""),
            Some(VisualKind::Sequence(SequenceKind::Fibonacci, FIBONACCI_SAMPLE))
        );
        assert_eq!(
            select("Continuez la séquence", ""),
            Some(VisualKind::Sequence(SequenceKind::Arithmetic, ARITHMETIC_SAMPLE))
        );
        // "suite" wins over the spatial keywords that come later
        assert_eq!(
            select("Suite de transformations 3D", ""),
            Some(VisualKind::Sequence(SequenceKind::Arithmetic, ARITHMETIC_SAMPLE))
        );
    }

    #[test]
    fn test_transformation_beats_motif() {
        assert_eq!(
            select("Transformation du motif", ""),
            Some(VisualKind::SpatialTransformation)
        );
        assert_eq!(select("Complétez le motif", ""), Some(VisualKind::PatternCompletion));
    }

    #[test]
    fn test_logic_keywords_literal() {
        assert_eq!(select("Par déduction", ""), Some(VisualKind::LogicDiagram));
        assert_eq!(select("règle si.*alors", ""), Some(VisualKind::LogicDiagram));
        // Not a regex: "si A alors B" alone does not match
        assert_eq!(select("si A alors B", ""), None);
    }

    #[test]
    fn test_category_fallbacks() {
        assert_eq!(select("Quelle figure ?", "spatial"), Some(VisualKind::PatternCompletion));
        assert_eq!(select("Quelle figure ?", "logique"), Some(VisualKind::LogicDiagram));
        assert_eq!(
            select("Quel nombre ?", "numerique"),
            Some(VisualKind::Sequence(SequenceKind::Arithmetic, NUMERIC_CATEGORY_SAMPLE))
        );
    }

    #[test]
    fn test_category_is_case_sensitive() {
        assert_eq!(select("Quelle figure ?", "Spatial"), None);
    }

    #[test]
    fn test_no_rule_gives_empty_string() {
        let question = Question::with_category("Quel mot est l'intrus ?", "verbal");
        let uri = generate_visual_for_question("Q1", &question, &small()).unwrap();
        assert_eq!(uri, "");
    }

    #[test]
    fn test_rendered_question_is_data_uri() {
        let question = Question::with_category(
            "Matrice 2x2 avec rotation: trouvez l'élément manquant",
            "spatial",
        );
        let uri = generate_visual_for_question("Q14", &question, &small()).unwrap();
        assert!(uri.starts_with(DATA_URI_PREFIX));
        assert!(uri.len() > DATA_URI_PREFIX.len());
    }

    #[test]
    fn test_rule_names_unique() {
        let mut names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }
}
