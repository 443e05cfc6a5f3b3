use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of diagram a question would benefit from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualType {
    Matrices,
    Geometry,
    Spatial,
    Sets,
    Sequences,
    Graphs,
    Logic,
    Fractals,
    Generic,
}

impl VisualType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualType::Matrices => "matrices",
            VisualType::Geometry => "geometry",
            VisualType::Spatial => "spatial",
            VisualType::Sets => "sets",
            VisualType::Sequences => "sequences",
            VisualType::Graphs => "graphs",
            VisualType::Logic => "logic",
            VisualType::Fractals => "fractals",
            VisualType::Generic => "generic",
        }
    }

    /// Canned advice on what kind of visual to build for this type
    pub fn recommendation(&self) -> &'static str {
        match self {
            VisualType::Matrices => {
                "Matrice interactive avec flèches colorées et animation des rotations"
            }
            VisualType::Geometry => "Formes géométriques 3D avec transformations animées",
            VisualType::Spatial => "Visualisation 3D interactive avec rotation et perspective",
            VisualType::Sets => "Diagrammes de Venn dynamiques avec calculs step-by-step",
            VisualType::Sequences => "Graphique de progression avec courbes et animations",
            VisualType::Graphs => "Réseau interactif avec nœuds et arêtes colorés",
            VisualType::Logic => "Tables de vérité et diagrammes logiques interactifs",
            VisualType::Fractals => "Animation fractale avec zoom progressif",
            VisualType::Generic => "Visualisation adaptée au contenu spécifique",
        }
    }
}

impl fmt::Display for VisualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔥",
            Priority::Medium => "⚡",
            Priority::Low => "💡",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_recommendation() {
        assert_eq!(
            VisualType::Generic.recommendation(),
            "Visualisation adaptée au contenu spécifique"
        );
    }

    #[test]
    fn test_visual_type_serde_label() {
        let json = serde_json::to_string(&VisualType::Sequences).unwrap();
        assert_eq!(json, "\"sequences\"");
        let parsed: VisualType = serde_json::from_str("\"fractals\"").unwrap();
        assert_eq!(parsed, VisualType::Fractals);
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(Priority::High.to_string(), "HIGH");
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"MEDIUM\"");
        assert_eq!(Priority::Low.emoji(), "💡");
    }
}
