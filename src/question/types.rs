use serde::{Deserialize, Serialize};

/// A quiz question as handed over by the content pipeline.
///
/// Only `content` is required. An empty category or series simply earns no
/// bonus when scored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Question {
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: i64,
    #[serde(default)]
    pub series: String,
}

impl Question {
    pub fn new(
        content: impl Into<String>,
        category: impl Into<String>,
        difficulty: i64,
        series: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            category: category.into(),
            difficulty,
            series: series.into(),
        }
    }

    /// Question with only content and category, the shape the renderer needs
    pub fn with_category(content: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(content, category, 0, "")
    }

    /// Lowercased content, used by every keyword check
    pub fn content_lower(&self) -> String {
        self.content.to_lowercase()
    }

    /// Short "series/category/Diff.N" tag for reports
    pub fn tag(&self) -> String {
        format!("{}/{}/Diff.{}", self.series, self.category, self.difficulty)
    }
}
