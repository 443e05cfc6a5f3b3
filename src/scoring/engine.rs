use serde::Serialize;
use tracing::debug;

use super::config::ScoringConfig;
use super::factors::RangeOp;
use super::types::{Priority, VisualType};
use crate::question::Question;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Keyword", "Series", "Difficulty"
    pub description: String, // e.g. "'fibonacci' (sequences)", "matched '>=4'"
    pub before: u32,
    pub after: u32,
}

/// Outcome of scoring one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualAnalysis {
    pub visual_needed: bool,
    pub visual_score: u32,
    pub priority: Priority,
    pub visual_type: VisualType,
    pub matched_keywords: Vec<String>,
    pub recommendation: &'static str,
    #[serde(skip)]
    pub breakdown: Vec<FactorContribution>,
}

/// Score a question's need for a diagram.
///
/// Pure function of the question and config: keyword hits, then category,
/// series and difficulty bonuses, clamped to `max_score`.
pub fn analyze_question(question: &Question, config: &ScoringConfig) -> VisualAnalysis {
    let content = question.content_lower();
    let mut score = 0u32;
    let mut matched_keywords = Vec::new();
    let mut visual_type = None;
    let mut breakdown = Vec::new();

    // Keywords (a keyword listed under several groups counts once per group)
    for group in &config.keywords {
        for keyword in &group.keywords {
            if content.contains(&keyword.to_lowercase()) {
                let before = score;
                score = score.saturating_add(config.keyword_weight);
                matched_keywords.push(keyword.clone());
                visual_type.get_or_insert(group.visual_type);
                breakdown.push(FactorContribution {
                    label: "Keyword".to_string(),
                    description: format!("'{}' ({})", keyword, group.visual_type),
                    before,
                    after: score,
                });
            }
        }
    }

    // Category bonus
    let category_rule = config.category_bonuses.iter().find(|rule| {
        rule.category == question.category
            && rule.requires_any.as_ref().map_or(true, |required| {
                required
                    .iter()
                    .any(|k| content.contains(&k.to_lowercase()))
            })
    });
    if let Some(rule) = category_rule {
        let before = score;
        score = score.saturating_add(rule.bonus);
        breakdown.push(FactorContribution {
            label: "Category".to_string(),
            description: format!("category '{}'", rule.category),
            before,
            after: score,
        });
    }

    // Series bonus
    if let Some(bonus) = config.series_bonuses.get(&question.series) {
        let before = score;
        score = score.saturating_add(*bonus);
        breakdown.push(FactorContribution {
            label: "Series".to_string(),
            description: format!("series {}", question.series),
            before,
            after: score,
        });
    }

    // Difficulty bonus
    if let Some((range, bonus)) = match_difficulty(question.difficulty, config) {
        let before = score;
        score = score.saturating_add(bonus);
        breakdown.push(FactorContribution {
            label: "Difficulty".to_string(),
            description: format!("difficulty {} matched '{}'", question.difficulty, range),
            before,
            after: score,
        });
    }

    let visual_score = score.min(config.max_score);
    let thresholds = &config.thresholds;
    let priority = if visual_score >= thresholds.high {
        Priority::High
    } else if visual_score >= thresholds.medium {
        Priority::Medium
    } else {
        Priority::Low
    };
    let visual_type = visual_type.unwrap_or(VisualType::Generic);

    debug!(
        raw_score = score,
        visual_score,
        priority = %priority,
        visual_type = %visual_type,
        "scored question"
    );

    VisualAnalysis {
        visual_needed: visual_score >= thresholds.visual_needed,
        visual_score,
        priority,
        visual_type,
        matched_keywords,
        recommendation: visual_type.recommendation(),
        breakdown,
    }
}

/// First difficulty bucket whose range matches. Unparsable ranges are skipped
/// (they are reported by `validate_scoring`).
fn match_difficulty(difficulty: i64, config: &ScoringConfig) -> Option<(String, u32)> {
    config.difficulty_buckets.iter().find_map(|bucket| {
        RangeOp::parse(&bucket.range)
            .ok()
            .filter(|range| range.matches(difficulty))
            .map(|_| (bucket.range.clone(), bucket.bonus))
    })
}
