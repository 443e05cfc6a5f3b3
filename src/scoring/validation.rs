use super::config::ScoringConfig;
use super::factors::RangeOp;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.keyword_weight == 0 {
        errors.push("scoring.keyword_weight: must be positive".to_string());
    }

    // Keyword groups: an empty keyword would match every question
    for (i, group) in config.keywords.iter().enumerate() {
        if group.keywords.is_empty() {
            errors.push(format!(
                "scoring.keywords[{}]: group '{}' has no keywords",
                i, group.visual_type
            ));
        }
        for (j, keyword) in group.keywords.iter().enumerate() {
            if keyword.trim().is_empty() {
                errors.push(format!("scoring.keywords[{}].keywords[{}]: empty keyword", i, j));
            }
        }
    }

    for (i, rule) in config.category_bonuses.iter().enumerate() {
        if rule.category.trim().is_empty() {
            errors.push(format!("scoring.category_bonuses[{}].category: empty category", i));
        }
        if let Some(ref required) = rule.requires_any {
            if required.is_empty() {
                errors.push(format!(
                    "scoring.category_bonuses[{}].requires_any: list is empty, omit it instead",
                    i
                ));
            }
        }
    }

    for (i, bucket) in config.difficulty_buckets.iter().enumerate() {
        if let Err(e) = RangeOp::parse(&bucket.range) {
            errors.push(format!(
                "scoring.difficulty_buckets[{}].range: invalid '{}' - {}",
                i, bucket.range, e
            ));
        }
    }

    // Thresholds must be reachable and ordered
    let t = &config.thresholds;
    for (name, value) in [
        ("visual_needed", t.visual_needed),
        ("medium", t.medium),
        ("high", t.high),
    ] {
        if value > config.max_score {
            errors.push(format!(
                "scoring.thresholds.{}: {} exceeds max_score {}",
                name, value, config.max_score
            ));
        }
    }
    if t.medium > t.high {
        errors.push(format!(
            "scoring.thresholds: medium ({}) must not exceed high ({})",
            t.medium, t.high
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{CategoryBonus, DifficultyBucket, KeywordGroup, Thresholds, VisualType};

    #[test]
    fn test_default_config_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_difficulty_range() {
        let config = ScoringConfig {
            difficulty_buckets: vec![DifficultyBucket {
                range: "hard".to_string(),
                bonus: 5,
            }],
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.difficulty_buckets[0].range"));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let config = ScoringConfig {
            keywords: vec![KeywordGroup {
                visual_type: VisualType::Logic,
                keywords: vec!["schéma".to_string(), "  ".to_string()],
            }],
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.keywords[0].keywords[1]"));
    }

    #[test]
    fn test_empty_group_rejected() {
        let config = ScoringConfig {
            keywords: vec![KeywordGroup {
                visual_type: VisualType::Graphs,
                keywords: vec![],
            }],
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("group 'graphs' has no keywords"));
    }

    #[test]
    fn test_empty_requirement_rejected() {
        let config = ScoringConfig {
            category_bonuses: vec![CategoryBonus {
                category: "logique".to_string(),
                requires_any: Some(vec![]),
                bonus: 25,
            }],
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("requires_any"));
    }

    #[test]
    fn test_threshold_above_max_score() {
        let config = ScoringConfig {
            max_score: 50,
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("thresholds.high"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            keyword_weight: 0,
            thresholds: Thresholds {
                visual_needed: 30,
                medium: 70,
                high: 60,
            },
            difficulty_buckets: vec![DifficultyBucket {
                range: "x".to_string(),
                bonus: 1,
            }],
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
