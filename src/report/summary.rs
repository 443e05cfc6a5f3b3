use serde::ser::Serializer;
use serde::Serialize;

use crate::question::Question;
use crate::scoring::{analyze_question, Priority, ScoringConfig, VisualAnalysis, VisualType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Aggregate over a batch of scored questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub total_analyzed: usize,
    pub needs_visual: usize,
    pub priorities: PriorityCounts,
    /// Count per visual type, in the order the types were first seen
    #[serde(serialize_with = "serialize_ordered_counts")]
    pub visual_types: Vec<(VisualType, usize)>,
}

impl AnalysisSummary {
    pub fn record(&mut self, analysis: &VisualAnalysis) {
        self.total_analyzed += 1;
        if analysis.visual_needed {
            self.needs_visual += 1;
        }
        match analysis.priority {
            Priority::High => self.priorities.high += 1,
            Priority::Medium => self.priorities.medium += 1,
            Priority::Low => self.priorities.low += 1,
        }
        match self
            .visual_types
            .iter_mut()
            .find(|(t, _)| *t == analysis.visual_type)
        {
            Some((_, count)) => *count += 1,
            None => self.visual_types.push((analysis.visual_type, 1)),
        }
    }

    /// Share of questions needing a visual, in percent.
    pub fn needs_visual_percent(&self) -> f64 {
        if self.total_analyzed == 0 {
            0.0
        } else {
            self.needs_visual as f64 * 100.0 / self.total_analyzed as f64
        }
    }

    /// Types by descending count; ties keep first-seen order.
    pub fn types_by_count(&self) -> Vec<(VisualType, usize)> {
        let mut sorted = self.visual_types.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// First `n` types in first-seen order.
    pub fn first_types(&self, n: usize) -> Vec<VisualType> {
        self.visual_types.iter().take(n).map(|(t, _)| *t).collect()
    }
}

/// JSON object keyed by type name, preserving order.
fn serialize_ordered_counts<S>(counts: &[(VisualType, usize)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(counts.iter().map(|(t, n)| (t.as_str(), n)))
}

/// Score every question with `config`.
pub fn analyze_all(questions: &[Question], config: &ScoringConfig) -> Vec<VisualAnalysis> {
    questions
        .iter()
        .map(|q| analyze_question(q, config))
        .collect()
}

pub fn summarize(analyses: &[VisualAnalysis]) -> AnalysisSummary {
    let mut summary = AnalysisSummary::default();
    for analysis in analyses {
        summary.record(analysis);
    }
    summary
}

/// Score a batch and aggregate the results.
pub fn run_analysis(questions: &[Question], config: &ScoringConfig) -> AnalysisSummary {
    summarize(&analyze_all(questions, config))
}
