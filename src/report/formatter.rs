use owo_colors::OwoColorize;
use std::io::IsTerminal;

use super::summary::AnalysisSummary;
use crate::question::Question;
use crate::scoring::{Priority, VisualAnalysis};

const PREVIEW_CHARS: usize = 50;
const MAX_KEYWORDS_SHOWN: usize = 3;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// First 50 characters of the content, always followed by "..."
pub fn content_preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

/// Capitalize the first character, lowercase the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn format_report_header(total: usize) -> String {
    format!(
        "🔍 ANALYSE DES BESOINS EN VISUELS - 60 QUESTIONS TESTIQ\n{}\n\n📊 RAPPORT D'ANALYSE ({} questions échantillon)\n{}",
        "=".repeat(60),
        total,
        "-".repeat(60)
    )
}

/// Multi-line report entry for the `index`-th question (1-based).
pub fn format_analysis_entry(
    index: usize,
    question: &Question,
    analysis: &VisualAnalysis,
    use_colors: bool,
) -> String {
    let status = if analysis.visual_needed {
        "✅ VISUEL REQUIS"
    } else {
        "❌ Pas nécessaire"
    };
    let score = format!("[{:3}/100]", analysis.visual_score);

    let mut lines = Vec::new();
    if use_colors {
        let status = if analysis.visual_needed {
            status.green().bold().to_string()
        } else {
            status.red().to_string()
        };
        let score = match analysis.priority {
            Priority::High => score.red().bold().to_string(),
            Priority::Medium => score.yellow().bold().to_string(),
            Priority::Low => score.dimmed().to_string(),
        };
        lines.push(format!(
            "Q{:2} - {} {} {}",
            index,
            status,
            analysis.priority.emoji(),
            score
        ));
        lines.push(format!("     📝 {}", content_preview(&question.content)));
        lines.push(format!("     🏷️  {}", question.tag().cyan()));
    } else {
        lines.push(format!(
            "Q{:2} - {} {} {}",
            index,
            status,
            analysis.priority.emoji(),
            score
        ));
        lines.push(format!("     📝 {}", content_preview(&question.content)));
        lines.push(format!("     🏷️  {}", question.tag()));
    }

    if analysis.visual_needed {
        if use_colors {
            lines.push(format!("     🎨 Type: {}", analysis.visual_type.bold()));
        } else {
            lines.push(format!("     🎨 Type: {}", analysis.visual_type));
        }
        lines.push(format!("     💡 Recommandation: {}", analysis.recommendation));
        if !analysis.matched_keywords.is_empty() {
            let shown: Vec<&str> = analysis
                .matched_keywords
                .iter()
                .take(MAX_KEYWORDS_SHOWN)
                .map(String::as_str)
                .collect();
            lines.push(format!("     🔍 Mots-clés: {}", shown.join(", ")));
        }
    }

    lines.join("\n")
}

/// Score breakdown for one question, one factor per line.
pub fn format_breakdown(analysis: &VisualAnalysis) -> String {
    if analysis.breakdown.is_empty() {
        return "       (no factor matched)".to_string();
    }
    analysis
        .breakdown
        .iter()
        .map(|f| format!("       {:<10} {:>3} -> {:>3}  {}", f.label, f.before, f.after, f.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Statistical summary and follow-up recommendations.
pub fn format_summary(summary: &AnalysisSummary, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let title = "📈 RÉSUMÉ STATISTIQUE";
    if use_colors {
        lines.push(title.bold().to_string());
    } else {
        lines.push(title.to_string());
    }
    lines.push("=".repeat(40));
    lines.push(format!(
        "Questions nécessitant des visuels: {}/{} ({:.1}%)",
        summary.needs_visual,
        summary.total_analyzed,
        summary.needs_visual_percent()
    ));
    lines.push(format!("🔥 Priorité HAUTE:   {}", summary.priorities.high));
    lines.push(format!("⚡ Priorité MOYENNE: {}", summary.priorities.medium));
    lines.push(format!("💡 Priorité BASSE:   {}", summary.priorities.low));

    lines.push(String::new());
    lines.push("🎨 TYPES DE VISUELS NÉCESSAIRES:".to_string());
    for (visual_type, count) in summary.types_by_count() {
        lines.push(format!(
            "   {}: {} question(s)",
            capitalize(visual_type.as_str()),
            count
        ));
    }

    let focus: Vec<&str> = summary
        .first_types(3)
        .iter()
        .map(|t| t.as_str())
        .collect();
    lines.push(String::new());
    lines.push("🚀 RECOMMANDATIONS:".to_string());
    lines.push(format!(
        "1. Implémenter {} visuels haute priorité en premier",
        summary.priorities.high
    ));
    lines.push(format!("2. Focus sur les types: {}", focus.join(", ")));
    lines.push("3. Questions série C-D-E ont le plus besoin de visuels".to_string());

    lines.join("\n")
}

pub fn format_completion(summary: &AnalysisSummary, use_colors: bool) -> String {
    let line = format!(
        "✅ Analyse terminée - {}/{} questions nécessitent des visuels",
        summary.needs_visual, summary.total_analyzed
    );
    if use_colors {
        line.green().to_string()
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::summary::run_analysis;
    use crate::scoring::{analyze_question, ScoringConfig};

    fn fibonacci() -> (Question, VisualAnalysis) {
        let q = Question::new("Suite de Fibonacci: 1, 1, 2, 3, 5, ?", "numerique", 4, "B");
        let a = analyze_question(&q, &ScoringConfig::default());
        (q, a)
    }

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("court"), "court...");
        let long = "é".repeat(60);
        let preview = content_preview(&long);
        assert_eq!(preview.chars().count(), 53);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_report_header() {
        let header = format_report_header(7);
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], "🔍 ANALYSE DES BESOINS EN VISUELS - 60 QUESTIONS TESTIQ");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[3], "📊 RAPPORT D'ANALYSE (7 questions échantillon)");
        assert_eq!(lines[4], "-".repeat(60));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("sequences"), "Sequences");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_entry_for_needed_visual() {
        let (q, a) = fibonacci();
        let entry = format_analysis_entry(4, &q, &a, false);
        let lines: Vec<&str> = entry.lines().collect();
        assert_eq!(lines[0], "Q 4 - ✅ VISUEL REQUIS ⚡ [ 45/100]");
        assert_eq!(lines[1], "     📝 Suite de Fibonacci: 1, 1, 2, 3, 5, ?...");
        assert_eq!(lines[2], "     🏷️  B/numerique/Diff.4");
        assert_eq!(lines[3], "     🎨 Type: sequences");
        assert_eq!(
            lines[4],
            "     💡 Recommandation: Graphique de progression avec courbes et animations"
        );
        assert_eq!(lines[5], "     🔍 Mots-clés: fibonacci");
    }

    #[test]
    fn test_entry_not_needed_is_short() {
        let q = Question::new("Continuez la séquence: 2, 4, 6, 8, ?", "numerique", 1, "A");
        let a = analyze_question(&q, &ScoringConfig::default());
        let entry = format_analysis_entry(2, &q, &a, false);
        assert!(entry.starts_with("Q 2 - ❌ Pas nécessaire 💡 [ 20/100]"));
        assert_eq!(entry.lines().count(), 3);
    }

    #[test]
    fn test_keywords_capped_at_three() {
        let q = Question::new(
            "Matrice 2x2 avec rotation: trouvez l'élément manquant",
            "spatial",
            3,
            "B",
        );
        let a = analyze_question(&q, &ScoringConfig::default());
        let entry = format_analysis_entry(3, &q, &a, false);
        assert!(entry
            .lines()
            .any(|l| l == "     🔍 Mots-clés: matrice, 2x2, rotation"));
    }

    #[test]
    fn test_summary_text() {
        let summary = run_analysis(&crate::question::sample_questions(), &ScoringConfig::default());
        let text = format_summary(&summary, false);
        assert!(text.contains("Questions nécessitant des visuels: 6/7 (85.7%)"));
        assert!(text.contains("🔥 Priorité HAUTE:   5"));
        assert!(text.contains("   Sequences: 2 question(s)"));
        assert!(text.contains("1. Implémenter 5 visuels haute priorité en premier"));
        assert!(text.contains("2. Focus sur les types: geometry, sequences, matrices"));
        let sequences = text.find("Sequences").unwrap();
        let geometry = text.find("Geometry").unwrap();
        assert!(sequences < geometry);
    }

    #[test]
    fn test_breakdown_lines() {
        let (_, a) = fibonacci();
        let text = format_breakdown(&a);
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().last().unwrap().contains(" 40 ->  45"));
    }

    #[test]
    fn test_completion_line() {
        let summary = run_analysis(&crate::question::sample_questions(), &ScoringConfig::default());
        assert_eq!(
            format_completion(&summary, false),
            "✅ Analyse terminée - 6/7 questions nécessitent des visuels"
        );
    }
}
