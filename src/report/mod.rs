pub mod formatter;
pub mod summary;

pub use formatter::{
    content_preview, format_analysis_entry, format_breakdown, format_completion,
    format_report_header, format_summary, should_use_colors,
};
pub use summary::{analyze_all, run_analysis, summarize, AnalysisSummary, PriorityCounts};
