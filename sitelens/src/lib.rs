// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    analyze_sites, build_options, load_sites_from_file, load_sites_from_source, open_card_link,
    resolve_output_path,
};

// Re-export the analyzer surface from sitelens-core
pub use sitelens_core::{
    analyzer::Analyzer,
    options::AnalyzerOptions,
    report::{ReportData, ReportFormat, generate_report},
};
