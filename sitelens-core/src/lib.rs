use colored::Colorize;

pub mod analyzer;
pub mod card;
pub mod options;
pub mod query;
pub mod report;
pub mod view;

pub use analyzer::{Analyzer, AnalyzerState, FetchOutcome, FetchTicket};
pub use card::{Card, CardImage, CardProps, SystemOpener, UrlOpener};
pub use options::{AnalyzerOptions, DEFAULT_BASE_URL};
pub use query::{QueryError, QueryPolicy};
pub use view::{AnalyzerView, ItemsView, Overview};

pub fn print_banner() {
    let banner = r#"
   ███████╗██╗████████╗███████╗██╗     ███████╗███╗   ██╗███████╗
   ██╔════╝██║╚══██╔══╝██╔════╝██║     ██╔════╝████╗  ██║██╔════╝
   ███████╗██║   ██║   █████╗  ██║     █████╗  ██╔██╗ ██║███████╗
   ╚════██║██║   ██║   ██╔══╝  ██║     ██╔══╝  ██║╚██╗██║╚════██║
   ███████║██║   ██║   ███████╗███████╗███████╗██║ ╚████║███████║
   ╚══════╝╚═╝   ╚═╝   ╚══════╝╚══════╝╚══════╝╚═╝  ╚═══╝╚══════╝
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "   {} {}\n",
        "site.json inspector".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
