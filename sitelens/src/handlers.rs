use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitelens_core::analyzer::Analyzer;
use sitelens_core::card::{Card, SystemOpener, UrlOpener};
use sitelens_core::options::AnalyzerOptions;
use sitelens_core::query::QueryPolicy;
use sitelens_core::report::{ReportData, ReportFormat, generate_report, save_report};
use sitelens_fetch::{SiteFetcher, SiteSource};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Install the fmt subscriber; `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load site locations from either a file or a single query argument
pub fn load_sites_from_source(
    query: Option<&String>,
    sites_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(sites_file_path) = sites_file {
        load_sites_from_file(sites_file_path)
    } else if let Some(query) = query {
        Ok(vec![query.clone()])
    } else {
        Err("Either a QUERY or --sites-file must be provided".to_string())
    }
}

/// Load site locations from a file, one per line
///
/// Blank lines and lines starting with `#` are skipped.
pub fn load_sites_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read sites file {}: {}", path.display(), e))?;

    let sites: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if sites.is_empty() {
        return Err(format!("No site locations found in {}", path.display()));
    }

    Ok(sites)
}

/// Build analyzer options from the shared analyze/ui arguments
pub fn build_options(args: &ArgMatches) -> AnalyzerOptions {
    let mut options = AnalyzerOptions::default();

    if let Some(base_url) = args.get_one::<Url>("base-url") {
        options = options.with_base_url(base_url.clone());
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        options = options.with_timeout(*timeout);
    }

    let mut policy = if args.get_flag("raw") {
        QueryPolicy::raw()
    } else {
        QueryPolicy::default()
    };
    policy.require_http_prefix = !args.get_flag("allow-any-scheme");

    options.with_policy(policy)
}

/// Expand `~` in a user-supplied output path
pub fn resolve_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Open a card link by 1-based index. Returns a message describing what happened.
pub fn open_card_link(
    data: &ReportData,
    index: usize,
    source: bool,
    opener: &dyn UrlOpener,
) -> Result<String, String> {
    let cards = data.view.cards();
    let props = index
        .checked_sub(1)
        .and_then(|i| cards.get(i))
        .ok_or_else(|| format!("No card #{} ({} card(s) available)", index, cards.len()))?;

    let card = Card::new(props);
    let label = if source { "source" } else { "content" };
    let opened = if source {
        card.open_source(opener)
    } else {
        card.open_content(opener)
    }
    .map_err(|e| format!("Failed to open {} link: {}", label, e))?;

    if opened {
        Ok(format!("Opened {} link of '{}'", label, props.title))
    } else {
        Ok(format!("'{}' has no {} link", props.title, label))
    }
}

fn fetch_spinner(target: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Analyzing {}", target));
    spinner
}

/// Analyze each site in order and collect one report entry per site.
///
/// Every site gets its own analyzer, so a rejected location never inherits
/// the previous site's results. Returns the reports and the number of failures.
pub async fn analyze_sites<S: SiteSource>(
    sites: &[String],
    options: &AnalyzerOptions,
    source: &S,
    quiet: bool,
) -> (Vec<ReportData>, usize) {
    let mut reports = Vec::with_capacity(sites.len());
    let mut failures = 0;

    for site in sites {
        let mut analyzer = Analyzer::new(options.clone());
        analyzer.set_query(site.clone());
        let spinner = (!quiet).then(|| fetch_spinner(site));
        let ok = analyzer.analyze(source).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        if !ok {
            failures += 1;
            eprintln!("{} {}", "✗".red().bold(), site);
        } else if !quiet {
            eprintln!(
                "{} {} ({} items)",
                "✓".green().bold(),
                site,
                analyzer.state().items.len()
            );
        }

        reports.push(ReportData::from_analyzer(&analyzer));
    }

    (reports, failures)
}

pub async fn handle_analyze(sub_matches: &ArgMatches, quiet: bool) {
    init_tracing();

    let query = sub_matches.get_one::<String>("QUERY");
    let sites_file = sub_matches.get_one::<PathBuf>("sites-file");
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let sites = match load_sites_from_source(query, sites_file) {
        Ok(sites) => sites,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let options = build_options(sub_matches);
    let fetcher = match SiteFetcher::with_timeout(options.timeout_secs) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("{} Failed to create HTTP client: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    debug!("Analyzing {} site(s) with base {}", sites.len(), options.base_url);
    let (reports, failures) = analyze_sites(&sites, &options, &fetcher, quiet).await;

    for data in &reports {
        for (index, source) in [
            (sub_matches.get_one::<usize>("open-content"), false),
            (sub_matches.get_one::<usize>("open-source"), true),
        ]
        .into_iter()
        .filter_map(|(index, source)| index.map(|i| (*i, source)))
        {
            match open_card_link(data, index, source, &SystemOpener) {
                Ok(msg) => eprintln!("{} {}", "→".blue(), msg),
                Err(msg) => eprintln!("{} {}", "⚠".yellow(), msg),
            }
        }
    }

    let content = match generate_report(&reports, format) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{} Failed to render report: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if let Some(output) = sub_matches.get_one::<String>("output") {
        let path = resolve_output_path(output);
        info!("Writing {:?} report to {}", format, path.display());
        match save_report(&content, &path) {
            Ok(()) => eprintln!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            ),
            Err(e) => {
                eprintln!(
                    "{} Failed to save report to {}: {}",
                    "✗".red().bold(),
                    path.display(),
                    e
                );
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", content);
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

pub async fn handle_ui(sub_matches: &ArgMatches) {
    let options = build_options(sub_matches);
    let runtime = tokio::runtime::Handle::current();

    let result = tokio::task::spawn_blocking(move || sitelens_tui::run(options, runtime)).await;
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("Error running TUI: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("TUI task failed: {}", e);
            std::process::exit(1);
        }
    }
}
