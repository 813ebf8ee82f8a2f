use clap::{Arg, ArgAction, Command};
use serde_json::json;
use sitelens::handlers::*;
use sitelens_core::card::{CardProps, UrlOpener};
use sitelens_core::options::AnalyzerOptions;
use sitelens_core::report::ReportData;
use sitelens_core::view::{AnalyzerView, ItemsView};
use sitelens_fetch::error::Result as FetchResult;
use sitelens_fetch::{FetchError, SiteDescriptor, SiteSource};
use std::cell::RefCell;
use std::sync::Mutex;
use std::io::{self, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use url::Url;

#[derive(Default)]
struct RecordingOpener {
    opened: RefCell<Vec<String>>,
}

impl UrlOpener for RecordingOpener {
    fn open_url(&self, url: &str) -> io::Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

/// Serves a descriptor named after the requested host, or a 404 for `missing`.
#[derive(Default)]
struct HostSource {
    requested: Mutex<Vec<String>>,
}

impl SiteSource for HostSource {
    async fn fetch_site(&self, url: &str) -> FetchResult<SiteDescriptor> {
        self.requested.lock().unwrap().push(url.to_string());
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        if host.starts_with("missing") {
            return Err(FetchError::StatusError {
                status: 404,
                url: url.to_string(),
            });
        }
        SiteDescriptor::from_value(json!({
            "metadata": {"name": format!("Site {}", host)},
            "items": [{"title": format!("{} card", host), "url": "page"}]
        }))
    }
}

fn analyzer_command() -> Command {
    Command::new("analyze")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_parser(clap::value_parser!(Url))
                .default_value("https://haxtheweb.org/"),
        )
        .arg(Arg::new("raw").long("raw").action(ArgAction::SetTrue))
        .arg(
            Arg::new("allow-any-scheme")
                .long("allow-any-scheme")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_parser(clap::value_parser!(u64))
                .default_value("30"),
        )
}

fn report_with_cards() -> ReportData {
    let card = |title: &str, content: Option<&str>, source: Option<&str>| CardProps {
        title: title.to_string(),
        description: "No description".to_string(),
        image: "No image".to_string(),
        last_updated: "N/A".to_string(),
        content_url: content.map(str::to_string),
        source_url: source.map(str::to_string),
    };

    ReportData {
        query: "https://example.com".to_string(),
        target: Some("https://example.com/site.json".to_string()),
        view: AnalyzerView {
            loading: false,
            error: false,
            overview: None,
            items: ItemsView::Cards(vec![
                card(
                    "First",
                    Some("https://haxtheweb.org/first"),
                    Some("https://haxtheweb.org/first.html"),
                ),
                card("Second", None, None),
            ]),
        },
    }
}

#[test]
fn test_load_sites_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://haxtheweb.org")?;
    writeln!(temp_file, "# a comment")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "   https://example.com/site   ")?;

    let path = PathBuf::from(temp_file.path());
    let sites = load_sites_from_file(&path)?;

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0], "https://haxtheweb.org");
    assert_eq!(sites[1], "https://example.com/site");

    Ok(())
}

#[test]
fn test_load_sites_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();

    let path = PathBuf::from(temp_file.path());
    let result = load_sites_from_file(&path);

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No site locations found"));
}

#[test]
fn test_load_sites_from_missing_file() {
    let path = PathBuf::from("/nonexistent/sitelens/sites.txt");
    let result = load_sites_from_file(&path);
    assert!(result.unwrap_err().contains("Failed to read sites file"));
}

#[test]
fn test_load_sites_from_source_single_query() {
    let query = "https://haxtheweb.org".to_string();
    let result = load_sites_from_source(Some(&query), None).unwrap();
    assert_eq!(result, vec!["https://haxtheweb.org".to_string()]);
}

#[test]
fn test_load_sites_from_source_no_input() {
    let result = load_sites_from_source(None, None);
    assert!(
        result
            .unwrap_err()
            .contains("Either a QUERY or --sites-file must be provided")
    );
}

#[test]
fn test_build_options_defaults() {
    let matches = analyzer_command().get_matches_from(["analyze"]);
    let options = build_options(&matches);

    assert_eq!(options.base_url.as_str(), "https://haxtheweb.org/");
    assert_eq!(options.timeout_secs, 30);
    assert!(options.policy.require_http_prefix);
    assert!(options.policy.append_site_json);
}

#[test]
fn test_build_options_overrides() {
    let matches = analyzer_command().get_matches_from([
        "analyze",
        "--base-url",
        "https://example.org/docs/",
        "--raw",
        "--allow-any-scheme",
        "--timeout",
        "5",
    ]);
    let options = build_options(&matches);

    assert_eq!(options.base_url.as_str(), "https://example.org/docs/");
    assert_eq!(options.timeout_secs, 5);
    assert!(!options.policy.require_http_prefix);
    assert!(!options.policy.append_site_json);
}

#[test]
fn test_resolve_output_path_plain() {
    assert_eq!(
        resolve_output_path("reports/out.html"),
        PathBuf::from("reports/out.html")
    );
}

#[test]
fn test_resolve_output_path_expands_tilde() {
    let resolved = resolve_output_path("~/out.md");
    assert!(!resolved.to_string_lossy().starts_with('~'));
    assert!(resolved.ends_with("out.md"));
}

#[test]
fn test_open_card_link_content_and_source() {
    let data = report_with_cards();
    let opener = RecordingOpener::default();

    let msg = open_card_link(&data, 1, false, &opener).unwrap();
    assert!(msg.contains("Opened content link"));
    let msg = open_card_link(&data, 1, true, &opener).unwrap();
    assert!(msg.contains("Opened source link"));

    assert_eq!(
        *opener.opened.borrow(),
        vec![
            "https://haxtheweb.org/first".to_string(),
            "https://haxtheweb.org/first.html".to_string()
        ]
    );
}

#[test]
fn test_open_card_link_missing_link_is_noop() {
    let data = report_with_cards();
    let opener = RecordingOpener::default();

    let msg = open_card_link(&data, 2, false, &opener).unwrap();
    assert!(msg.contains("has no content link"));
    assert!(opener.opened.borrow().is_empty());
}

#[test]
fn test_open_card_link_out_of_range() {
    let data = report_with_cards();
    let opener = RecordingOpener::default();

    assert!(open_card_link(&data, 0, false, &opener).is_err());
    let err = open_card_link(&data, 3, true, &opener).unwrap_err();
    assert!(err.contains("No card #3"));
    assert!(opener.opened.borrow().is_empty());
}

#[tokio::test]
async fn test_analyze_sites_keeps_each_site_separate() {
    let sites = vec![
        "https://one.example.com".to_string(),
        "two.example.com".to_string(),
        "https://missing.example.com".to_string(),
        "https://three.example.com".to_string(),
    ];
    let source = HostSource::default();

    let (reports, failures) =
        analyze_sites(&sites, &AnalyzerOptions::default(), &source, true).await;

    assert_eq!(reports.len(), 4);
    assert_eq!(failures, 2);
    // The rejected line never reaches the network
    assert_eq!(
        *source.requested.lock().unwrap(),
        vec![
            "https://one.example.com/site.json".to_string(),
            "https://missing.example.com/site.json".to_string(),
            "https://three.example.com/site.json".to_string(),
        ]
    );

    let first = &reports[0];
    assert!(!first.view.error);
    assert_eq!(first.view.overview.as_ref().unwrap().name, "Site one.example.com");
    assert_eq!(first.view.cards()[0].title, "one.example.com card");

    let rejected = &reports[1];
    assert_eq!(rejected.query, "two.example.com");
    assert!(rejected.view.error);
    assert_eq!(rejected.target, None);
    assert!(rejected.view.overview.is_none());
    assert!(rejected.view.cards().is_empty());

    let not_found = &reports[2];
    assert!(not_found.view.error);
    assert_eq!(
        not_found.target.as_deref(),
        Some("https://missing.example.com/site.json")
    );
    assert!(not_found.view.cards().is_empty());

    let third = &reports[3];
    assert!(!third.view.error);
    assert_eq!(third.view.cards()[0].title, "three.example.com card");
    assert_eq!(
        third.view.cards()[0].content_url.as_deref(),
        Some("https://haxtheweb.org/page")
    );
}
