// Report generation from analyzer snapshots

use crate::analyzer::Analyzer;
use crate::card::{CardImage, CardProps};
use crate::view::{AnalyzerView, ItemsView, LOADING, NO_RESULTS, Overview};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Html,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "html" => Some(ReportFormat::Html),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// Everything a report needs about one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub view: AnalyzerView,
}

impl ReportData {
    pub fn from_analyzer(analyzer: &Analyzer) -> Self {
        Self {
            query: analyzer.query().to_string(),
            target: analyzer.state().last_target.clone(),
            view: analyzer.view(),
        }
    }
}

pub fn generate_report(data: &[ReportData], format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(data.iter().map(generate_text_report).collect()),
        ReportFormat::Json => generate_json_report(data),
        ReportFormat::Html => Ok(generate_html_report(data)),
        ReportFormat::Markdown => Ok(data
            .iter()
            .map(generate_markdown_report)
            .collect::<Vec<_>>()
            .join("\n---\n\n")),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                          SITELENS SITE REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Query:        {}\n", data.query));
    if let Some(ref target) = data.target {
        report.push_str(&format!("Fetched:      {}\n", target));
    }
    report.push_str(&format!("Items:        {}\n", data.view.cards().len()));
    report.push('\n');

    if let Some(notice) = data.view.error_notice() {
        report.push_str(&format!("[ERROR] {}\n\n", notice));
    }

    report.push_str(RULE);
    report.push_str("OVERVIEW\n");
    report.push_str(RULE);
    report.push('\n');

    if data.view.loading {
        report.push_str(&format!("  {}\n\n", LOADING));
    } else if let Some(ref overview) = data.view.overview {
        report.push_str(&format!("{}\n\n", overview.name));
        report.push_str("Description:\n");
        report.push_str(&wrap_text(&overview.description, 80, "  "));
        report.push('\n');
        report.push_str(&format!("Theme:        {}\n", overview.theme));
        report.push_str(&format!("Created:      {}\n", overview.created));
        report.push_str(&format!("Last Updated: {}\n\n", overview.updated));
    } else {
        report.push_str("  (none)\n\n");
    }

    report.push_str(RULE);
    report.push_str("ITEMS\n");
    report.push_str(RULE);
    report.push('\n');

    match &data.view.items {
        ItemsView::Empty => report.push_str(&format!("{}\n\n", NO_RESULTS)),
        ItemsView::Cards(cards) => {
            for (idx, card) in cards.iter().enumerate() {
                report.push_str(&format!("[{}] {}\n", idx + 1, card.title));
                match card.image() {
                    CardImage::Image(src) => {
                        report.push_str(&format!("Image:        {}\n", src))
                    }
                    CardImage::Placeholder => report.push_str("Image:        [No Image]\n"),
                }
                report.push_str(&format!("Last Updated: {}\n", card.last_updated));
                report.push_str(&format!(
                    "Content:      {}\n",
                    card.content_url.as_deref().unwrap_or("-")
                ));
                report.push_str(&format!(
                    "Source:       {}\n",
                    card.source_url.as_deref().unwrap_or("-")
                ));
                report.push('\n');
                report.push_str(&wrap_text(&card.description, 80, "  "));
                report.push('\n');
                report.push_str(THIN_RULE);
                report.push('\n');
            }
        }
    }

    report.push_str("Generated by Sitelens\n\n");
    report
}

pub fn generate_json_value(data: &ReportData) -> serde_json::Value {
    serde_json::json!({
        "query": data.query,
        "target": data.target,
        "loading": data.view.loading,
        "error": data.view.error,
        "overview": data.view.overview,
        "items": data.view.cards(),
    })
}

pub fn generate_json_report(data: &[ReportData]) -> Result<String, serde_json::Error> {
    let sites: Vec<serde_json::Value> = data.iter().map(generate_json_value).collect();
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitelens",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
            },
            "sites": sites,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_html_report(data: &[ReportData]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Sitelens Report</title>\n<style>\n");
    html.push_str(HTML_STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    for site in data {
        html.push_str("<section class=\"site\">\n");
        html.push_str(&format!(
            "<p class=\"query\">{}</p>\n",
            escape_html(site.target.as_deref().unwrap_or(&site.query))
        ));

        if let Some(notice) = site.view.error_notice() {
            html.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(notice)));
        }

        if site.view.loading {
            html.push_str(&format!("<p class=\"loading\">{}</p>\n", LOADING));
        } else if let Some(ref overview) = site.view.overview {
            html.push_str(&html_overview(overview));
        }

        match &site.view.items {
            ItemsView::Empty => html.push_str(&format!("<p>{}</p>\n", NO_RESULTS)),
            ItemsView::Cards(cards) => {
                html.push_str("<div class=\"cards\">\n");
                for card in cards {
                    html.push_str(&html_card(card));
                }
                html.push_str("</div>\n");
            }
        }
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

const HTML_STYLE: &str = "body { font-family: sans-serif; padding: 16px; }
.overview { background: #f9f9f9; padding: 16px; border: 1px solid #ddd; border-radius: 4px; margin-bottom: 20px; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 16px; }
.card { border: 1px solid #ddd; border-radius: 4px; padding: 16px; box-shadow: 0px 2px 4px rgba(0, 0, 0, 0.1); }
.card img { width: 100%; height: 150px; object-fit: cover; border-radius: 4px; }
.placeholder { height: 150px; background-color: #f0f0f0; border-radius: 4px; display: flex; align-items: center; justify-content: center; }
.card a { display: block; color: #007acc; margin-top: 4px; }
.error { color: red; }
";

fn html_overview(overview: &Overview) -> String {
    format!(
        "<div class=\"overview\">\n<h3>{}</h3>\n<p>Description: {}</p>\n<p>Theme: {}</p>\n<p>Created: {}</p>\n<p>Last Updated: {}</p>\n</div>\n",
        escape_html(&overview.name),
        escape_html(&overview.description),
        escape_html(&overview.theme),
        escape_html(&overview.created),
        escape_html(&overview.updated),
    )
}

fn html_card(card: &CardProps) -> String {
    let mut html = String::from("<div class=\"card\">\n");
    match card.image() {
        CardImage::Image(src) => html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape_html(src),
            escape_html(&card.title)
        )),
        CardImage::Placeholder => {
            html.push_str("<div class=\"placeholder\">No Image</div>\n");
        }
    }
    html.push_str(&format!("<h4>{}</h4>\n", escape_html(&card.title)));
    html.push_str(&format!("<p>{}</p>\n", escape_html(&card.description)));
    html.push_str(&format!(
        "<p>Last Updated: {}</p>\n",
        escape_html(&card.last_updated)
    ));
    if let Some(ref url) = card.content_url {
        html.push_str(&html_link(url, "Open Content"));
    }
    if let Some(ref url) = card.source_url {
        html.push_str(&html_link(url, "Open Source"));
    }
    html.push_str("</div>\n");
    html
}

fn html_link(url: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>\n",
        escape_html(url),
        label
    )
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut md = String::new();

    match data.view.overview {
        Some(ref overview) if !data.view.loading => {
            md.push_str(&format!("# {}\n\n", escape_markdown(&overview.name)));
            md.push_str(&format!("{}\n\n", escape_markdown(&overview.description)));
            md.push_str("| Field | Value |\n|---|---|\n");
            md.push_str(&format!("| Theme | {} |\n", escape_markdown(&overview.theme)));
            md.push_str(&format!("| Created | {} |\n", escape_markdown(&overview.created)));
            md.push_str(&format!(
                "| Last Updated | {} |\n\n",
                escape_markdown(&overview.updated)
            ));
        }
        _ => md.push_str(&format!("# {}\n\n", escape_markdown(&data.query))),
    }

    if let Some(ref target) = data.target {
        md.push_str(&format!(
            "Fetched from [{}]({})\n\n",
            escape_markdown(target),
            markdown_destination(target)
        ));
    }

    if let Some(notice) = data.view.error_notice() {
        md.push_str(&format!("> **Error:** {}\n\n", notice));
    }

    md.push_str("## Items\n\n");
    match &data.view.items {
        ItemsView::Empty => md.push_str(&format!("_{}_\n", NO_RESULTS)),
        ItemsView::Cards(cards) => {
            for card in cards {
                md.push_str(&format!("### {}\n\n", escape_markdown(&card.title)));
                if let CardImage::Image(src) = card.image() {
                    md.push_str(&format!(
                        "![{}]({})\n\n",
                        escape_markdown(&card.title),
                        markdown_destination(src)
                    ));
                }
                md.push_str(&format!("{}\n\n", escape_markdown(&card.description)));
                md.push_str(&format!(
                    "- Last Updated: {}\n",
                    escape_markdown(&card.last_updated)
                ));
                if let Some(ref url) = card.content_url {
                    md.push_str(&format!("- [Open Content]({})\n", markdown_destination(url)));
                }
                if let Some(ref url) = card.source_url {
                    md.push_str(&format!("- [Open Source]({})\n", markdown_destination(url)));
                }
                md.push('\n');
            }
        }
    }

    md
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Link destination in `<...>` form, which tolerates spaces and parentheses.
fn markdown_destination(url: &str) -> String {
    let mut dest = String::with_capacity(url.len() + 2);
    dest.push('<');
    for c in url.chars() {
        match c {
            '<' | '>' | '\\' => {
                dest.push('\\');
                dest.push(c);
            }
            '\n' | '\r' => dest.push_str("%0A"),
            _ => dest.push(c),
        }
    }
    dest.push('>');
    dest
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > width - indent.len() && !current_line.is_empty() {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
