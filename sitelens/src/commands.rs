use crate::CLAP_STYLING;
use clap::{arg, command};
use sitelens_core::options::DEFAULT_BASE_URL;
use url::Url;

fn analyzer_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(--"base-url" <URL>)
            .required(false)
            .help("Base URL that relative item links are resolved against")
            .value_parser(clap::value_parser!(Url))
            .default_value(DEFAULT_BASE_URL),
    )
    .arg(
        arg!(--"raw")
            .required(false)
            .help("Fetch the location exactly as given instead of appending /site.json")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(--"allow-any-scheme")
            .required(false)
            .help("Accept locations that do not start with http")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Request timeout in seconds (at least 1)")
            .value_parser(clap::value_parser!(u64).range(1..))
            .default_value("30"),
    )
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitelens")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitelens")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(analyzer_args(
            command!("analyze")
                .about("Fetch a site.json and print an overview of the site and its items")
                .arg(
                    arg!([QUERY])
                        .required(false)
                        .help("Site location, e.g. https://haxtheweb.org (site.json is appended)")
                        .conflicts_with("sites-file"),
                )
                .arg(
                    arg!(-H --"sites-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of site locations to analyze")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, html, markdown")
                        .value_parser(["text", "json", "html", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(--"open-content" <INDEX>)
                        .required(false)
                        .help("Open the content link of the card at INDEX (1-based) in the browser")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"open-source" <INDEX>)
                        .required(false)
                        .help("Open the source link of the card at INDEX (1-based) in the browser")
                        .value_parser(clap::value_parser!(usize)),
                ),
        ))
        .subcommand(analyzer_args(
            command!("ui").about("Launch the interactive terminal analyzer"),
        ))
}
