use clap::ArgMatches;
use commands::command_argument_builder;
use sitelens::handlers::{handle_analyze, handle_ui};
use sitelens_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    if show_banner(&chosen_command) {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("analyze", primary_command)) => handle_analyze(primary_command, quiet).await,
        Some(("ui", primary_command)) => handle_ui(primary_command).await,
        None => {
            eprintln!("No query given. Try `sitelens analyze <QUERY>` or `sitelens ui`.");
            std::process::exit(1);
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

/// The banner is skipped with --quiet, and when a json/html/markdown report
/// is written to stdout so the output stays parseable.
fn show_banner(matches: &ArgMatches) -> bool {
    if matches.get_flag("quiet") {
        return false;
    }
    match matches.subcommand() {
        Some(("analyze", analyze)) => {
            let structured = analyze
                .get_one::<String>("format")
                .is_some_and(|format| format != "text");
            !structured || analyze.get_one::<String>("output").is_some()
        }
        _ => true,
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
