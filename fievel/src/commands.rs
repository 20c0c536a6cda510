use clap::arg;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub const DEFAULT_SEED: &str = "https://www.google.com";

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("fievel")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("fievel")
        .about("A depth-bounded, concurrent web crawler")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("The website to be used as the root for the recursive web crawl")
                .default_value(DEFAULT_SEED),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("The cut off depth for the web crawler. Depths beyond it are never visited.")
                .value_parser(clap::value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            arg!(-p --"parallel" <NUM_WORKERS>)
                .required(false)
                .help("The number of workers to run during each depth of the crawl")
                .value_parser(clap::value_parser!(u16).range(1..))
                .default_value("4"),
        )
        .arg(
            arg!(-v --"verbose")
                .required(false)
                .help("Print all non-critical errors along with crawl meta-data")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-q --"quiet")
                .required(false)
                .help("Suppress the startup message and progress spinner")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
}
