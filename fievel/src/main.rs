use colored::Colorize;
use fievel::commands::command_argument_builder;
use fievel::handle_crawl;

#[tokio::main]
async fn main() {
    if std::env::args_os().len() == 1 {
        println!("{}", "Running in default mode!".blue());
    }

    let matches = command_argument_builder().get_matches();

    if let Err(e) = handle_crawl(&matches).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        eprintln!("Exiting...");
        std::process::exit(1);
    }
}
