//! Command-line interface for gvk-scan
//! Lists the group/version/kind of every document in a multi-document YAML stream.
//!
//! Usage:
//!   gvk-scan [`<path>`] [--strategy `<name>`] [--format `<format>`]  - Scan a file, `-` for stdin, or the built-in sample
//!   gvk-scan list-strategies                                   - List all available strategies

use clap::{Arg, Command};
use gvk_scan::gvk::extract::Identifier;
use gvk_scan::gvk::pipeline::StreamLoader;
use gvk_scan::gvk::testing::SAMPLE;
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let loader = StreamLoader::new();

    let matches = Command::new("gvk-scan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract group/version/kind identifiers from multi-document YAML")
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("path")
                .help("File to scan, '-' for stdin; the built-in sample when omitted")
                .index(1),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .short('s')
                .help("How document boundaries are found (see list-strategies)")
                .default_value("both"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["text", "json", "yaml"])
                .default_value("text"),
        )
        .subcommand(Command::new("list-strategies").about("List available scan strategies"))
        .get_matches();

    if let Some(("list-strategies", _)) = matches.subcommand() {
        handle_list_strategies_command(&loader);
        return;
    }

    let path = matches.get_one::<String>("path").map(String::as_str);
    let strategy = matches.get_one::<String>("strategy").unwrap();
    let format = matches.get_one::<String>("format").unwrap();
    handle_scan_command(&loader, path, strategy, format);
}

/// Handle the default scan command
fn handle_scan_command(loader: &StreamLoader, path: Option<&str>, strategy: &str, format: &str) {
    let result = match path {
        Some(path) if path != "-" => loader.load_and_execute(path, strategy),
        _ => {
            let source = read_input(path).unwrap_or_else(|e| {
                eprintln!("Error reading input: {}", e);
                std::process::exit(1);
            });
            loader.execute(strategy, &source)
        }
    };

    let identifiers = result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    print!("{}", render(&identifiers, format));
}

/// Handle the list-strategies command
fn handle_list_strategies_command(loader: &StreamLoader) {
    println!("Available strategies:\n");
    for config in loader.registry().list_all() {
        println!("  {}", config.name);
        println!("    {}", config.description);
    }
}

/// The built-in sample, or stdin for `-`
fn read_input(path: Option<&str>) -> std::io::Result<String> {
    match path {
        Some(_) => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
        None => Ok(SAMPLE.to_string()),
    }
}

fn render(identifiers: &[Identifier], format: &str) -> String {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(identifiers)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(identifiers).map_err(|e| e.to_string()),
        _ => Ok(identifiers
            .iter()
            .map(|id| format!("{}\n", id))
            .collect()),
    };
    rendered.unwrap_or_else(|e| {
        eprintln!("Error rendering output: {}", e);
        std::process::exit(1);
    })
}
