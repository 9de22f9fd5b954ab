//! httpdtree - inspect Apache httpd configuration files
//!
//! This is the main entry point for the httpdtree CLI.

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand, ValueEnum};
use httpdtree_config::{ConfigTree, JsonAdapter, ParseError};
use httpdtree_core::{OptionsLoader, ParseOptions};
use std::io::IsTerminal;
use std::ops::Range;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// httpdtree - parse httpd configuration files into a tree
#[derive(Parser)]
#[command(name = "httpdtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration tree of a file
    Dump {
        /// Path to the configuration file
        config: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Tree)]
        format: Format,

        /// Reject unbalanced and unclosed sections
        #[arg(long)]
        strict: bool,

        /// Parse options file (TOML or JSON)
        #[arg(long)]
        options: Option<String>,
    },

    /// Check that a configuration file has balanced sections
    Validate {
        /// Path to the configuration file
        config: String,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Tree,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Dump { config, format, strict, options } => {
            let mut parse_options = load_options(options.as_deref())?;
            if strict {
                parse_options = ParseOptions::strict();
            }

            let source = read_source(&config)?;
            let tree = match parse_source(&source, parse_options) {
                Ok(tree) => tree,
                Err(e) => {
                    report_error(&config, &source, &e)?;
                    std::process::exit(1);
                }
            };

            match format {
                Format::Tree => print!("{}", render_outline(&tree)),
                Format::Json => println!("{}", JsonAdapter::serialize(&tree)?),
            }
        }

        Commands::Validate { config } => {
            tracing::info!("Validating config: {}", config);

            let source = read_source(&config)?;
            match parse_source(&source, ParseOptions::strict()) {
                Ok(tree) => {
                    println!(
                        "✅ Configuration '{}' is valid! ({} nodes)",
                        config,
                        tree.len() - 1
                    );
                }
                Err(e) => {
                    eprintln!("❌ Configuration Error: {}", e);
                    report_error(&config, &source, &e)?;
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("httpdtree v{}", httpdtree_core::VERSION);
        }
    }

    Ok(())
}

fn load_options(path: Option<&str>) -> anyhow::Result<ParseOptions> {
    match path {
        Some(path) => {
            tracing::info!("Loading parse options from {}", path);
            Ok(OptionsLoader::load(path)?)
        }
        None => Ok(ParseOptions::default()),
    }
}

/// Read a configuration file, replacing bytes that are not UTF-8
fn read_source(path: &str) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_source(source: &str, options: ParseOptions) -> Result<ConfigTree, ParseError> {
    httpdtree_config::Parser::with_options(options).parse_str(source)
}

/// Indented outline, one node per line
fn render_outline(tree: &ConfigTree) -> String {
    let mut out = String::new();
    for node in tree.descendants() {
        let indent = (node.depth() - 1) * 2;
        let line = format!(
            "{:indent$}{} {}",
            "",
            node.name().unwrap_or_default(),
            node.content().unwrap_or_default(),
            indent = indent
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Byte range of a 1-based line in `source`, without its line break
fn line_span(source: &str, line: usize) -> Range<usize> {
    let mut start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let trimmed = text.trim_end_matches(['\n', '\r']);
            return start..start + trimmed.len();
        }
        start += text.len();
    }
    source.len()..source.len()
}

fn report_error(path: &str, source: &str, error: &ParseError) -> anyhow::Result<()> {
    let Some(line) = error.line() else {
        eprintln!("{}", error);
        return Ok(());
    };

    let span = line_span(source, line);
    let label = match error {
        ParseError::UnbalancedClose { .. } => "no open section to close",
        ParseError::UnclosedSection { .. } => "section opened here",
        _ => "here",
    };

    Report::build(ReportKind::Error, (path, span.clone()))
        .with_config(ariadne::Config::default().with_color(std::io::stderr().is_terminal()))
        .with_message(error.to_string())
        .with_label(Label::new((path, span)).with_message(label).with_color(Color::Red))
        .finish()
        .eprint((path, Source::from(source)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_span() {
        let source = "Listen 80\r\n</VirtualHost>\nUser daemon";
        assert_eq!(&source[line_span(source, 1)], "Listen 80");
        assert_eq!(&source[line_span(source, 2)], "</VirtualHost>");
        assert_eq!(&source[line_span(source, 3)], "User daemon");
        assert_eq!(line_span(source, 9), source.len()..source.len());
    }

    #[test]
    fn test_render_outline() {
        let source = "Listen 80\n<VirtualHost *>\nServerName example.com\n<IfModule>\n</IfModule>\n</VirtualHost>\n";
        let tree = parse_source(source, ParseOptions::default()).unwrap();
        assert_eq!(
            render_outline(&tree),
            "Listen 80\nVirtualHost *\n  ServerName example.com\n  IfModule\n"
        );
    }

    #[test]
    fn test_cli_parses_dump_flags() {
        let cli = Cli::try_parse_from(["httpdtree", "dump", "httpd.conf", "--format", "json", "--strict"]).unwrap();
        match cli.command {
            Commands::Dump { config, format, strict, options } => {
                assert_eq!(config, "httpd.conf");
                assert!(matches!(format, Format::Json));
                assert!(strict);
                assert!(options.is_none());
            }
            _ => panic!("expected dump"),
        }
    }
}
