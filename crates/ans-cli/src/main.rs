use std::io::{Read, Write};

use anyhow::Context;
use ans_config::AnsConfig;
use ans_parser::Converter;
use clap::Parser;

mod cli;

fn main() {
    if let Err(error) = run() {
        eprintln!("html2ans error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = AnsConfig::load().context("failed to load html2ans configuration")?;
    cli.apply(&mut config.converter);
    config.converter.validate()?;

    let html = read_input(&cli)?;
    let converter = Converter::default_converter(config.converter.options());
    let elements = converter
        .convert_from(&html, Some(&config.converter.start_tag))
        .context("conversion failed")?;
    tracing::debug!(count = elements.len(), "converted document");

    let json = if cli.pretty {
        serde_json::to_string_pretty(&elements)
    } else {
        serde_json::to_string(&elements)
    }
    .context("failed to serialize content elements")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write output")?;
    Ok(())
}

fn read_input(cli: &cli::Cli) -> anyhow::Result<String> {
    match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut html = String::new();
            std::io::stdin()
                .read_to_string(&mut html)
                .context("failed to read stdin")?;
            Ok(html)
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HTML2ANS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
