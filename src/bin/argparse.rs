// src/bin/argparse.rs

use anyhow::{Context, Result};
use argparse::{ArgumentParser, Error, ParseOutcome, ParserConfig, cli::Cli};
use clap::Parser;
use colored::*;
use std::process::ExitCode;

/// Exit code for a rejected command line or an unusable definition.
const USAGE_EXIT: u8 = 2;

/// Loads the definition, parses the requested input against it and reports the
/// result. Definition problems are fatal; parse errors print the usage line.
fn main() -> ExitCode {
    env_logger::init();

    match run_cli(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(USAGE_EXIT)
        }
    }
}

fn run_cli(cli: Cli) -> Result<ExitCode> {
    log::debug!("CLI args parsed: {:?}", cli);

    let config = ParserConfig::load(&cli.definition)?;
    let mut parser = config
        .build()
        .with_context(|| format!("Invalid parser definition '{}'", cli.definition.display()))?;
    if config.prog.is_none() {
        if let Some(stem) = cli.definition.file_stem() {
            parser.prog(stem.to_string_lossy());
        }
    }
    parser.styled_help(colored::control::SHOULD_COLORIZE.should_colorize());

    let outcome = match &cli.line {
        Some(line) => parser.parse_line(line),
        None => parser.parse_args(cli.args.iter().map(String::as_str)),
    };

    match outcome {
        Ok(ParseOutcome::Help(text)) => {
            print!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Ok(ParseOutcome::Args(args)) => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&args)?
            } else {
                serde_json::to_string(&args)?
            };
            println!("{}", json);
            Ok(ExitCode::SUCCESS)
        }
        Err(Error::Parse(e)) => {
            report_usage_error(&parser, &e.to_string());
            Ok(ExitCode::from(USAGE_EXIT))
        }
        Err(e @ Error::Config(_)) => Err(e.into()),
    }
}

fn report_usage_error(parser: &ArgumentParser, message: &str) {
    eprintln!("{}", parser.format_usage());
    eprintln!("{}: {}", "Error".red().bold(), message);
}
