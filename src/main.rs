use clap::{Parser, ValueEnum};
use phpsim_rust::error::SimError;
use phpsim_rust::json::{statements_to_json, JsonStyle};
use phpsim_rust::{normalize, parser, simulate, OutputFormat, SimOptions};

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// Derive the printed output of a PHP snippet's echo/print statements
/// without executing it.
#[derive(Parser, Debug)]
#[command(name = "phpsim", version)]
struct Cli {
    /// Snippet file to read; stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Emit markup-safe HTML (`<br/>`, `&emsp;`, escaped text)
    #[arg(long)]
    html: bool,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Output)]
    emit: Emit,

    /// Print a notice instead of empty output when there is no echo/print
    #[arg(long)]
    notice: bool,

    /// Report statement counts on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// Rendered output
    Output,
    /// Snippet with delimiters and comments removed
    Normalized,
    /// Parsed statements as JSON
    Statements,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let input = read_snippet(cli.file.as_ref())?;

    match cli.emit {
        Emit::Normalized => print!("{}", normalize(&input)),
        Emit::Statements => {
            let statements = parser::parse(&normalize(&input));
            println!("{}", statements_to_json(&statements, JsonStyle::Pretty));
        }
        Emit::Output => {
            let options = SimOptions {
                format: if cli.html {
                    OutputFormat::Html
                } else {
                    OutputFormat::Text
                },
            };
            let result = simulate(&input, &options);
            if cli.notice {
                println!("{}", result.display());
            } else {
                println!("{}", result.output);
            }
            if cli.verbose {
                eprintln!(
                    "statements: {}, output statements: {}",
                    result.statements, result.output_statements
                );
            }
        }
    }

    Ok(())
}

fn read_snippet(file: Option<&PathBuf>) -> Result<String, SimError> {
    let (name, bytes) = match file {
        Some(path) if path.as_os_str() != "-" => {
            let name = path.display().to_string();
            let bytes = std::fs::read(path).map_err(|e| SimError::read_failed(&name, &e))?;
            (name, bytes)
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|e| SimError::read_failed("<stdin>", &e))?;
            ("<stdin>".to_string(), bytes)
        }
    };
    String::from_utf8(bytes).map_err(|e| SimError::invalid_utf8(&name, &e))
}
