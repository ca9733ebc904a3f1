use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use refcheck::{CheckerConfig, Language, RefChecker};

/// Cross-check in-text citations against the document's references list.
///
/// Reads UTF-8 plain text, prints one diagnostic per line and exits with
/// status 1 when any problem was found.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input file (default: stdin)
    #[arg(short = 'I', long)]
    input: Option<PathBuf>,

    /// Language for the output texts: en = English, fi = Finnish
    #[arg(short, long, default_value = "en")]
    language: String,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let language = Language::from_code(&cli.language)?;

    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read stdin")?;
            buffer
        }
    };

    let checker = RefChecker::with_config(CheckerConfig {
        language,
        ..Default::default()
    });
    let problems = checker.check(&text);
    for problem in &problems {
        println!("{problem}");
    }

    Ok(if problems.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
