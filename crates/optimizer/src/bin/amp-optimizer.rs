// ABOUTME: CLI binary for the AMP optimizer.
// ABOUTME: Reads an AMP page from a file or stdin and writes the server-side rendered page.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use amp_optimizer::{OptimizeError, Optimizer, Options};

#[derive(Parser, Debug)]
#[command(name = "amp-optimizer")]
#[command(about = "Apply server-side rendering to AMP documents")]
struct Args {
    /// HTML file to optimize (default: stdin)
    #[arg()]
    input: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// JSON file with optimizer options
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Skip the server-side rendering pass
    #[arg(long = "no-ssr")]
    no_ssr: bool,

    /// Output a JSON report instead of raw HTML
    #[arg(long = "json")]
    json_output: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_options(args: &Args) -> Result<Options, OptimizeError> {
    let mut opts = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| OptimizeError::io("read config", e))?;
            Options::from_json(&json)?
        }
        None => Options::default(),
    };
    if args.no_ssr {
        opts.server_side_rendering = false;
    }
    Ok(opts)
}

fn read_input(input: Option<&PathBuf>) -> Result<String, OptimizeError> {
    match input {
        Some(path) => fs::read_to_string(path).map_err(|e| OptimizeError::io("read input", e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| OptimizeError::io("read stdin", e))?;
            Ok(buf)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let opts = load_options(args)?;
    let optimizer = Optimizer::builder().options(opts).build();
    let html = read_input(args.input.as_ref())?;

    let report = optimizer.transform_html_with_report(&html)?;
    let output = if args.json_output {
        serde_json::to_string_pretty(&report).context("serialize report")?
    } else {
        report.html
    };

    match &args.output {
        Some(path) => fs::write(path, &output).with_context(|| format!("write {:?}", path))?,
        None => println!("{}", output),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
