//! remax CLI - probe the terminal for its true size and, unless told
//! otherwise, push the answer into the kernel's window-size record.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use remax::probe::{probe, ProbeOptions};
use remax::terminal::Terminal;
use remax::version;

#[derive(Parser, Debug)]
#[command(
    name = version::COMMAND_NAME,
    version = version::version_string(),
    about = "Set the terminal's kernel window-size record from the terminal's own report of its dimensions",
    after_help = "The probe needs a terminal that answers the ANSI cursor position query (ESC[6n)."
)]
struct Cli {
    /// Print the terminal size without changing it
    #[arg(short = 'p', long = "print")]
    print: bool,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Read timeout for the terminal's response (e.g. 2s, 500ms, 1m30s)
    #[arg(
        short = 't',
        long = "timeout",
        value_name = "DURATION",
        value_parser = parse_duration,
        default_value = "2s"
    )]
    timeout: Duration,

    /// Display change history and exit
    #[arg(long = "changelog")]
    changelog: bool,
}

/// Parse a Go-style duration literal: one or more `<number><unit>` terms,
/// units ns/us/ms/s/m/h, fractions allowed (`1.5s`).
fn parse_duration(s: &str) -> Result<Duration, String> {
    let mut rest = s.trim();
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }
    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| format!("missing unit in duration '{s}'"))?;
        let value: f64 = rest[..number_end]
            .parse()
            .map_err(|_| format!("invalid number in duration '{s}'"))?;

        let after_number = &rest[number_end..];
        let unit_end = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let seconds_per_unit = match &after_number[..unit_end] {
            "ns" => 1e-9,
            "us" | "\u{b5}s" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            unit => return Err(format!("unknown unit '{unit}' in duration '{s}'")),
        };
        total += Duration::from_secs_f64(value * seconds_per_unit);
        rest = &after_number[unit_end..];
    }
    Ok(total)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("REMAX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if cli.changelog {
        print!("{}", version::changelog());
        return Ok(());
    }

    let mut term =
        Terminal::acquire(&io::stdin()).context("failed to get raw terminal")?;
    let opts = ProbeOptions {
        apply: !cli.print,
        timeout: cli.timeout,
    };
    let size = probe(&mut term, &opts)?;

    if !cli.quiet || cli.print {
        println!("terminal size: rows={}, cols={}", size.rows, size.cols);
    }
    Ok(())
}
