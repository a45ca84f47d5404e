use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Select};
use log::{debug, info, warn};
use metar_core::{
    Config, OutputFormat, decode_observation, decode_remarks, render_observation, render_remarks,
};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "metar", version, about = "Decode METAR weather reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store default settings, prompting for any not given.
    Configure {
        /// Default output format: "text", "detail" or "json".
        #[arg(long)]
        format: Option<String>,

        /// Skip lines that fail to decode instead of stopping.
        #[arg(long)]
        skip_invalid: Option<bool>,
    },

    /// Decode a report, or every line of a file (stdin when neither is given).
    Decode {
        /// Report text; may be given unquoted.
        report: Vec<String>,

        /// Read one report per line from this file.
        #[arg(long, conflicts_with = "report")]
        file: Option<PathBuf>,

        /// Output format, overriding the configured default.
        #[arg(long)]
        format: Option<String>,

        /// Skip lines that fail to decode instead of stopping.
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Decode a remarks trailer on its own.
    Remarks {
        /// Remarks text, without the leading RMK.
        text: Vec<String>,

        /// Output format, overriding the configured default.
        #[arg(long)]
        format: Option<String>,
    },
}

/// Outcome of decoding a batch of lines.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub decoded: usize,
    pub skipped: usize,
}

fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(name) => OutputFormat::try_from(name),
        None => config.default_format_id(),
    }
}

/// Decode every non-blank line of `reader`, writing one rendering per report.
pub fn decode_lines<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    format: OutputFormat,
    skip_invalid: bool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        match decode_observation(&line) {
            Ok(observation) => {
                writeln!(out, "{}", render_observation(&observation, format)?)?;
                summary.decoded += 1;
            }
            Err(err) if skip_invalid => {
                warn!("skipping line {number} ({}): {err}", err.field());
                summary.skipped += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!(
                        "Line {number} is not a valid report.\n\
                         Hint: pass --skip-invalid to ignore lines like this."
                    )
                });
            }
        }
    }

    Ok(summary)
}

fn configure(format: Option<String>, skip_invalid: Option<bool>) -> Result<()> {
    let mut config = Config::load()?;

    let format = match format {
        Some(name) => OutputFormat::try_from(name.as_str())?,
        None => {
            let current = config.default_format_id().unwrap_or_default();
            let choices = OutputFormat::all().to_vec();
            let start = choices.iter().position(|f| *f == current).unwrap_or(0);
            Select::new("Default output format:", choices)
                .with_starting_cursor(start)
                .prompt()
                .context("Failed to read output format")?
        }
    };

    let skip_invalid = match skip_invalid {
        Some(value) => value,
        None => Confirm::new("Skip lines that fail to decode?")
            .with_default(config.skip_invalid)
            .prompt()
            .context("Failed to read skip-invalid choice")?,
    };

    config.set_default_format(format);
    config.skip_invalid = skip_invalid;
    config.save()?;

    info!("saved configuration to {}", Config::config_file_path()?.display());
    println!("Default format: {format}, skip invalid lines: {skip_invalid}");
    Ok(())
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Configure {
                format,
                skip_invalid,
            } => configure(format, skip_invalid),
            Command::Decode {
                report,
                file,
                format,
                skip_invalid,
            } => {
                let config = Config::load()?;
                let format = resolve_format(format.as_deref(), &config)?;
                let skip_invalid = skip_invalid || config.skip_invalid;

                if !report.is_empty() {
                    let observation = decode_observation(&report.join(" "))?;
                    println!("{}", render_observation(&observation, format)?);
                    return Ok(());
                }

                let stdout = io::stdout();
                let mut out = stdout.lock();
                let summary = match file {
                    Some(path) => {
                        let file = File::open(&path).with_context(|| {
                            format!("Failed to open report file: {}", path.display())
                        })?;
                        decode_lines(BufReader::new(file), &mut out, format, skip_invalid)?
                    }
                    None => decode_lines(io::stdin().lock(), &mut out, format, skip_invalid)?,
                };

                debug!(
                    "decoded {} reports, skipped {}",
                    summary.decoded, summary.skipped
                );
                Ok(())
            }
            Command::Remarks { text, format } => {
                let config = Config::load()?;
                let format = resolve_format(format.as_deref(), &config)?;

                let remarks = decode_remarks(&text.join(" "));
                println!("{}", render_remarks(&remarks, format)?);
                Ok(())
            }
        }
    }
}
