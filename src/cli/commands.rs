use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use chrono::DateTime;
use thiserror::Error;
use tracing::info;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::expr::{self, Filter, FilterOptions, Modifier, TimeRange};
use crate::listen::{read_listens, write_listen};

#[derive(Parser)]
#[command(name = "listen-filter")]
#[command(about = "Select and edit listens with filter and edit expressions")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides LISTEN_FILTER_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// options that select listens
#[derive(Args, Debug, Clone, Default)]
pub struct SelectArgs {
    /// Conditions joined by &&, e.g. "skipped!=1&&duration_ms>=30000"
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Named filter from the config file (repeatable)
    #[arg(short, long = "preset", action = clap::ArgAction::Append)]
    pub presets: Vec<String>,

    /// Only keep listens after this time (unix seconds or date/time)
    #[arg(long)]
    pub after: Option<String>,

    /// Only keep listens before this time (unix seconds or date/time)
    #[arg(long)]
    pub before: Option<String>,

    /// JSON file mapping attribute keys to values that reject a listen
    #[arg(long)]
    pub exclude: Option<PathBuf>,

    /// JSON file mapping attribute keys to values a listen must have
    #[arg(long)]
    pub include: Option<PathBuf>,

    /// Edit kept listens with KEY=VALUE (repeatable, applied in order)
    #[arg(short, long = "edit", action = clap::ArgAction::Append)]
    pub edits: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep matching listens from a JSON Lines file and apply edits
    Filter {
        /// Input file with one listen per line (stdin if omitted or "-")
        input: Option<PathBuf>,

        #[command(flatten)]
        select: SelectArgs,

        /// Write listens to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print "<kept>/<total>" instead of the listens
        #[arg(long)]
        count: bool,
    },

    /// Show how a filter and edits are parsed
    Explain {
        #[command(flatten)]
        select: SelectArgs,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
    /// Set a configuration value (empty value clears it)
    Set { key: String, value: String },
    /// Verify configuration file for errors
    Verify,
}

/// `config verify` found problems
#[derive(Debug, Error)]
#[error("configuration has {errors} error(s)")]
pub struct ConfigInvalid {
    pub errors: usize,
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = config::get_config_path(cli.config.as_deref())?;
    let config = config::load(&config_path)?;
    super::init_logging(cli.verbose, &config.settings.log);

    match cli.command {
        Commands::Filter {
            input,
            select,
            output,
            count,
        } => {
            let (filter, modifier) = build(&config, &select)?;
            run_filter(&filter, &modifier, input.as_deref(), output.as_deref(), count)
        }

        Commands::Explain { select, json } => {
            let (filter, modifier) = build(&config, &select)?;
            explain(&filter, &modifier, json)
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let mut config = config;
                config::set_value(&mut config, &key, &value)?;
                config::save(&config, &config_path)?;
                println!("Set {} = {}", key, value);
                Ok(())
            }
            ConfigCommands::Verify => {
                let errors = config::verify(&config_path)?;

                if errors.is_empty() {
                    println!("✓ Configuration is valid: {}", config_path.display());
                    Ok(())
                } else {
                    println!(
                        "✗ Configuration has {} error(s): {}",
                        errors.len(),
                        config_path.display()
                    );
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                    Err(ConfigInvalid {
                        errors: errors.len(),
                    }
                    .into())
                }
            }
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "listen-filter", &mut io::stdout());
            Ok(())
        }
    }
}

/// build the filter and modifier; every parse error surfaces here
fn build(config: &Config, select: &SelectArgs) -> Result<(Filter, Modifier)> {
    let options = FilterOptions {
        filter: config::combine_filter(config, select.filter.as_deref(), &select.presets)?,
        after: select.after.clone(),
        before: select.before.clone(),
        ..Default::default()
    };
    let options = config::resolve_lists(
        config,
        options,
        select.exclude.as_deref(),
        select.include.as_deref(),
    )?;

    let filter = expr::build_filter(&options)?;
    let modifier = expr::build_modifier(&select.edits)?;
    Ok((filter, modifier))
}

fn run_filter(
    filter: &Filter,
    modifier: &Modifier,
    input: Option<&Path>,
    output: Option<&Path>,
    count: bool,
) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) if path != Path::new("-") => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut total = 0usize;
    let mut kept = 0usize;

    for listen in read_listens(reader) {
        let mut listen = listen?;
        total += 1;

        if !filter.matches(&listen)? {
            continue;
        }
        kept += 1;

        if !count {
            modifier.apply(&mut listen);
            write_listen(&mut writer, &listen)?;
        }
    }

    if count {
        writeln!(writer, "{}/{}", kept, total)?;
    }
    writer.flush()?;

    info!(kept, total, "filtered listens");
    Ok(())
}

fn explain(filter: &Filter, modifier: &Modifier, json: bool) -> Result<()> {
    let (after, before) = bounds(filter.range());

    if json {
        let value = serde_json::json!({
            "after": after,
            "before": before,
            "conditions": filter.conditions(),
            "edits": modifier.edits(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(after) = &after {
        println!("after   {} (exclusive)", after);
    }
    if let Some(before) = &before {
        println!("before  {} (exclusive)", before);
    }
    for condition in filter.conditions() {
        println!("where   {}", condition);
    }
    for edit in modifier.edits() {
        println!("set     {}", edit);
    }
    if filter.conditions().is_empty() && modifier.is_empty() && after.is_none() && before.is_none()
    {
        println!("(keeps every listen unchanged)");
    }

    Ok(())
}

/// render non-default time bounds as RFC 3339
fn bounds(range: TimeRange) -> (Option<String>, Option<String>) {
    let default = TimeRange::default();
    let render = |ts: i64| {
        DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| ts.to_string())
    };

    let after = (range.min != default.min).then(|| render(range.min));
    let before = (range.max != default.max).then(|| render(range.max));
    (after, before)
}
