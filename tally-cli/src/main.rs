use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::{StatementRules, TransactionBatch, YearContext};
use tally_ingest::{load_tables, BatchAssembler, MarkdownAuditLog};

mod config;
mod logging;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Turn extracted bank-statement tables into ordered transactions"
)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpret statement tables (.csv or .json) and append the batch to the audit log
    Parse {
        /// Extracted table files, in document order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Statement year for the "DD MON" dates
        #[arg(long)]
        year: i32,

        /// Month (1-12) the statement closes in; later months fall in the previous year
        #[arg(long)]
        closing_month: Option<u32>,

        /// Print the batch as JSON
        #[arg(long)]
        json: bool,

        /// Skip the audit log for this run
        #[arg(long)]
        no_audit: bool,

        /// Audit log file (overrides config)
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Parse {
            inputs,
            year,
            closing_month,
            json,
            no_audit,
            log,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let rules = StatementRules::compile(&cfg.rules).context("invalid [rules] in config")?;

            let years = match closing_month {
                Some(m) => match YearContext::closing(year, m) {
                    Some(ctx) => ctx,
                    None => bail!("--closing-month must be between 1 and 12, got {}", m),
                },
                None => YearContext::single(year),
            };

            let tables = load_tables(&inputs)?;
            let assembler = BatchAssembler::with_rules(rules, years);

            let batch = if no_audit || !cfg.audit.enabled {
                assembler.collect(&tables)
            } else {
                let log_path = match log {
                    Some(p) => p,
                    None => cfg.audit.resolve_log_file()?,
                };
                let mut audit = MarkdownAuditLog::new(log_path);
                let batch = assembler.assemble(&tables, &mut audit)?;
                tracing::info!(path = %audit.path().display(), "batch logged");
                batch
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                print_batch(&batch, tables.len());
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                config::init_config(cli.config.as_deref())?;
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                println!("\n# audit log: {}", cfg.audit.resolve_log_file()?.display());
            }
        },
    }

    Ok(())
}

fn print_batch(batch: &TransactionBatch, table_count: usize) {
    println!(
        "Parsed {} transactions from {} table(s)\n",
        batch.len(),
        table_count
    );

    for t in batch {
        println!(
            "{:<7} {:<40} {:>12} {:>12}",
            t.date,
            t.description,
            t.amount.to_string(),
            t.balance.to_string()
        );
    }

    let d = &batch.diagnostics;
    println!("\n{}", d);
    if !d.is_clean() {
        println!("Some rows were dropped or repaired; rerun with --verbose for details.");
    }
}
