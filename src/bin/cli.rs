//! CrewDB CLI
//!
//! Prints namespaces, search plans, memory tags and facet queries as JSON,
//! and validates metadata files before they reach the store.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crewdb::search::{PlanRequest, DEFAULT_TOP_K};
use crewdb::tags::{FacetRecipe, MemoryTagFacets};
use crewdb::{CrewDbError, MemoryRecord, Namespace, VectorMetadata};
use crewdb::{Channel, MemoryEntity, MemoryKind, Stage};

#[derive(Parser)]
#[command(name = "crewdb")]
#[command(about = "Memory and retrieval contracts for sales crews")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "CREWDB_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List namespaces with their store identifiers and record types
    Namespaces,
    /// Build the search plan for a workflow stage
    Plan {
        /// research, outreach or followup
        stage: Stage,
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        lead: Option<String>,
        #[arg(long)]
        vertical: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        /// Crew run to scope trace recall to
        #[arg(short, long)]
        run: Option<String>,
        /// Result budget per namespace
        #[arg(short = 'k', long, env = "CREWDB_TOP_K", default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Build a canonical memory tag set
    Tags {
        entity: MemoryEntity,
        /// Memory type (preference, objection, next_step, ...)
        kind: MemoryKind,
        stage: Stage,
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        lead: Option<String>,
        #[arg(short, long)]
        channel: Option<Channel>,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long)]
        vertical: Option<String>,
        /// Extra key:value tag (repeatable)
        #[arg(short = 'x', long = "extra")]
        extras: Vec<String>,
    },
    /// Print a named memory recall query for a lead
    Facet {
        /// lead_preferences, open_objections or next_steps
        recipe: FacetRecipe,
        #[arg(short, long)]
        account: String,
        #[arg(short, long)]
        lead: String,
    },
    /// Validate a JSON file holding one record or an array of records
    Validate {
        file: PathBuf,
        /// Treat entries as memory records instead of vector metadata
        #[arg(long)]
        memory: bool,
    },
}

#[derive(Serialize)]
struct ValidationReport {
    index: usize,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_tracing(json: bool) {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_entries(path: &Path) -> anyhow::Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(match value {
        Value::Array(entries) => entries,
        other => vec![other],
    })
}

fn validate_entries(entries: Vec<Value>, memory: bool) -> Vec<ValidationReport> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let result = if memory {
                MemoryRecord::from_json(entry).map(|_| ())
            } else {
                VectorMetadata::from_json(entry).map(|_| ())
            };
            match result {
                Ok(()) => ValidationReport {
                    index,
                    ok: true,
                    kind: None,
                    error: None,
                },
                Err(e) => ValidationReport {
                    index,
                    ok: false,
                    kind: Some(e.kind()),
                    error: Some(e.to_string()),
                },
            }
        })
        .collect()
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Namespaces => {
            let rows: Vec<Value> = Namespace::ALL
                .iter()
                .map(|ns| {
                    json!({
                        "name": ns.logical_name(),
                        "namespace": ns.as_str(),
                        "type": ns.record_type().as_str(),
                    })
                })
                .collect();
            print_json(&rows)?;
        }

        Commands::Plan {
            stage,
            account,
            lead,
            vertical,
            persona,
            run,
            top_k,
        } => {
            let request = PlanRequest {
                stage,
                account_id: account,
                lead_id: lead,
                vertical,
                persona,
                run_id: run,
                per_namespace_top_k: top_k,
            };
            print_json(&request.plan()?)?;
        }

        Commands::Tags {
            entity,
            kind,
            stage,
            account,
            lead,
            channel,
            status,
            persona,
            vertical,
            extras,
        } => {
            let facets = MemoryTagFacets {
                entity,
                kind,
                stage,
                account_id: account,
                lead_id: lead,
                channel,
                status,
                persona,
                vertical,
                extras,
            };
            print_json(&facets.build()?)?;
        }

        Commands::Facet {
            recipe,
            account,
            lead,
        } => {
            print_json(&recipe.query(&account, &lead)?)?;
        }

        Commands::Validate { file, memory } => {
            let reports = validate_entries(load_entries(&file)?, memory);
            print_json(&reports)?;
            let failed = reports.iter().filter(|r| !r.ok).count();
            if failed > 0 {
                anyhow::bail!("{} of {} records failed validation", failed, reports.len());
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<CrewDbError>()
            .map(CrewDbError::code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
