use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use crate::api::{ApiClient, DEFAULT_BASE_URL};
use crate::join::join_and_filter;
use crate::model::{ClaimFilter, RunEvent, RunRecord};
use crate::resolve::resolve_evidence;
use crate::storage::{default_store_path, JsonFileStore};
use crate::store::{RunInput, RunStore};
use crate::text_summary;

#[derive(Debug, Parser)]
#[command(
    name = "claimcheck",
    version,
    about = "Client for the claimcheck call fact-checking service"
)]
pub struct Cli {
    /// Base URL of the analysis backend
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Upper bound for a single analyze request
    #[arg(long, default_value = "2m")]
    pub timeout: humantime::Duration,

    /// Print JSON instead of the text rendering
    #[arg(long)]
    pub json: bool,

    /// Override the run history file location
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Do not persist history changes made by this command
    #[arg(long)]
    pub no_save: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a call recording for analysis
    Audio {
        /// Path to the recording to upload
        file: PathBuf,
    },
    /// Submit a call transcript from a file, --text, or stdin
    Transcript {
        /// Path to a transcript text file
        file: Option<PathBuf>,
        /// Inline transcript text
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
    },
    /// Load the built-in example report as a synthetic run (no network)
    Sample,
    /// List the persisted run history
    History,
    /// Select an earlier run and render its report
    Select { run_id: String },
    /// Render the claims table for the current run
    Claims {
        /// Keep all rows, or only one verdict label
        #[arg(long, value_enum, default_value = "all")]
        filter: ClaimFilter,
        /// Sort by confidence ascending instead of descending
        #[arg(long)]
        sort_asc: bool,
    },
    /// Show the resolved evidence for one claim of the current run
    Evidence { claim_id: String },
    /// Probe backend health
    Health,
    /// Ask the backend to rebuild its retrieval index
    Reindex,
}

pub async fn run(args: Cli) -> Result<()> {
    let store_path = match args.store.clone() {
        Some(path) => path,
        None => default_store_path()?,
    };
    let persist = JsonFileStore::new(store_path, args.no_save);
    let mut store = RunStore::new(Box::new(persist));
    store.hydrate().context("failed to load run history")?;

    match &args.command {
        Command::Audio { file } => submit(&args, &mut store, RunInput::Audio(file.clone())).await,
        Command::Transcript { file, text } => {
            let text = transcript_text(file.as_deref(), text.as_deref())?;
            submit(&args, &mut store, RunInput::Transcript(text)).await
        }
        Command::Sample => {
            let id = store.load_sample()?;
            eprintln!("{}", text_summary::pipeline_line(store.pipeline()));
            render_run(&args, &store, &id)
        }
        Command::History => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(store.runs())?);
            } else {
                for line in text_summary::history_list(store.runs(), store.current_run_id()).lines {
                    println!("{line}");
                }
            }
            Ok(())
        }
        Command::Select { run_id } => {
            if store.select_run(run_id)? {
                store.set_tab(0);
                eprintln!("== {} ==", text_summary::tab_title(store.ui().tab));
                render_run(&args, &store, run_id)
            } else {
                eprintln!("run {run_id} not found in history");
                Ok(())
            }
        }
        Command::Claims { filter, sort_asc } => {
            store.set_tab(1);
            store.set_filter(*filter);
            if !args.json {
                eprintln!("== {} ==", text_summary::tab_title(store.ui().tab));
            }
            let report = current_report(&store)?;
            let rows = join_and_filter(report, store.ui().filter, *sort_asc);
            if args.json {
                let payload: Vec<serde_json::Value> = rows
                    .iter()
                    .map(|row| {
                        serde_json::json!({
                            "claim": row.claim,
                            "verdict": row.verdict,
                            "evidence": row.best_evidence,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for line in text_summary::claims_table(&rows).lines {
                    println!("{line}");
                }
            }
            Ok(())
        }
        Command::Evidence { claim_id } => {
            store.open_evidence(claim_id);
            let result = render_evidence(&args, &store);
            store.close_evidence();
            result
        }
        Command::Health => {
            let client = ApiClient::new(&args.base_url, Duration::from(args.timeout))?;
            let health = client.health().await.context("health probe failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                for line in text_summary::health_summary(&health).lines {
                    println!("{line}");
                }
            }
            Ok(())
        }
        Command::Reindex => {
            let client = ApiClient::new(&args.base_url, Duration::from(args.timeout))?;
            let ack = client.rebuild_index().await.context("index rebuild failed")?;
            if ack.ok {
                println!("Index rebuild requested");
            } else {
                println!("Backend declined the rebuild request");
            }
            Ok(())
        }
    }
}

/// Resolve transcript text from a file, the inline flag, or stdin.
fn transcript_text(file: Option<&Path>, inline: Option<&str>) -> Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transcript {}", path.display()));
    }
    if let Some(text) = inline {
        return Ok(text.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read transcript from stdin")?;
    Ok(buf)
}

/// Run one submission end to end, streaming pipeline updates to stderr while
/// the analyze call is in flight.
async fn submit(args: &Cli, store: &mut RunStore, input: RunInput) -> Result<()> {
    let client = ApiClient::new(&args.base_url, Duration::from(args.timeout))?;
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<RunEvent>();
    let printer = tokio::spawn(async move {
        while let Some(event) = evt_rx.recv().await {
            match event {
                RunEvent::Pipeline(status) => {
                    eprintln!("{}", text_summary::pipeline_line(status))
                }
                RunEvent::Info(message) => eprintln!("{message}"),
            }
        }
    });

    let result = store.submit_run(&client, input, &evt_tx).await;
    drop(evt_tx);
    let _ = printer.await;

    let id = result?;
    render_run(args, store, &id)
}

/// Render one run record: the report when the run succeeded, the error
/// otherwise. A failed run is a rendered outcome, not a process failure.
fn render_run(args: &Cli, store: &RunStore, id: &str) -> Result<()> {
    let Some(run) = store.run(id) else {
        eprintln!("run {id} is no longer in history");
        return Ok(());
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(run)?);
        return Ok(());
    }
    for line in text_summary::report_summary(run).lines {
        println!("{line}");
    }
    if let Some(report) = run.report.as_ref() {
        println!();
        let rows = join_and_filter(report, ClaimFilter::All, false);
        for line in text_summary::claims_table(&rows).lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn render_evidence(args: &Cli, store: &RunStore) -> Result<()> {
    let report = current_report(store)?;
    let ui = store.ui();
    let Some(claim_id) = ui.selected_claim_id.as_deref().filter(|_| ui.evidence_open) else {
        bail!("no claim selected");
    };
    let claim = report.claims.iter().find(|c| c.id == claim_id);
    let verdict = report.verdicts.iter().find(|v| v.claim_id == claim_id);
    let evidence = resolve_evidence(report, claim_id);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evidence)?);
        return Ok(());
    }
    for line in text_summary::evidence_panel(claim, verdict, &evidence).lines {
        println!("{line}");
    }
    Ok(())
}

fn current_report(store: &RunStore) -> Result<&crate::model::Report> {
    let Some(run) = store.current_run() else {
        bail!("no current run; submit one or load the sample first");
    };
    report_of(run)
}

fn report_of(run: &RunRecord) -> Result<&crate::model::Report> {
    match run.report.as_ref() {
        Some(report) => Ok(report),
        None => match run.error.as_deref() {
            Some(error) => bail!("run {} failed: {error}", run.id),
            None => bail!("run {} has not settled yet", run.id),
        },
    }
}
