//! `roster-sync`: operator entry point for roster reconciliation.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use roster_backend::app::RosterApp;
use roster_backend::config::SyncSettings;
use roster_backend::domain::{EntityKind, StatusEvent, SyncWindow, TransitionRequest};
use roster_backend::outbound::RosterStores;
use roster_backend::outbound::memory::InMemoryRoster;
use roster_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use roster_backend::outbound::queue::QueueRuntime;
use roster_backend::outbound::reports::{CsvReport, write_csv};
use roster_backend::outbound::source::JsonSnapshotSource;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

/// `roster-sync` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "roster-sync",
    about = "Reconcile the legacy membership export into the canonical roster",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    /// Directory holding the legacy JSON table dumps.
    #[arg(long = "source-dir", value_name = "path", global = true)]
    source_dir: Option<PathBuf>,
    /// Concurrent reconcile workers.
    #[arg(long, value_name = "n", global = true)]
    workers: Option<usize>,
    /// Reconcile into memory; nothing is persisted.
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run one sync pass. Without a window the pass is full and deletes orphans.
    Sync(WindowArgs),
    /// Renumber the group display order: the root, its direct children, then
    /// every other group by kind and name.
    SortTree,
    /// Recompute the senior designation of every active quartet.
    RefreshSeniors,
    /// Write the active roster of one group as CSV.
    ExportRoster {
        /// Group id.
        #[arg(long, value_name = "uuid")]
        group: Uuid,
        /// Output file; standard output when omitted.
        #[arg(long, value_name = "path")]
        output: Option<PathBuf>,
    },
    /// Write the active quartets as CSV.
    ExportQuartets {
        /// Output file; standard output when omitted.
        #[arg(long, value_name = "path")]
        output: Option<PathBuf>,
    },
    /// Activate an entity and journal the transition.
    Activate(TransitionArgs),
    /// Deactivate an entity and journal the transition.
    Deactivate(TransitionArgs),
}

#[derive(Debug, Clone, Args)]
#[group(multiple = false)]
struct WindowArgs {
    /// Rows changed in the last N days.
    #[arg(long, value_name = "n")]
    days: Option<u32>,
    /// Rows changed in the last N hours.
    #[arg(long, value_name = "n")]
    hours: Option<u32>,
    /// Rows changed in the last N minutes.
    #[arg(long, value_name = "n")]
    minutes: Option<u32>,
}

impl WindowArgs {
    fn window(&self) -> SyncWindow {
        match (self.days, self.hours, self.minutes) {
            (Some(days), _, _) => SyncWindow::Days(days),
            (_, Some(hours), _) => SyncWindow::Hours(hours),
            (_, _, Some(minutes)) => SyncWindow::Minutes(minutes),
            _ => SyncWindow::Full,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct TransitionArgs {
    /// Entity type: group, person, member or officer.
    #[arg(long, value_name = "kind", value_parser = parse_entity)]
    entity: EntityKind,
    /// Entity id.
    #[arg(long, value_name = "uuid")]
    id: Uuid,
    /// Operator recorded in the state log.
    #[arg(long, value_name = "name")]
    actor: Option<String>,
    /// Reason recorded in the state log.
    #[arg(long, value_name = "text")]
    description: Option<String>,
}

impl TransitionArgs {
    fn request(self, event: StatusEvent) -> TransitionRequest {
        TransitionRequest {
            entity: self.entity,
            id: self.id,
            event,
            actor: self.actor,
            description: self.description,
        }
    }
}

fn parse_entity(value: &str) -> Result<EntityKind, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

fn settings_for(args: &CliArgs) -> Result<SyncSettings> {
    let mut settings = SyncSettings::load_from_iter([OsString::from("roster-sync")])
        .map_err(|err| eyre!("load settings: {err}"))?;
    if let Some(url) = &args.database_url {
        settings.database_url = Some(url.clone());
    }
    if let Some(dir) = &args.source_dir {
        settings.source_dir = Some(dir.clone());
    }
    if let Some(workers) = args.workers {
        settings.workers = Some(workers);
    }
    settings.dry_run |= args.dry_run;
    Ok(settings)
}

async fn open_stores(settings: &SyncSettings) -> Result<RosterStores> {
    if settings.dry_run {
        warn!("dry run: reconciling into memory, nothing will be persisted");
        return Ok(RosterStores::in_memory(&Arc::new(InMemoryRoster::new())));
    }
    let url = settings
        .database_url()
        .ok_or_else(|| eyre!("no database URL; pass --database-url or set DATABASE_URL"))?;
    let applied = run_pending_migrations(&url).await?;
    info!(applied, "database schema ready");
    let pool = DbPool::new(PoolConfig::for_workers(url, settings.workers())).await?;
    Ok(RosterStores::postgres(&pool))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let settings = settings_for(&args)?;
    let stores = open_stores(&settings).await?;
    let clock = Arc::new(DefaultClock);
    let source = Arc::new(JsonSnapshotSource::new(settings.source_dir(), clock.clone()));
    let app = RosterApp::assemble(&stores, source, &settings, QueueRuntime::default(), clock);

    let outcome = dispatch(&app, args.command).await;
    app.shutdown().await;
    outcome
}

async fn dispatch(app: &RosterApp, command: Command) -> Result<()> {
    match command {
        Command::Sync(window) => {
            let report = app.sync().run(window.window()).await?;
            for failure in &report.failures {
                warn!(
                    job = %failure.job,
                    attempts = failure.attempts,
                    error = %failure.message,
                    "job failed during sync"
                );
            }
        }
        Command::SortTree => {
            let sorted = app.groups().sort_tree().await?;
            info!(sorted, "tree sort finished");
        }
        Command::RefreshSeniors => {
            let changed = app.groups().refresh_seniors().await?;
            info!(changed, "senior refresh finished");
        }
        Command::ExportRoster { group, output } => {
            let rows = app.reports().group_roster(group).await?;
            export(&rows, output.as_deref())?;
        }
        Command::ExportQuartets { output } => {
            let rows = app.reports().quartet_list().await?;
            export(&rows, output.as_deref())?;
        }
        Command::Activate(target) => {
            let entry = app
                .transitions()
                .apply(target.request(StatusEvent::Activate))
                .await?;
            info!(entity = %entry.entity, id = %entry.entity_id, to = %entry.to_state, "activated");
        }
        Command::Deactivate(target) => {
            let entry = app
                .transitions()
                .apply(target.request(StatusEvent::Deactivate))
                .await?;
            info!(entity = %entry.entity, id = %entry.entity_id, to = %entry.to_state, "deactivated");
        }
    }
    Ok(())
}

fn export<R: CsvReport>(rows: &[R], output: Option<&Path>) -> Result<()> {
    match output {
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_csv(rows, &mut handle)?;
            handle.flush()?;
        }
        Some(path) => {
            let file = create_file(path)?;
            write_csv(rows, file)?;
            info!(path = %path.display(), rows = rows.len(), "report written");
        }
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<cap_std::fs::File> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre!("output path '{}' has no file name", path.display()))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open output directory '{}'", parent.display()))?;
    dir.create(name)
        .wrap_err_with(|| format!("create output file '{}'", path.display()))
}
