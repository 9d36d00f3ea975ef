//! # Agent Protocol CLI (`agentproto`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `agentproto init` | Create `.agentprotocol/` with an example work item |
//! | `agentproto create "<title>"` | Add a work item (`--plan` also writes `plan.md`) |
//! | `agentproto reindex` | Regenerate the active work and build file indexes |
//! | `agentproto list` | Print open work items and their statuses |
//!
//! ## Examples
//!
//! ```bash
//! # Set up a repository
//! agentproto init --root ~/src/project
//!
//! # New item with a plan and a custom slug
//! agentproto create "Migrate auth to OIDC" --plan --slug oidc
//!
//! # Refresh indexes, appending each item's next open task
//! agentproto reindex --next
//! ```

use agent_protocol::config::{self, CONFIG_FILE_NAME};
use agent_protocol::layout::Layout;
use agent_protocol::list;
use agent_protocol::reindex::{self, ReindexOptions};
use agent_protocol::report::ReportMode;
use agent_protocol::scaffold::{self, CreateOptions, InitOutcome};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Agent Protocol CLI — directory-based work items with generated indexes.
#[derive(Parser)]
#[command(
    name = "agentproto",
    about = "Agent Protocol — directory-based work items with generated Markdown indexes",
    version
)]
struct Cli {
    /// Workspace root containing `.agentprotocol/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Path to configuration file (TOML).
    ///
    /// Defaults to `<root>/.agentprotocol/protocol.toml`; built-in defaults
    /// apply when that file does not exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report index outcomes as JSON lines on stderr.
    #[arg(long, global = true)]
    json: bool,

    /// Only report index targets that were skipped.
    #[arg(long, global = true, conflicts_with = "json")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize `.agentprotocol/` with README, TODO and an example item.
    ///
    /// Does nothing if the directory already exists.
    Init,

    /// Create a new work item under `open/`.
    Create {
        /// Work item title. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Also create a `plan.md`.
        #[arg(long)]
        plan: bool,

        /// Derive the folder slug from this text instead of the title.
        #[arg(long)]
        slug: Option<String>,
    },

    /// Regenerate the active work index and every build file index.
    ///
    /// Missing documents or markers are reported and skipped; the command
    /// still exits successfully.
    Reindex {
        /// Append each item's first open task to its row.
        #[arg(long)]
        next: bool,
    },

    /// List open work items.
    List {
        /// Show each item's first open task.
        #[arg(long)]
        next: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // An explicit --config must exist; the in-tree default is optional
    let loaded = match &cli.config {
        Some(path) => config::load_config(path),
        None => config::load_config_or_default(
            &cli.root
                .join(config::PROTOCOL_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        ),
    };
    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) if matches!(cli.command, Commands::Reindex { .. }) => {
            eprintln!("[agent-protocol] reindex skipped: {:#}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let layout = Layout::new(&cli.root, &cfg);

    let mode = if cli.quiet {
        ReportMode::SkipsOnly
    } else if cli.json {
        ReportMode::Json
    } else {
        ReportMode::Human
    };
    let reporter = mode.reporter();

    match cli.command {
        Commands::Init => match scaffold::init(&layout, &cfg, &*reporter).await? {
            InitOutcome::AlreadyInitialized => {
                println!(
                    "{} already exists; skipping init.",
                    layout.protocol_dir().display()
                );
            }
            InitOutcome::Created { example_item } => {
                println!(
                    "Initialized {} with example work item: {}",
                    layout.protocol_dir().display(),
                    example_item
                );
            }
        },
        Commands::Create { title, plan, slug } => {
            let options = CreateOptions {
                title: title.join(" "),
                plan,
                slug,
            };
            let item = scaffold::create(&layout, &cfg, &options, &*reporter).await?;
            println!("Created work item: {}/{}/", layout.open_dir_name(), item);
        }
        Commands::Reindex { next } => {
            let options = ReindexOptions { include_next: next };
            // Best-effort: report and exit cleanly even if the scan itself fails
            match reindex::run_reindex(&layout, &cfg, options, &*reporter).await {
                Ok(report) => {
                    println!(
                        "reindex finished: {} items, {} skipped",
                        report.items.len(),
                        report.skipped().count()
                    );
                }
                Err(e) => {
                    eprintln!("[agent-protocol] reindex failed: {:#}", e);
                }
            }
        }
        Commands::List { next } => {
            list::list_items(&layout, &cfg, next || cfg.reindex.include_next).await?;
        }
    }

    Ok(())
}
