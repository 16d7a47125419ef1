use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use release_nudge::config::{NudgeConfig, config_path, data_dir, db_path, log_dir};
use release_nudge::engine::{Interaction, UpdateChecker};
use release_nudge::fetch::JsonFileFetcher;
use release_nudge::logging::{LogFormat, init_logging};
use release_nudge::present::PresentationAdapter;
use release_nudge::rules::AlertType;
use release_nudge::store::PersistenceStore;
use release_nudge::store::sqlite::SqliteStore;
use release_nudge::version::{SemanticVersion, VersionInfo};

#[derive(Parser)]
#[command(name = "release-nudge")]
#[command(version, about = "Decide whether to prompt users about an available update")]
struct Cli {
    /// Configuration file (defaults to the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State database (defaults to the data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one check cycle and print the outcome as JSON
    Check {
        /// Installed version of the application
        #[arg(long)]
        current: SemanticVersion,

        /// JSON metadata document describing the latest release
        #[arg(long)]
        metadata: PathBuf,

        /// Answer to give if an alert is shown
        #[arg(long, value_enum)]
        respond: Option<Response>,
    },
    /// Print the stored installation state as JSON
    State,
    /// Clear the stored installation state
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Response {
    Update,
    Skip,
    Later,
}

impl From<Response> for Interaction {
    fn from(response: Response) -> Self {
        match response {
            Response::Update => Interaction::Update,
            Response::Skip => Interaction::Skip,
            Response::Later => Interaction::Later,
        }
    }
}

/// Answers every alert with the response given on the command line
struct FixedResponse(Option<Interaction>);

#[async_trait::async_trait]
impl PresentationAdapter for FixedResponse {
    async fn present(&self, alert_type: AlertType, info: &VersionInfo) -> Option<Interaction> {
        info!(
            "Presenting {:?} alert for {} (notes: {:?})",
            alert_type, info.latest_available, info.release_notes_key
        );
        self.0
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    let _guard = init_logging(&log_dir(), format).context("failed to initialize logging")?;

    let config_file = cli.config.unwrap_or_else(config_path);
    let config = NudgeConfig::load_or_default(&config_file)
        .with_context(|| format!("failed to load configuration from {config_file:?}"))?;

    let db_file = match cli.db {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(data_dir()).context("failed to create data directory")?;
            db_path()
        }
    };
    let store = SqliteStore::new(&db_file, &config.app_id)
        .with_context(|| format!("failed to open state database {db_file:?}"))?;

    match cli.command {
        Command::Check {
            current,
            metadata,
            respond,
        } => {
            let rules = config.rules_manager()?;
            let checker = UpdateChecker::new(JsonFileFetcher::new(&metadata, current), store, rules)
                .with_engine(config.decision_engine());
            let adapter = FixedResponse(respond.map(Interaction::from));

            let outcome = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(checker.check_and_present(&adapter, Utc::now()))?;

            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::State => {
            let state = store.load()?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Reset => {
            store.clear()?;
        }
    }

    Ok(())
}
