//! Import planner application
//!
//! Reads an application configuration, plans the configured import tasks and
//! reports what the engine side has to create.
//!
//! ```text
//! import_planner [CONFIG] [--asset-dir DIR]... [--content-root PATH] [--log-level LEVEL] [--json]
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use clap::Parser;
use gravity_tools::assets::{PresetDatabase, PresetDatabaseError};
use gravity_tools::config::{Config, ConfigError};
use gravity_tools::core::config::ApplicationConfig;
use gravity_tools::foundation::logging;
use gravity_tools::import::{validate_import_directory, ImportPlanner, ImportTask, KnownAssets};
use thiserror::Error;

const DEFAULT_CONTENT_ROOT: &str = "/Game/Gravity";

/// Preset database shared by everything in the process
static PRESET_DATABASE: OnceLock<PresetDatabase> = OnceLock::new();

#[derive(Error, Debug)]
enum PlannerError {
    #[error("Nothing to plan: pass a configuration file or at least one --asset-dir")]
    NothingToPlan,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Presets(#[from] PresetDatabaseError),

    #[error("Failed to install the logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Failed to serialize the plan: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Plans the import of exported Gravity assets
#[derive(Parser, Debug)]
#[command(name = "import_planner", version)]
struct Arguments {
    /// Application configuration (.toml or .ron)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Asset directory to plan in addition to the configured tasks
    #[arg(short = 'a', long = "asset-dir", value_name = "DIR")]
    asset_dirs: Vec<PathBuf>,

    /// Content root for tasks created from --asset-dir
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONTENT_ROOT)]
    content_root: String,

    /// Log level, overrides the configured one
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
}

impl Arguments {
    /// Load the configuration and merge the command line overrides into it
    fn application_config(&self) -> Result<ApplicationConfig, PlannerError> {
        if self.config.is_none() && self.asset_dirs.is_empty() {
            return Err(PlannerError::NothingToPlan);
        }

        let mut config = match &self.config {
            Some(path) => ApplicationConfig::load_from_file(path)?,
            None => ApplicationConfig::default(),
        };

        if let Some(level) = &self.log_level {
            config.importer.log_level.clone_from(level);
        }

        config
            .tasks
            .extend(self.asset_dirs.iter().map(|dir| ImportTask::new(dir.clone(), &self.content_root)));

        config.validate()?;
        Ok(config)
    }
}

fn preset_database(path: &Path) -> Result<&'static PresetDatabase, PresetDatabaseError> {
    if let Some(database) = PRESET_DATABASE.get() {
        return Ok(database);
    }

    let database = PresetDatabase::load(path)?;
    Ok(PRESET_DATABASE.get_or_init(|| database))
}

fn run(arguments: &Arguments) -> Result<(), PlannerError> {
    let config = arguments.application_config()?;

    logging::init_with_level(&config.importer.log_level)?;
    log::info!("Planning {} import task(s)", config.tasks.len());

    let presets = preset_database(&config.importer.preset_database_path)?;

    let tasks: Vec<ImportTask> = config
        .tasks
        .iter()
        .filter(|task| match validate_import_directory(&task.source_mesh_dir) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        })
        .cloned()
        .collect();

    let mut planner = ImportPlanner::new(config.importer.clone(), presets);
    let plan = planner.plan(&tasks, &KnownAssets::new());

    log::info!(
        "Planned {} asset(s) in {} batch(es), {} up to date, {} skipped",
        plan.asset_count(),
        plan.batches.len(),
        plan.up_to_date.len(),
        plan.skipped.len() + config.tasks.len() - tasks.len()
    );
    log::info!(
        "{} distinct material(s), {} material instance(s) to create",
        planner.registry().len(),
        plan.instances_to_create()
    );

    if arguments.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }

    Ok(())
}

fn main() {
    let arguments = Arguments::parse();

    if let Err(e) = run(&arguments) {
        // the logger may not be installed yet
        eprintln!("{e}");
        std::process::exit(1);
    }
}
