//! Storyboard export CLI.
//!
//! Operates on a store snapshot file (the same JSON the library persists) or
//! on a standalone `.lenscore` project file.
//!
//! Usage:
//!   lenscore list
//!   lenscore export --format csv --output board.csv
//!   lenscore export --format edl --file harbor.lenscore
//!   lenscore import harbor.lenscore

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

use lenscore::{
    export_csv, export_edl, export_project_file, export_prompt_sheet, parse_project_file,
    FileSnapshotStore, Project, ProjectStore,
};

#[derive(Parser)]
#[command(
    name = "lenscore",
    about = "Inspect, export and merge storyboard projects",
    version
)]
struct Args {
    /// Store snapshot file (or set LENSCORE_STORE env var)
    #[arg(short = 's', long, env = "LENSCORE_STORE", default_value = "lenscore-storage.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the projects in the store
    List,

    /// Render a project into an exchange format
    Export {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Project id (defaults to the store's active project)
        #[arg(short = 'p', long)]
        project: Option<String>,

        /// Read a standalone .lenscore file instead of the store
        #[arg(long, conflicts_with = "project")]
        file: Option<PathBuf>,

        /// Output path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Merge a .lenscore project file into the store
    Import {
        /// Project file to import
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Spreadsheet table
    Csv,
    /// 25 fps edit decision list
    Edl,
    /// Plain-text prompt sheet
    Prompts,
    /// Portable .lenscore project file
    Project,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::List => list(&args.store),
        Command::Export {
            format,
            project,
            file,
            output,
        } => export(&args.store, format, project, file, output),
        Command::Import { file } => import(&args.store, &file),
    }
}

fn open_store(path: &Path) -> anyhow::Result<ProjectStore> {
    ProjectStore::open(FileSnapshotStore::new(path))
        .with_context(|| format!("failed to open store {}", path.display()))
}

fn list(store_path: &Path) -> anyhow::Result<()> {
    let store = open_store(store_path)?;
    if store.projects().is_empty() {
        println!("store is empty");
        return Ok(());
    }
    for project in store.projects() {
        let marker = if store.active_project_id() == Some(project.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}  {:<30}  {} shots",
            marker,
            project.id,
            project.title,
            project.shots.len()
        );
    }
    Ok(())
}

fn export(
    store_path: &Path,
    format: Format,
    project_id: Option<String>,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let project: Project = match file {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_project_file(&raw)?
        }
        None => {
            let store = open_store(store_path)?;
            let found = match &project_id {
                Some(id) => store.project(id),
                None => store.active_project(),
            };
            match found {
                Some(project) => project.clone(),
                None => bail!("no matching project in {}", store_path.display()),
            }
        }
    };

    let rendered = match format {
        Format::Csv => export_csv(&project),
        Format::Edl => export_edl(&project),
        Format::Prompts => export_prompt_sheet(&project),
        Format::Project => export_project_file(&project)?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            std::io::stdout().write_all(rendered.as_bytes())?;
        }
    }
    Ok(())
}

fn import(store_path: &Path, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let project = parse_project_file(&raw)?;
    let title = project.title.clone();

    let mut store = open_store(store_path)?;
    let id = store.import_project(project)?;
    let imported = store
        .project(&id)
        .map(|p| p.title.clone())
        .unwrap_or(title);
    println!("imported \"{}\" as {}", imported, id);
    Ok(())
}
