use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use fotoprotokoll::config::Settings;
use fotoprotokoll::pipeline::{
    artifact_paths, load_enriched, load_manifest, match_content, run, PipelineConfig, Stage,
};

#[derive(Parser, Debug)]
#[command(name = "fotoprotokoll")]
#[command(version, about = "Match workshop photos to agenda sessions and plan the report pages", long_about = None)]
struct Cli {
    /// Project directory holding .cache/ and output/ (or FPG_PROJECT_DIR)
    #[arg(short, long, global = true)]
    project_dir: Option<PathBuf>,

    /// Settings file (default: <project_dir>/fotoprotokoll.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Match photos and lay out pages
    Run {
        /// Stage to start from; earlier stages are loaded from the cache
        #[arg(long, value_enum, default_value_t = FromStage::Match)]
        from_stage: FromStage,
    },

    /// Only match photos to sessions and write content_plan.json
    Match,

    /// Lay out pages from a cached content_plan.json
    Layout,

    /// Show a summary of the cached inputs
    Info,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum FromStage {
    Match,
    Layout,
}

impl From<FromStage> for Stage {
    fn from(stage: FromStage) -> Self {
        match stage {
            FromStage::Match => Stage::Match,
            FromStage::Layout => Stage::Layout,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "fotoprotokoll=debug"
    } else {
        "fotoprotokoll=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let settings = Settings::load(cli.project_dir.as_deref(), cli.config.as_deref())
        .context("Invalid settings")?;

    match cli.command {
        Commands::Run { from_stage } => run_all(settings, from_stage.into()),
        Commands::Match => run_match(&settings),
        Commands::Layout => run_all(settings, Stage::Layout),
        Commands::Info => show_info(&settings),
    }
}

fn run_all(settings: Settings, from_stage: Stage) -> Result<()> {
    if !settings.project_dir.is_dir() {
        anyhow::bail!(
            "Project directory does not exist: {}",
            settings.project_dir.display()
        );
    }

    let output_dir = settings.output_dir();
    let output = run(&PipelineConfig::new(settings, from_stage))?;

    println!(
        "[✓] {} pages planned, {} of {} sessions flagged for review",
        output.pages.pages.len(),
        output.content.needs_review_count(),
        output.content.items.len()
    );
    println!("[*] Review outputs: {}", output_dir.display());
    Ok(())
}

fn run_match(settings: &Settings) -> Result<()> {
    let manifest = load_manifest(settings)?;
    let enriched = load_enriched(settings)?;
    let content = match_content(settings, &manifest, &enriched)?;

    for item in &content.items {
        println!(
            "{}  {:<32} {:>3} photos  {:.2}{}",
            item.id,
            item.heading,
            item.photo_ids.len(),
            item.combined_confidence(),
            if item.needs_review { "  review" } else { "" }
        );
    }
    Ok(())
}

fn show_info(settings: &Settings) -> Result<()> {
    let manifest = load_manifest(settings)
        .with_context(|| format!("No manifest in {}", settings.cache_dir().display()))?;
    let enriched = load_enriched(settings)?;

    println!("Workshop Information");
    println!("====================");
    println!("Title: {}", manifest.meta.title);
    if let Some(date) = manifest.meta.workshop_date {
        println!("Date: {}", date);
    }
    println!("Sessions: {}", manifest.sessions.len());
    println!("Photos: {}", manifest.photos.len());
    println!("Text snippets: {}", manifest.text_snippets.len());
    println!("Enriched photos: {}", enriched.enriched_photos.len());
    println!();
    for path in artifact_paths(settings) {
        let marker = if path.exists() { "✓" } else { " " };
        println!("[{}] {}", marker, path.display());
    }
    Ok(())
}
