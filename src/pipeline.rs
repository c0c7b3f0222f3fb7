use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::Settings;
use crate::core::model::{EnrichedPhotoSet, ProjectManifest};
use crate::core::plan::{ContentPlan, PagePlan};
use crate::export::json_export::CONTENT_PLAN_FILE;
use crate::export::{Exporter, JsonExporter, MarkdownExporter, TextExporter};
use crate::layout::LayoutPlanner;
use crate::matching::AssignmentEngine;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const ENRICHED_PHOTOS_FILE: &str = "enriched_photos.json";

/// Where a run starts; earlier stages are loaded from the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Match,
    Layout,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub settings: Settings,
    pub from_stage: Stage,
}

impl PipelineConfig {
    pub fn new(settings: Settings, from_stage: Stage) -> Self {
        Self {
            settings,
            from_stage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub content: ContentPlan,
    pub pages: PagePlan,
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_manifest(settings: &Settings) -> Result<ProjectManifest> {
    load_json(&settings.cache_dir().join(MANIFEST_FILE))
}

/// Missing enrichment degrades to an empty set; every photo then scores the semantic floor.
pub fn load_enriched(settings: &Settings) -> Result<EnrichedPhotoSet> {
    let path = settings.cache_dir().join(ENRICHED_PHOTOS_FILE);
    if !path.exists() {
        warn!(path = %path.display(), "no enriched photos found, semantic scores fall back to floor");
        return Ok(EnrichedPhotoSet::default());
    }
    load_json(&path)
}

pub fn match_content(
    settings: &Settings,
    manifest: &ProjectManifest,
    enriched: &EnrichedPhotoSet,
) -> Result<ContentPlan> {
    let engine = AssignmentEngine::new(settings.weights(), settings.match_confidence_threshold);
    let content = engine.assign_manifest(manifest, enriched);
    let path = JsonExporter::new(settings.cache_dir()).write_content_plan(&content)?;
    info!(
        path = %path.display(),
        review = content.needs_review_count(),
        "content plan written"
    );
    Ok(content)
}

pub fn plan_pages(
    settings: &Settings,
    manifest: &ProjectManifest,
    content: &ContentPlan,
    enriched: &EnrichedPhotoSet,
) -> Result<PagePlan> {
    let planner = LayoutPlanner::new(settings.layout_options());
    let pages = planner.plan(manifest, content, enriched);
    let path = JsonExporter::new(settings.cache_dir()).write_page_plan(&pages)?;
    info!(path = %path.display(), "page plan written");
    Ok(pages)
}

pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    let settings = &config.settings;
    let manifest = load_manifest(settings)?;
    let enriched = load_enriched(settings)?;

    let content = match config.from_stage {
        Stage::Match => {
            info!("=== Matching photos to sessions ===");
            match_content(settings, &manifest, &enriched)?
        }
        Stage::Layout => {
            info!("=== Matching: loading from cache ===");
            load_json(&settings.cache_dir().join(CONTENT_PLAN_FILE))?
        }
    };

    info!("=== Laying out pages ===");
    let pages = plan_pages(settings, &manifest, &content, &enriched)?;

    export_reports(&content, &pages, &settings.output_dir())?;

    Ok(PipelineOutput { content, pages })
}

pub fn export_reports(content: &ContentPlan, pages: &PagePlan, output: &Path) -> Result<()> {
    let text_exporter = TextExporter::new(output.to_path_buf());
    text_exporter.export(content, pages)?;

    let markdown_exporter = MarkdownExporter::new(output.to_path_buf());
    markdown_exporter.export(content, pages)?;

    info!(path = %output.display(), "review outputs written");
    Ok(())
}

pub fn artifact_paths(settings: &Settings) -> Vec<PathBuf> {
    let cache = settings.cache_dir();
    vec![
        cache.join(MANIFEST_FILE),
        cache.join(ENRICHED_PHOTOS_FILE),
        cache.join(CONTENT_PLAN_FILE),
        cache.join(crate::export::json_export::PAGE_PLAN_FILE),
    ]
}
