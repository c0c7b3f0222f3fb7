use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::plan::{ContentPlan, PagePlan};

pub const CONTENT_PLAN_FILE: &str = "content_plan.json";
pub const PAGE_PLAN_FILE: &str = "page_plan.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn write_content_plan(&self, content: &ContentPlan) -> Result<PathBuf> {
        self.write(CONTENT_PLAN_FILE, content)
    }

    pub fn write_page_plan(&self, pages: &PagePlan) -> Result<PathBuf> {
        self.write(PAGE_PLAN_FILE, pages)
    }

    fn write<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create {}", self.out_dir.display()))?;
        let path = self.out_dir.join(file_name);
        let data = serde_json::to_string_pretty(value)?;
        fs::write(&path, data).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
