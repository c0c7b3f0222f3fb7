use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::plan::{ContentPlan, Page, PagePlan, TextRole};
use crate::export::Exporter;

/// Plain-text outline of the page plan for proofreading.
#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn format_page(page: &Page) -> String {
        let mut out = format!(
            "=== Page {} ({}, {}) ===\n",
            page.page_number,
            page.page_type.as_str(),
            page.layout_variant.as_str()
        );
        for block in &page.text_blocks {
            match block.role {
                TextRole::Heading => out.push_str(&format!("# {}\n", block.content)),
                _ => out.push_str(&format!("{}\n", block.content)),
            }
        }
        for slot in &page.photo_slots {
            if slot.caption.is_empty() {
                out.push_str(&format!("[{}] {}\n", slot.display_size.as_str(), slot.photo_id));
            } else {
                out.push_str(&format!(
                    "[{}] {} - {}\n",
                    slot.display_size.as_str(),
                    slot.photo_id,
                    slot.caption
                ));
            }
        }
        out
    }
}

impl Exporter for TextExporter {
    fn export(&self, _content: &ContentPlan, pages: &PagePlan) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;

        let mut full_text = String::new();
        for page in &pages.pages {
            full_text.push_str(&Self::format_page(page));
            full_text.push('\n');
        }

        fs::write(self.out_dir.join("outline.txt"), full_text)?;
        Ok(())
    }
}
