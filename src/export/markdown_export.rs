use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::plan::{ContentItem, ContentPlan, PagePlan};
use crate::export::Exporter;

/// Markdown report listing every session match and the ones to double-check.
#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    out_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn item_row(item: &ContentItem, first_page: Option<u32>) -> String {
        format!(
            "| {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {} |\n",
            item.id,
            Self::escape_cell(&item.heading),
            item.photo_ids.len(),
            first_page.map_or_else(|| "-".to_string(), |n| n.to_string()),
            item.temporal_confidence(),
            item.semantic_confidence(),
            item.combined_confidence(),
            if item.needs_review { "⚠" } else { "" }
        )
    }

    pub fn render(content: &ContentPlan, pages: &PagePlan) -> String {
        let first_page = |item: &ContentItem| {
            pages
                .pages
                .iter()
                .find(|p| p.content_item_ref.as_deref() == Some(item.id.as_str()))
                .map(|p| p.page_number)
        };

        let mut markdown = String::new();
        markdown.push_str("# Match Review\n\n");
        markdown.push_str(&format!(
            "{} sessions, {} photos, {} pages, {} flagged for review\n\n",
            content.items.len(),
            content.photo_count(),
            pages.pages.len(),
            content.needs_review_count()
        ));

        let flagged: Vec<&ContentItem> = content.items.iter().filter(|i| i.needs_review).collect();
        if !flagged.is_empty() {
            markdown.push_str("## Needs review\n\n");
            for item in &flagged {
                markdown.push_str(&format!(
                    "- **{}** ({}): combined {:.2}, photos: {}\n",
                    Self::escape_cell(&item.heading),
                    item.id,
                    item.combined_confidence(),
                    if item.photo_ids.is_empty() {
                        "none".to_string()
                    } else {
                        item.photo_ids.join(", ")
                    }
                ));
            }
            markdown.push('\n');
        }

        markdown.push_str("## Sessions\n\n");
        markdown.push_str("| Item | Session | Photos | Page | Temporal | Semantic | Combined | Review |\n");
        markdown.push_str("|---|---|---|---|---|---|---|---|\n");
        for item in &content.items {
            markdown.push_str(&Self::item_row(item, first_page(item)));
        }
        markdown
    }
}

impl Exporter for MarkdownExporter {
    fn export(&self, content: &ContentPlan, pages: &PagePlan) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        fs::write(self.out_dir.join("review.md"), Self::render(content, pages))?;
        Ok(())
    }
}
