pub mod content;
pub mod cover;

pub use cover::{format_date, Language};

use tracing::info;

use crate::core::model::{EnrichedPhotoSet, ProjectManifest};
use crate::core::plan::{ContentPlan, Page, PagePlan};
use content::{content_pages, section_divider, PhotoLookup};
use cover::cover_page;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub max_photos_per_page: usize,
    pub section_dividers: bool,
    pub language: Language,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_photos_per_page: 2,
            section_dividers: false,
            language: Language::De,
        }
    }
}

/// Turns a content plan into numbered pages: cover, then per item an
/// optional divider followed by its content pages.
#[derive(Debug, Clone, Default)]
pub struct LayoutPlanner {
    options: LayoutOptions,
}

impl LayoutPlanner {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn plan(
        &self,
        manifest: &ProjectManifest,
        content: &ContentPlan,
        enriched: &EnrichedPhotoSet,
    ) -> PagePlan {
        let photos = PhotoLookup {
            orientations: manifest
                .photos
                .iter()
                .map(|photo| (photo.id.as_str(), photo.orientation))
                .collect(),
            enriched: enriched
                .enriched_photos
                .iter()
                .map(|e| (e.photo_id.as_str(), e))
                .collect(),
        };

        let mut pages: Vec<Page> = Vec::new();
        pages.push(cover_page(1, &manifest.meta, self.options.language));

        for item in &content.items {
            if self.options.section_dividers {
                pages.push(section_divider(next_page_number(&pages), item));
            }
            let item_pages = content_pages(
                next_page_number(&pages),
                item,
                &photos,
                self.options.max_photos_per_page,
            );
            pages.extend(item_pages);
        }

        let plan = PagePlan { pages };
        info!(pages = plan.pages.len(), "laid out page plan");
        for (page_type, count) in plan.type_counts() {
            info!("  {:<18} {}", page_type.as_str(), count);
        }
        plan
    }
}

fn next_page_number(pages: &[Page]) -> u32 {
    pages.len() as u32 + 1
}
