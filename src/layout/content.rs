use std::collections::HashMap;

use crate::core::model::{EnrichedPhoto, Orientation};
use crate::core::plan::{ContentItem, DisplaySize, LayoutVariant, Page, PageType, PhotoSlot, TextBlock};

/// Lookups the content pages need for every photo.
pub struct PhotoLookup<'a> {
    pub orientations: HashMap<&'a str, Orientation>,
    pub enriched: HashMap<&'a str, &'a EnrichedPhoto>,
}

impl PhotoLookup<'_> {
    /// Ingestion orientation first, then crop-box aspect, then landscape.
    pub fn orientation(&self, photo_id: &str) -> Orientation {
        if let Some(orientation) = self.orientations.get(photo_id) {
            return *orientation;
        }
        match self.enriched.get(photo_id).and_then(|e| e.crop_box) {
            Some(crop) if crop.is_portrait() => Orientation::Portrait,
            _ => Orientation::Landscape,
        }
    }

    pub fn caption(&self, photo_id: &str) -> String {
        self.enriched
            .get(photo_id)
            .map(|e| e.description.clone())
            .unwrap_or_default()
    }
}

pub fn section_divider(page_number: u32, item: &ContentItem) -> Page {
    Page {
        page_number,
        page_type: PageType::SectionDivider,
        layout_variant: LayoutVariant::TextOnly,
        content_item_ref: Some(item.id.clone()),
        photo_slots: Vec::new(),
        text_blocks: vec![TextBlock::heading(item.heading.clone())],
    }
}

/// Content pages for one item; the heading only goes on the first one.
pub fn content_pages(
    start_page: u32,
    item: &ContentItem,
    photos: &PhotoLookup<'_>,
    max_per_page: usize,
) -> Vec<Page> {
    if item.photo_ids.is_empty() {
        return vec![Page {
            page_number: start_page,
            page_type: PageType::Content,
            layout_variant: LayoutVariant::TextOnly,
            content_item_ref: Some(item.id.clone()),
            photo_slots: Vec::new(),
            text_blocks: vec![TextBlock::heading(item.heading.clone())],
        }];
    }

    item.photo_ids
        .chunks(max_per_page.max(1))
        .enumerate()
        .map(|(batch_idx, batch)| {
            let text_blocks = if batch_idx == 0 {
                vec![TextBlock::heading(item.heading.clone())]
            } else {
                Vec::new()
            };
            let photo_slots: Vec<PhotoSlot> = batch
                .iter()
                .map(|photo_id| photo_slot(photo_id, photos))
                .collect();

            Page {
                page_number: start_page + batch_idx as u32,
                page_type: PageType::Content,
                layout_variant: layout_variant(photo_slots.len()),
                content_item_ref: Some(item.id.clone()),
                photo_slots,
                text_blocks,
            }
        })
        .collect()
}

fn photo_slot(photo_id: &str, photos: &PhotoLookup<'_>) -> PhotoSlot {
    PhotoSlot {
        photo_id: photo_id.to_string(),
        caption: photos.caption(photo_id),
        display_size: display_size(photos.orientation(photo_id)),
    }
}

/// Portraits sit side by side, or centred when alone. Landscapes and squares
/// span the width and stack when paired.
pub fn display_size(orientation: Orientation) -> DisplaySize {
    match orientation {
        Orientation::Portrait => DisplaySize::PortraitPair,
        Orientation::Landscape | Orientation::Square => DisplaySize::FullWidth,
    }
}

pub fn layout_variant(slot_count: usize) -> LayoutVariant {
    match slot_count {
        0 => LayoutVariant::TextOnly,
        1 => LayoutVariant::OnePhoto,
        _ => LayoutVariant::TwoPhoto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::core::confidence::ConfidenceWeights;
    use crate::core::geometry::CropBox;
    use crate::core::model::SceneType;

    fn item(photo_ids: &[&str]) -> ContentItem {
        ContentItem::new(
            "item_001",
            "s1",
            "Kickoff",
            photo_ids.iter().map(|id| id.to_string()).collect(),
            None,
            1.0,
            0.5,
            ConfidenceWeights::default(),
            0.65,
        )
    }

    fn enriched(photo_id: &str, crop_box: Option<CropBox>) -> EnrichedPhoto {
        EnrichedPhoto {
            photo_id: photo_id.to_string(),
            scene_type: SceneType::Flipchart,
            description: format!("Beschreibung {photo_id}"),
            ocr_text: None,
            topic_keywords: vec![],
            crop_box,
            processed_path: None,
            analysis_model: "vision".to_string(),
        }
    }

    fn lookup<'a>(orientations: &[(&'a str, Orientation)], enriched: &'a [EnrichedPhoto]) -> PhotoLookup<'a> {
        PhotoLookup {
            orientations: orientations.iter().copied().collect(),
            enriched: enriched.iter().map(|e| (e.photo_id.as_str(), e)).collect(),
        }
    }

    #[test]
    fn three_photos_two_per_page() {
        let photos = lookup(&[], &[]);
        let pages = content_pages(2, &item(&["p1", "p2", "p3"]), &photos, 2);
        let counts: Vec<usize> = pages.iter().map(|p| p.photo_slots.len()).collect();
        assert_eq!(counts, vec![2, 1]);
        assert_eq!(pages[0].page_number, 2);
        assert_eq!(pages[1].page_number, 3);
    }

    #[test]
    fn heading_only_on_first_batch() {
        let photos = lookup(&[], &[]);
        let pages = content_pages(1, &item(&["p1", "p2", "p3"]), &photos, 1);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].heading(), Some("Kickoff"));
        assert!(pages[1].text_blocks.is_empty());
        assert!(pages[2].text_blocks.is_empty());
    }

    #[test]
    fn empty_item_yields_text_only_page() {
        let photos = lookup(&[], &[]);
        let pages = content_pages(4, &item(&[]), &photos, 2);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].layout_variant, LayoutVariant::TextOnly);
        assert_eq!(pages[0].page_type, PageType::Content);
        assert_eq!(pages[0].heading(), Some("Kickoff"));
    }

    #[test]
    fn orientation_prefers_ingestion_over_crop_box() {
        let enriched = vec![enriched("p1", Some(CropBox::new(0.3, 0.0, 0.6, 0.9)))];
        let photos = lookup(&[("p1", Orientation::Landscape)], &enriched);
        assert_eq!(photos.orientation("p1"), Orientation::Landscape);
    }

    #[test]
    fn orientation_falls_back_to_crop_box_then_landscape() {
        let enriched = vec![
            enriched("tall", Some(CropBox::new(0.3, 0.0, 0.6, 0.9))),
            enriched("plain", None),
        ];
        let photos = lookup(&[], &enriched);
        assert_eq!(photos.orientation("tall"), Orientation::Portrait);
        assert_eq!(photos.orientation("plain"), Orientation::Landscape);
        assert_eq!(photos.orientation("missing"), Orientation::Landscape);
    }

    #[test]
    fn single_photo_sizes() {
        let photos = lookup(
            &[
                ("wide", Orientation::Landscape),
                ("tall", Orientation::Portrait),
                ("sq", Orientation::Square),
            ],
            &[],
        );

        let pages = content_pages(1, &item(&["tall"]), &photos, 2);
        let page = &pages[0];
        assert_eq!(page.layout_variant, LayoutVariant::OnePhoto);
        assert_eq!(page.photo_slots[0].display_size, DisplaySize::PortraitPair);

        let pages = content_pages(1, &item(&["wide"]), &photos, 2);
        let page = &pages[0];
        assert_eq!(page.layout_variant, LayoutVariant::OnePhoto);
        assert_eq!(page.photo_slots[0].display_size, DisplaySize::FullWidth);

        let pages = content_pages(1, &item(&["sq"]), &photos, 2);
        let page = &pages[0];
        assert_eq!(page.photo_slots[0].display_size, DisplaySize::FullWidth);
    }

    #[test]
    fn paired_photo_sizes() {
        let photos = lookup(
            &[
                ("t1", Orientation::Portrait),
                ("t2", Orientation::Portrait),
                ("w1", Orientation::Landscape),
                ("w2", Orientation::Landscape),
            ],
            &[],
        );
        let sizes = |ids: &[&str]| -> Vec<DisplaySize> {
            let pages = content_pages(1, &item(ids), &photos, 2);
            let page = &pages[0];
            assert_eq!(page.layout_variant, LayoutVariant::TwoPhoto);
            page.photo_slots.iter().map(|s| s.display_size).collect()
        };

        assert_eq!(sizes(&["t1", "t2"]), vec![DisplaySize::PortraitPair, DisplaySize::PortraitPair]);
        assert_eq!(sizes(&["w1", "w2"]), vec![DisplaySize::FullWidth, DisplaySize::FullWidth]);
        assert_eq!(sizes(&["t1", "w1"]), vec![DisplaySize::PortraitPair, DisplaySize::FullWidth]);
    }

    #[test]
    fn caption_comes_from_description() {
        let enriched = vec![enriched("p1", None)];
        let photos = lookup(&[], &enriched);
        let pages = content_pages(1, &item(&["p1", "p2"]), &photos, 2);
        assert_eq!(pages[0].photo_slots[0].caption, "Beschreibung p1");
        assert_eq!(pages[0].photo_slots[1].caption, "");
    }
}
