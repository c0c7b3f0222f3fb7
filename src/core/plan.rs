use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::confidence::{fuse, round4, ConfidenceWeights};

/// Photos and confidences for one agenda session.
///
/// Both scores are stored rounded to four decimals so the JSON artifact
/// reloads to the same values.
/// The combined confidence is always derived from the two stored scores and
/// the weights they were fused with. It is written out for consumers of the
/// JSON artifact but never read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ContentItemRecord", from = "ContentItemRecord")]
pub struct ContentItem {
    pub id: String,
    pub session_ref: String,
    pub heading: String,
    pub photo_ids: Vec<String>,
    pub text_snippet_ref: Option<String>,
    temporal_confidence: f64,
    semantic_confidence: f64,
    weights: ConfidenceWeights,
    pub needs_review: bool,
}

impl ContentItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        session_ref: impl Into<String>,
        heading: impl Into<String>,
        photo_ids: Vec<String>,
        text_snippet_ref: Option<String>,
        temporal_confidence: f64,
        semantic_confidence: f64,
        weights: ConfidenceWeights,
        review_threshold: f64,
    ) -> Self {
        let mut item = Self {
            id: id.into(),
            session_ref: session_ref.into(),
            heading: heading.into(),
            photo_ids,
            text_snippet_ref,
            temporal_confidence: round4(temporal_confidence),
            semantic_confidence: round4(semantic_confidence),
            weights,
            needs_review: false,
        };
        item.needs_review = item.combined_confidence() < review_threshold;
        item
    }

    pub fn temporal_confidence(&self) -> f64 {
        self.temporal_confidence
    }

    pub fn semantic_confidence(&self) -> f64 {
        self.semantic_confidence
    }

    pub fn weights(&self) -> ConfidenceWeights {
        self.weights
    }

    pub fn combined_confidence(&self) -> f64 {
        fuse(self.temporal_confidence, self.semantic_confidence, self.weights)
    }
}

#[derive(Serialize, Deserialize)]
struct ContentItemRecord {
    id: String,
    session_ref: String,
    heading: String,
    #[serde(default)]
    photo_ids: Vec<String>,
    #[serde(default)]
    text_snippet_ref: Option<String>,
    temporal_confidence: f64,
    semantic_confidence: f64,
    #[serde(default)]
    weights: ConfidenceWeights,
    #[serde(default, skip_deserializing)]
    combined_confidence: f64,
    needs_review: bool,
}

impl From<ContentItem> for ContentItemRecord {
    fn from(item: ContentItem) -> Self {
        let combined_confidence = item.combined_confidence();
        Self {
            id: item.id,
            session_ref: item.session_ref,
            heading: item.heading,
            photo_ids: item.photo_ids,
            text_snippet_ref: item.text_snippet_ref,
            temporal_confidence: item.temporal_confidence,
            semantic_confidence: item.semantic_confidence,
            weights: item.weights,
            combined_confidence,
            needs_review: item.needs_review,
        }
    }
}

impl From<ContentItemRecord> for ContentItem {
    fn from(record: ContentItemRecord) -> Self {
        Self {
            id: record.id,
            session_ref: record.session_ref,
            heading: record.heading,
            photo_ids: record.photo_ids,
            text_snippet_ref: record.text_snippet_ref,
            temporal_confidence: record.temporal_confidence,
            semantic_confidence: record.semantic_confidence,
            weights: record.weights,
            needs_review: record.needs_review,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPlan {
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

impl ContentPlan {
    pub fn needs_review_count(&self) -> usize {
        self.items.iter().filter(|item| item.needs_review).count()
    }

    pub fn photo_count(&self) -> usize {
        self.items.iter().map(|item| item.photo_ids.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Cover,
    SectionDivider,
    Content,
    Closing,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Cover => "cover",
            PageType::SectionDivider => "section_divider",
            PageType::Content => "content",
            PageType::Closing => "closing",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LayoutVariant {
    #[serde(rename = "1-photo")]
    OnePhoto,
    #[serde(rename = "2-photo")]
    TwoPhoto,
    #[serde(rename = "text-only")]
    TextOnly,
}

impl LayoutVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutVariant::OnePhoto => "1-photo",
            LayoutVariant::TwoPhoto => "2-photo",
            LayoutVariant::TextOnly => "text-only",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DisplaySize {
    FullWidth,
    HalfWidth,
    PortraitPair,
}

impl DisplaySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplaySize::FullWidth => "full-width",
            DisplaySize::HalfWidth => "half-width",
            DisplaySize::PortraitPair => "portrait-pair",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoSlot {
    pub photo_id: String,
    pub caption: String,
    pub display_size: DisplaySize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Heading,
    Body,
    Caption,
    Footer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub role: TextRole,
    /// Key into the renderer's typography table, e.g. "heading".
    pub style_ref: String,
}

impl TextBlock {
    pub fn heading(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: TextRole::Heading,
            style_ref: "heading".to_string(),
        }
    }

    pub fn body(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: TextRole::Body,
            style_ref: "body".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub page_number: u32,
    pub page_type: PageType,
    pub layout_variant: LayoutVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_item_ref: Option<String>,
    #[serde(default)]
    pub photo_slots: Vec<PhotoSlot>,
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
}

impl Page {
    /// Text-only closing page for callers that want one; the planner never adds it.
    pub fn closing(page_number: u32, text_blocks: Vec<TextBlock>) -> Self {
        Self {
            page_number,
            page_type: PageType::Closing,
            layout_variant: LayoutVariant::TextOnly,
            content_item_ref: None,
            photo_slots: Vec::new(),
            text_blocks,
        }
    }

    pub fn heading(&self) -> Option<&str> {
        self.text_blocks
            .iter()
            .find(|block| block.role == TextRole::Heading)
            .map(|block| block.content.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl PagePlan {
    pub fn type_counts(&self) -> BTreeMap<PageType, usize> {
        let mut counts = BTreeMap::new();
        for page in &self.pages {
            *counts.entry(page.page_type).or_insert(0) += 1;
        }
        counts
    }

    /// Appends a closing page numbered after the last page.
    pub fn push_closing(&mut self, text_blocks: Vec<TextBlock>) {
        let next = self.pages.last().map_or(1, |page| page.page_number + 1);
        self.pages.push(Page::closing(next, text_blocks));
    }
}
