use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::core::geometry::CropBox;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkshopMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<u32>,
}

impl WorkshopMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            workshop_date: None,
            location: None,
            participants: None,
        }
    }
}

/// One time-boxed slot of the workshop agenda.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgendaSession {
    pub id: String,
    /// 1-based position in the day.
    pub order: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
}

impl AgendaSession {
    pub fn new(id: impl Into<String>, order: u32, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order,
            name: name.into(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_times(mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        match width.cmp(&height) {
            std::cmp::Ordering::Greater => Orientation::Landscape,
            std::cmp::Ordering::Less => Orientation::Portrait,
            std::cmp::Ordering::Equal => Orientation::Square,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    pub id: String,
    pub filename: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_exif: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_file: Option<NaiveDateTime>,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
}

impl Photo {
    /// EXIF capture time if present, file modification time otherwise.
    pub fn best_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp_exif.or(self.timestamp_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextSnippet {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectManifest {
    pub meta: WorkshopMeta,
    #[serde(default)]
    pub sessions: Vec<AgendaSession>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub text_snippets: Vec<TextSnippet>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SceneType {
    Flipchart,
    Group,
    Activity,
    Result,
    Unknown,
}

/// Vision analysis of one photo, keyed by `photo_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedPhoto {
    pub photo_id: String,
    pub scene_type: SceneType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub topic_keywords: Vec<String>,
    /// Only set for document scenes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_box: Option<CropBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_path: Option<PathBuf>,
    #[serde(default)]
    pub analysis_model: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnrichedPhotoSet {
    #[serde(default)]
    pub enriched_photos: Vec<EnrichedPhoto>,
}

impl EnrichedPhotoSet {
    pub fn by_photo_id(&self, photo_id: &str) -> Option<&EnrichedPhoto> {
        self.enriched_photos
            .iter()
            .find(|enriched| enriched.photo_id == photo_id)
    }
}
