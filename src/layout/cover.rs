use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::model::WorkshopMeta;
use crate::core::plan::{LayoutVariant, Page, PageType, TextBlock};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

const MONTHS_DE: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober",
    "November", "Dezember",
];

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Long-form date without a leading zero on the day, e.g. "9. Februar 2026".
pub fn format_date(date: NaiveDate, language: Language) -> String {
    let month = date.month0() as usize;
    match language {
        Language::De => format!("{}. {} {}", date.day(), MONTHS_DE[month], date.year()),
        Language::En => format!("{} {} {}", date.day(), MONTHS_EN[month], date.year()),
    }
}

pub fn cover_page(page_number: u32, meta: &WorkshopMeta, language: Language) -> Page {
    let mut text_blocks = vec![TextBlock::heading(meta.title.clone())];
    if let Some(date) = meta.workshop_date {
        text_blocks.push(TextBlock::body(format_date(date, language)));
    }
    if let Some(location) = meta.location.as_deref().filter(|l| !l.trim().is_empty()) {
        text_blocks.push(TextBlock::body(location));
    }

    Page {
        page_number,
        page_type: PageType::Cover,
        layout_variant: LayoutVariant::TextOnly,
        content_item_ref: None,
        photo_slots: Vec::new(),
        text_blocks,
    }
}
