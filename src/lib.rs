pub mod config;
pub mod core;
pub mod export;
pub mod layout;
pub mod matching;
pub mod pipeline;

pub use config::Settings;
pub use core::plan::{ContentItem, ContentPlan, Page, PagePlan};
pub use layout::LayoutPlanner;
pub use matching::AssignmentEngine;
