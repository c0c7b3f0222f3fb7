pub mod assign;
pub mod semantic;
pub mod temporal;

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::core::confidence::ConfidenceWeights;
use crate::core::model::{
    AgendaSession, EnrichedPhoto, EnrichedPhotoSet, Photo, ProjectManifest, TextSnippet,
};
use crate::core::plan::{ContentItem, ContentPlan};

use assign::{aggregate, best_session, score_matrix, SessionScore};

pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.65;

/// Chooses which text snippet, if any, accompanies a session.
pub trait SnippetMatcher {
    /// `position` is the session's index after ordering by `order`.
    fn match_snippet(
        &self,
        session: &AgendaSession,
        position: usize,
        snippets: &[TextSnippet],
    ) -> Option<String>;
}

/// Attaches the first snippet to the first session and nothing elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstSessionOnly;

impl SnippetMatcher for FirstSessionOnly {
    fn match_snippet(
        &self,
        _session: &AgendaSession,
        position: usize,
        snippets: &[TextSnippet],
    ) -> Option<String> {
        if position == 0 {
            snippets.first().map(|snippet| snippet.id.clone())
        } else {
            None
        }
    }
}

pub struct AssignmentEngine {
    weights: ConfidenceWeights,
    review_threshold: f64,
    snippets: Box<dyn SnippetMatcher>,
}

impl AssignmentEngine {
    pub fn new(weights: ConfidenceWeights, review_threshold: f64) -> Self {
        Self {
            weights,
            review_threshold,
            snippets: Box::new(FirstSessionOnly),
        }
    }

    pub fn with_snippet_matcher(mut self, matcher: impl SnippetMatcher + 'static) -> Self {
        self.snippets = Box::new(matcher);
        self
    }

    pub fn assign_manifest(&self, manifest: &ProjectManifest, enriched: &EnrichedPhotoSet) -> ContentPlan {
        self.assign(
            &manifest.sessions,
            &manifest.photos,
            enriched,
            &manifest.text_snippets,
        )
    }

    /// Commits every photo to its best-scoring session and builds one item per session.
    pub fn assign(
        &self,
        sessions: &[AgendaSession],
        photos: &[Photo],
        enriched: &EnrichedPhotoSet,
        snippets: &[TextSnippet],
    ) -> ContentPlan {
        if sessions.is_empty() {
            warn!("no sessions in manifest, producing empty content plan");
            return ContentPlan::default();
        }

        let mut ordered: Vec<&AgendaSession> = sessions.iter().collect();
        ordered.sort_by_key(|session| session.order);

        let enriched_map: HashMap<&str, &EnrichedPhoto> = enriched
            .enriched_photos
            .iter()
            .map(|e| (e.photo_id.as_str(), e))
            .collect();

        let matrix = score_matrix(&ordered, sessions, photos, &enriched_map, snippets);

        let mut assigned: Vec<Vec<(String, SessionScore)>> = vec![Vec::new(); ordered.len()];
        for (photo, scores) in photos.iter().zip(&matrix) {
            let Some(best) = best_session(scores, self.weights) else {
                continue;
            };
            debug!(
                photo = %photo.id,
                session = %ordered[best].id,
                confidence = scores[best].fused(self.weights),
                "assigned photo"
            );
            assigned[best].push((photo.id.clone(), scores[best]));
        }

        let items: Vec<ContentItem> = ordered
            .iter()
            .zip(assigned)
            .enumerate()
            .map(|(position, (session, members))| self.build_item(position, session, members, snippets))
            .collect();

        info!(
            sessions = items.len(),
            photos = photos.len(),
            "matched photos to sessions"
        );

        ContentPlan { items }
    }

    fn build_item(
        &self,
        position: usize,
        session: &AgendaSession,
        photos: Vec<(String, SessionScore)>,
        snippets: &[TextSnippet],
    ) -> ContentItem {
        let scores: Vec<SessionScore> = photos.iter().map(|(_, score)| *score).collect();
        let totals = aggregate(&scores);
        let photo_ids = photos.into_iter().map(|(id, _)| id).collect::<Vec<_>>();

        let item = ContentItem::new(
            format!("item_{:03}", position + 1),
            session.id.clone(),
            session.name.clone(),
            photo_ids,
            self.snippets.match_snippet(session, position, snippets),
            totals.temporal,
            totals.semantic,
            self.weights,
            self.review_threshold,
        );

        info!(
            "  [{}] {} - {} photos, confidence {:.2}{}",
            session.id,
            session.name,
            item.photo_ids.len(),
            item.combined_confidence(),
            if item.needs_review { " (review)" } else { "" }
        );

        item
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(ConfidenceWeights::default(), DEFAULT_REVIEW_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use pretty_assertions::assert_eq;

    use crate::core::model::{Orientation, SceneType};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 9)
            .expect("valid date")
            .and_time(hm(h, m))
    }

    fn photo(id: &str, timestamp: Option<NaiveDateTime>) -> Photo {
        Photo {
            id: id.to_string(),
            filename: format!("{id}.jpg"),
            path: PathBuf::from(format!("fotos/{id}.jpg")),
            timestamp_exif: timestamp,
            timestamp_file: None,
            width: 4000,
            height: 3000,
            orientation: Orientation::Landscape,
        }
    }

    fn timed(id: &str, order: u32, name: &str, start: (u32, u32), end: (u32, u32)) -> AgendaSession {
        AgendaSession::new(id, order, name).with_times(Some(hm(start.0, start.1)), Some(hm(end.0, end.1)))
    }

    fn snippet(id: &str) -> TextSnippet {
        TextSnippet {
            id: id.to_string(),
            filename: format!("{id}.txt"),
            content: "Notizen".to_string(),
            word_count: 1,
        }
    }

    fn enriched(photo_id: &str, keywords: &[&str]) -> EnrichedPhoto {
        EnrichedPhoto {
            photo_id: photo_id.to_string(),
            scene_type: SceneType::Flipchart,
            description: String::new(),
            ocr_text: None,
            topic_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            crop_box: None,
            processed_path: None,
            analysis_model: "vision".to_string(),
        }
    }

    #[test]
    fn empty_sessions_give_empty_plan() {
        let plan = AssignmentEngine::default().assign(
            &[],
            &[photo("p1", Some(at(9, 0)))],
            &EnrichedPhotoSet::default(),
            &[],
        );
        assert!(plan.items.is_empty());
    }

    #[test]
    fn single_session_takes_every_photo() {
        let sessions = vec![AgendaSession::new("s1", 1, "Workshop")];
        let photos = vec![photo("p1", None), photo("p2", Some(at(9, 0))), photo("p3", None)];
        let plan = AssignmentEngine::default().assign(&sessions, &photos, &EnrichedPhotoSet::default(), &[]);
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].photo_ids, vec!["p1", "p2", "p3"]);
        assert_eq!(plan.items[0].heading, "Workshop");
        assert_eq!(plan.items[0].session_ref, "s1");
    }

    #[test]
    fn photos_follow_their_time_windows() {
        let sessions = vec![
            timed("s1", 1, "Kickoff", (9, 0), (10, 0)),
            timed("s2", 2, "Arbeitsphase", (10, 0), (12, 0)),
            timed("s3", 3, "Abschluss", (13, 0), (14, 0)),
        ];
        let photos = vec![
            photo("p1", Some(at(9, 15))),
            photo("p2", Some(at(11, 0))),
            photo("p3", Some(at(13, 30))),
            photo("p4", Some(at(9, 45))),
        ];
        let plan = AssignmentEngine::default().assign(&sessions, &photos, &EnrichedPhotoSet::default(), &[]);
        assert_eq!(plan.items[0].photo_ids, vec!["p1", "p4"]);
        assert_eq!(plan.items[1].photo_ids, vec!["p2"]);
        assert_eq!(plan.items[2].photo_ids, vec!["p3"]);
        assert_eq!(plan.items[0].temporal_confidence(), 1.0);
    }

    #[test]
    fn boundary_photo_goes_to_first_session() {
        let sessions = vec![
            timed("s1", 1, "Kickoff", (9, 0), (10, 0)),
            timed("s2", 2, "Arbeitsphase", (10, 0), (11, 0)),
        ];
        let photos = vec![photo("p1", Some(at(10, 0)))];
        let plan = AssignmentEngine::default().assign(&sessions, &photos, &EnrichedPhotoSet::default(), &[]);
        assert_eq!(plan.items[0].photo_ids, vec!["p1"]);
        assert!(plan.items[1].photo_ids.is_empty());
    }

    #[test]
    fn sessions_are_processed_by_order() {
        let sessions = vec![
            AgendaSession::new("late", 2, "Abschluss"),
            AgendaSession::new("early", 1, "Kickoff"),
        ];
        let plan = AssignmentEngine::default().assign(&sessions, &[], &EnrichedPhotoSet::default(), &[snippet("t1")]);
        assert_eq!(plan.items[0].session_ref, "early");
        assert_eq!(plan.items[0].id, "item_001");
        assert_eq!(plan.items[0].text_snippet_ref.as_deref(), Some("t1"));
        assert_eq!(plan.items[1].session_ref, "late");
        assert_eq!(plan.items[1].text_snippet_ref, None);
    }

    #[test]
    fn session_without_photos_is_neutral_and_not_flagged() {
        let sessions = vec![AgendaSession::new("s1", 1, "Kickoff")];
        let plan = AssignmentEngine::new(ConfidenceWeights::default(), 0.5)
            .assign(&sessions, &[], &EnrichedPhotoSet::default(), &[]);
        let item = &plan.items[0];
        assert!(item.photo_ids.is_empty());
        assert_eq!(item.temporal_confidence(), 0.5);
        assert_eq!(item.semantic_confidence(), 0.5);
        assert_eq!(item.combined_confidence(), 0.5);
        assert!(!item.needs_review);
    }

    #[test]
    fn low_confidence_needs_review() {
        let sessions = vec![timed("s1", 1, "Kickoff", (9, 0), (10, 0))];
        let photos = vec![photo("p1", Some(at(9, 30)))];
        let plan = AssignmentEngine::default().assign(&sessions, &photos, &EnrichedPhotoSet::default(), &[]);
        // 0.6 * 1.0 + 0.4 * 0.1
        assert_eq!(plan.items[0].combined_confidence(), 0.64);
        assert!(plan.items[0].needs_review);
    }

    #[test]
    fn keyword_overlap_lifts_confidence_above_threshold() {
        let sessions = vec![timed("s1", 1, "Feedback Runde", (9, 0), (10, 0))];
        let photos = vec![photo("p1", Some(at(9, 30)))];
        let enriched = EnrichedPhotoSet {
            enriched_photos: vec![enriched("p1", &["feedback", "runde"])],
        };
        let plan = AssignmentEngine::default().assign(&sessions, &photos, &enriched, &[]);
        assert_eq!(plan.items[0].semantic_confidence(), 1.0);
        assert_eq!(plan.items[0].combined_confidence(), 1.0);
        assert!(!plan.items[0].needs_review);
    }

    #[test]
    fn semantic_signal_breaks_temporal_ties() {
        let sessions = vec![
            AgendaSession::new("s1", 1, "Kickoff"),
            AgendaSession::new("s2", 2, "Budget Planung"),
        ];
        let photos = vec![photo("p1", None)];
        let enriched = EnrichedPhotoSet {
            enriched_photos: vec![enriched("p1", &["budget"])],
        };
        let plan = AssignmentEngine::default().assign(&sessions, &photos, &enriched, &[]);
        assert_eq!(plan.items[1].photo_ids, vec!["p1"]);
    }

    struct NoSnippets;

    impl SnippetMatcher for NoSnippets {
        fn match_snippet(&self, _: &AgendaSession, _: usize, _: &[TextSnippet]) -> Option<String> {
            None
        }
    }

    #[test]
    fn snippet_matcher_is_replaceable() {
        let sessions = vec![AgendaSession::new("s1", 1, "Kickoff")];
        let plan = AssignmentEngine::default()
            .with_snippet_matcher(NoSnippets)
            .assign(&sessions, &[], &EnrichedPhotoSet::default(), &[snippet("t1")]);
        assert_eq!(plan.items[0].text_snippet_ref, None);
    }
}
