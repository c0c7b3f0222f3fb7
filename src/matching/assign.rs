use std::collections::{HashMap, HashSet};

use crate::core::confidence::{fuse, round4, ConfidenceWeights};
use crate::core::model::{AgendaSession, EnrichedPhoto, Photo, TextSnippet};
use crate::matching::semantic::{photo_vocabulary, session_vocabulary, vocabulary_score, SEMANTIC_FLOOR};
use crate::matching::temporal::{temporal_score, NEUTRAL_SCORE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionScore {
    pub temporal: f64,
    pub semantic: f64,
}

impl SessionScore {
    pub fn fused(&self, weights: ConfidenceWeights) -> f64 {
        fuse(self.temporal, self.semantic, weights)
    }
}

/// Scores of every photo (rows) against every session (columns, in the given order).
pub fn score_matrix(
    ordered_sessions: &[&AgendaSession],
    all_sessions: &[AgendaSession],
    photos: &[Photo],
    enriched: &HashMap<&str, &EnrichedPhoto>,
    snippets: &[TextSnippet],
) -> Vec<Vec<SessionScore>> {
    let session_words: Vec<HashSet<String>> = ordered_sessions
        .iter()
        .map(|session| session_vocabulary(session, snippets))
        .collect();

    photos
        .iter()
        .map(|photo| {
            let photo_words = enriched.get(photo.id.as_str()).map(|e| photo_vocabulary(e));
            ordered_sessions
                .iter()
                .zip(&session_words)
                .map(|(session, words)| SessionScore {
                    temporal: temporal_score(photo, session, all_sessions),
                    semantic: photo_words
                        .as_ref()
                        .map_or(SEMANTIC_FLOOR, |pw| vocabulary_score(pw, words)),
                })
                .collect()
        })
        .collect()
}

/// Index of the highest fused score. The first maximum wins on ties.
pub fn best_session(scores: &[SessionScore], weights: ConfidenceWeights) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, score) in scores.iter().enumerate() {
        let fused = score.fused(weights);
        match best {
            Some((_, best_score)) if fused <= best_score => {}
            _ => best = Some((idx, fused)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Mean temporal and semantic score, neutral when nothing was assigned.
pub fn aggregate(scores: &[SessionScore]) -> SessionScore {
    if scores.is_empty() {
        return SessionScore {
            temporal: NEUTRAL_SCORE,
            semantic: NEUTRAL_SCORE,
        };
    }
    let count = scores.len() as f64;
    SessionScore {
        temporal: round4(scores.iter().map(|s| s.temporal).sum::<f64>() / count),
        semantic: round4(scores.iter().map(|s| s.semantic).sum::<f64>() / count),
    }
}
