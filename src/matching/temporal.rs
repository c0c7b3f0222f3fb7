use chrono::{NaiveTime, Timelike};

use crate::core::model::{AgendaSession, Photo};

/// Score when a photo has no timestamp or no session carries times at all.
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Score for an untimed session while its siblings have times.
pub const UNTIMED_SESSION_SCORE: f64 = 0.1;

const OPEN_ENDED_MINUTES: u32 = 90;
const DECAY_MINUTES: f64 = 30.0;
const LAST_MINUTE_OF_DAY: u32 = 23 * 60 + 59;

/// How well a photo's capture time fits the session window, in `[0, 1]`.
///
/// Only the time of day is compared. Calendar date and timezone of the photo
/// are ignored, so multi-day workshops share one clock.
pub fn temporal_score(photo: &Photo, session: &AgendaSession, all_sessions: &[AgendaSession]) -> f64 {
    let Some(timestamp) = photo.best_timestamp() else {
        return NEUTRAL_SCORE;
    };

    if all_sessions.iter().all(|s| s.start_time.is_none()) {
        return NEUTRAL_SCORE;
    }

    let Some(start) = session.start_time else {
        return UNTIMED_SESSION_SCORE;
    };
    let end = effective_end(session, start, all_sessions);

    let time = timestamp.time();
    if start <= time && time <= end {
        return 1.0;
    }

    let distance = minutes_outside(time, start, end) as f64;
    (1.0 - distance / DECAY_MINUTES).max(0.0)
}

/// Own end time, else the next timed session's start, else 90 minutes.
fn effective_end(session: &AgendaSession, start: NaiveTime, all_sessions: &[AgendaSession]) -> NaiveTime {
    if let Some(end) = session.end_time {
        return end;
    }

    all_sessions
        .iter()
        .filter(|s| s.order > session.order)
        .filter_map(|s| s.start_time.map(|t| (s.order, t)))
        .min_by_key(|(order, _)| *order)
        .map(|(_, next_start)| next_start)
        .unwrap_or_else(|| add_minutes(start, OPEN_ENDED_MINUTES))
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn add_minutes(time: NaiveTime, minutes: u32) -> NaiveTime {
    let total = (minute_of_day(time) + minutes).min(LAST_MINUTE_OF_DAY);
    NaiveTime::from_hms_opt(total / 60, total % 60, 0).unwrap_or(time)
}

/// Whole minutes to the nearer window boundary, 0 inside the window.
fn minutes_outside(time: NaiveTime, start: NaiveTime, end: NaiveTime) -> u32 {
    let t = minute_of_day(time);
    let s = minute_of_day(start);
    let e = minute_of_day(end);
    if s <= t && t <= e {
        return 0;
    }
    t.abs_diff(s).min(t.abs_diff(e))
}
