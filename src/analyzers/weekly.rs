use crate::analyzers::types::WeeklyHistogram;
use crate::model::{Incident, IncidentState};
use chrono::{DateTime, Datelike, Duration, Utc};

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Maps a Sunday-based weekday number (Sunday = 0) onto a Monday-first index.
pub fn weekday_index(days_from_sunday: u32) -> usize {
    if days_from_sunday == 0 {
        6
    } else {
        days_from_sunday as usize - 1
    }
}

/// Buckets the incidents reported in the seven days up to `now` by weekday
/// and state.
///
/// The window's lower bound `now - 7 days` is inclusive. Incidents without a
/// usable `reported_at` are skipped. An incident with an unrecognized state
/// counts towards `total` but lands in none of the state buckets.
pub fn bucket_last_week(incidents: &[Incident], now: DateTime<Utc>) -> WeeklyHistogram {
    let cutoff = now - Duration::days(7);

    let mut histogram = WeeklyHistogram {
        labels: WEEKDAY_LABELS,
        pending: [0; 7],
        in_progress: [0; 7],
        resolved: [0; 7],
        total: 0,
    };

    for incident in incidents {
        let Some(reported_at) = incident.reported_at else {
            continue;
        };
        if reported_at < cutoff {
            continue;
        }

        histogram.total += 1;
        let day = weekday_index(reported_at.weekday().num_days_from_sunday());

        match incident.state {
            IncidentState::Pending => histogram.pending[day] += 1,
            IncidentState::InProgress => histogram.in_progress[day] += 1,
            IncidentState::Resolved => histogram.resolved[day] += 1,
            IncidentState::Unrecognized => {}
        }
    }

    histogram
}
