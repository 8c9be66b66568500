use chrono::{Duration, NaiveDate};

use crate::domain::plan::{Intensity, Phase, TimelineWeek};

pub const PRE_CAMPAIGN_LABEL: &str = "Pre-campaign";

/// Expands phases into consecutive 7-day windows covering
/// `[campaign_start, release_date)`; the final window is cut at release.
pub fn create_timeline(
    phases: &[Phase],
    campaign_start: NaiveDate,
    release_date: NaiveDate,
) -> Vec<TimelineWeek> {
    let mut timeline = Vec::new();
    let mut current = campaign_start;
    let mut week = 1;

    while current < release_date {
        let week_end = (current + Duration::days(7)).min(release_date);

        // Latest qualifying phase in list order wins, so simultaneous starts
        // resolve to the later entry.
        let active_phase = phases.iter().filter(|phase| phase.start_date <= current).last();

        let weeks_to_release = (release_date - current).num_days() / 7;

        timeline.push(TimelineWeek {
            week,
            start_date: current,
            end_date: week_end,
            phase: active_phase
                .map(|phase| phase.name.clone())
                .unwrap_or_else(|| PRE_CAMPAIGN_LABEL.to_string()),
            active_regions: active_phase.map(|phase| phase.regions.clone()).unwrap_or_default(),
            key_activities: weekly_activities(weeks_to_release),
            intensity: active_phase.map_or(Intensity::Low, |phase| phase.intensity),
        });

        current = week_end;
        week += 1;
    }

    timeline
}

/// Recommended activities keyed by whole weeks remaining until release.
pub fn weekly_activities(weeks_to_release: i64) -> Vec<String> {
    let activities: [&str; 3] = match weeks_to_release {
        6.. => [
            "Launch teaser campaign",
            "Build social media presence",
            "Secure media partnerships",
        ],
        4..=5 => ["Release official trailer", "Start paid social campaigns", "Begin PR tour"],
        2..=3 => ["Intensify digital ads", "Launch ticket pre-sales", "Host premiere events"],
        _ => [
            "Final push - all channels",
            "Leverage reviews & testimonials",
            "Drive ticket sales",
        ],
    };
    activities.iter().map(|activity| activity.to_string()).collect()
}
