use chrono::{Duration, NaiveDate};

use crate::domain::plan::Milestone;

/// Weeks before release and the milestone anchored there; each is kept only
/// when it falls after campaign launch.
const PRE_RELEASE_MILESTONES: [(i64, &str, &str); 3] = [
    (4, "Official Trailer Release", "Major media push, paid amplification"),
    (2, "Ticket Pre-Sales Open", "Drive early bookings, create urgency"),
    (1, "World Premiere", "Red carpet event, press coverage, reviews"),
];

pub fn generate_milestones(campaign_start: NaiveDate, release_date: NaiveDate) -> Vec<Milestone> {
    let mut milestones = vec![milestone(
        campaign_start,
        "Campaign Launch",
        "Teaser release, social media kickoff",
    )];

    for (weeks_before, name, description) in PRE_RELEASE_MILESTONES {
        let date = release_date - Duration::weeks(weeks_before);
        if date > campaign_start {
            milestones.push(milestone(date, name, description));
        }
    }

    milestones.push(milestone(
        release_date,
        "Release Day",
        "Full availability, maximize opening weekend",
    ));

    milestones.sort_by_key(|entry| entry.date);
    milestones
}

fn milestone(date: NaiveDate, name: &str, description: &str) -> Milestone {
    Milestone { date, milestone: name.to_string(), description: description.to_string() }
}
