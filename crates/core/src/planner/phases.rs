use chrono::{Duration, NaiveDate};

use crate::domain::plan::{Intensity, MovieSignature, Phase};
use crate::domain::region::{RegionScore, Tier};

const TIER_B_OFFSET_SHARE: f64 = 0.35;
const TIER_B_MIN_OFFSET: i64 = 1;
const TIER_C_OFFSET_SHARE: f64 = 0.65;
const TIER_C_MIN_OFFSET: i64 = 2;

/// Groups ranked regions into at most three sequential phases, one per present
/// tier. B and C phases are dropped when their start would land on or after
/// release.
pub fn create_phases(
    ranked_regions: &[RegionScore],
    campaign_start: NaiveDate,
    release_date: NaiveDate,
    signature: &MovieSignature,
    campaign_weeks: i64,
) -> Vec<Phase> {
    let tier_regions = |tier: Tier| -> Vec<String> {
        ranked_regions
            .iter()
            .filter(|region| region.tier == tier)
            .map(|region| region.region.clone())
            .collect()
    };
    let tier_a = tier_regions(Tier::A);
    let tier_b = tier_regions(Tier::B);
    let tier_c = tier_regions(Tier::C);

    if tier_a.is_empty() && tier_b.is_empty() && tier_c.is_empty() {
        return Vec::new();
    }

    let shares = budget_shares(tier_a.len(), tier_b.len(), tier_c.len());
    let share_for = |tier: Tier| {
        shares.iter().find(|(candidate, _)| *candidate == tier).map_or(0, |(_, pct)| *pct)
    };

    let total_weeks = campaign_weeks.max(1);
    let title = signature.title.as_str();
    let genre_focus = signature.genre_focus.as_str();
    let mut phases = Vec::new();

    if !tier_a.is_empty() {
        let focus = format!(
            "Position {title} as the must-see {} event. Lead with {genre_focus} and {} interviews to rally {} and drive premium pre-sales.",
            signature.primary_genre.to_lowercase(),
            signature.lead,
            signature.audience_callout
        );
        phases.push(Phase {
            phase: next_ordinal(&phases),
            name: format!("{} Fan Ignition", signature.primary_genre),
            start_date: campaign_start,
            duration_weeks: phase_duration(campaign_start, release_date),
            tier: Tier::A,
            regions: tier_a,
            intensity: Intensity::High,
            focus: focus.trim().to_string(),
            budget_percentage: share_for(Tier::A),
            movie_hook: signature.hook.clone(),
        });
    }

    if !tier_b.is_empty() {
        let offset = start_offset(total_weeks, TIER_B_OFFSET_SHARE, TIER_B_MIN_OFFSET);
        let start = phase_start(campaign_start, release_date, offset);
        if start < release_date {
            phases.push(Phase {
                phase: next_ordinal(&phases),
                name: "Social Proof Expansion".to_string(),
                start_date: start,
                duration_weeks: phase_duration(start, release_date),
                tier: Tier::B,
                regions: tier_b,
                intensity: Intensity::Medium,
                focus: format!(
                    "Capitalize on Tier-A reactions by localizing social proof clips, critic quotes, and {} callouts. Balance paid reach with experiential moments for regional partners.",
                    signature.hook.to_lowercase()
                ),
                budget_percentage: share_for(Tier::B),
                movie_hook: format!("Localized {genre_focus}"),
            });
        }
    }

    if !tier_c.is_empty() {
        let offset = start_offset(total_weeks, TIER_C_OFFSET_SHARE, TIER_C_MIN_OFFSET);
        let start = phase_start(campaign_start, release_date, offset);
        if start < release_date {
            phases.push(Phase {
                phase: next_ordinal(&phases),
                name: "Long-tail Sustain & Emerging Markets".to_string(),
                start_date: start,
                duration_weeks: phase_duration(start, release_date),
                tier: Tier::C,
                regions: tier_c,
                intensity: Intensity::Low,
                focus: format!(
                    "Keep {title} top-of-mind with cost-efficient retargeting, fan community drops, and partner bundles that celebrate {genre_focus}."
                ),
                budget_percentage: share_for(Tier::C),
                movie_hook: format!("Community-driven {title}"),
            });
        }
    }

    phases
}

/// Integer budget percentages per present tier, summing to exactly 100. The
/// rounding remainder lands on the last present tier in A, B, C order.
pub fn budget_shares(tier_a: usize, tier_b: usize, tier_c: usize) -> Vec<(Tier, u32)> {
    let weights: Vec<(Tier, usize)> = [
        (Tier::A, tier_a, 40 + (tier_a * 4).min(20)),
        (Tier::B, tier_b, 30 + (tier_b * 3).min(15)),
        (Tier::C, tier_c, 20 + (tier_c * 2).min(10)),
    ]
    .into_iter()
    .filter(|(_, count, _)| *count > 0)
    .map(|(tier, _, weight)| (tier, weight))
    .collect();

    let total_weight = weights.iter().map(|(_, weight)| *weight).sum::<usize>().max(1) as f64;
    let mut running_total = 0u32;
    let mut shares = Vec::with_capacity(weights.len());

    for (index, (tier, weight)) in weights.iter().enumerate() {
        let pct = if index + 1 == weights.len() {
            100 - running_total
        } else {
            (*weight as f64 / total_weight * 100.0).round_ties_even() as u32
        };
        running_total += pct;
        shares.push((*tier, pct));
    }

    shares
}

/// Week offset from campaign start for a trailing tier. Collapses to
/// `total_weeks - 1` when the campaign is too short for `min_week`.
pub fn start_offset(total_weeks: i64, share: f64, min_week: i64) -> i64 {
    if total_weeks <= min_week {
        return (total_weeks - 1).max(0);
    }
    let tentative = (total_weeks as f64 * share).round_ties_even() as i64;
    tentative.max(min_week).min(total_weeks - 1)
}

fn phase_start(campaign_start: NaiveDate, release_date: NaiveDate, offset_weeks: i64) -> NaiveDate {
    (campaign_start + Duration::weeks(offset_weeks)).min(release_date)
}

fn phase_duration(start: NaiveDate, release_date: NaiveDate) -> i64 {
    let days = (release_date - start).num_days().max(0);
    ((days + 6) / 7).max(1)
}

fn next_ordinal(phases: &[Phase]) -> u32 {
    phases.len() as u32 + 1
}
