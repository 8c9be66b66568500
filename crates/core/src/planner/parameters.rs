use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::domain::movie::{MovieProfile, DEFAULT_POPULARITY};
use crate::domain::plan::{CampaignParameters, CampaignRationale, PlanningSignals, RationaleSection};
use crate::domain::region::{RegionComparison, Tier};
use crate::planner::{format_dollars, format_grouped, round_to};

pub const MIN_CAMPAIGN_WEEKS: i64 = 4;
pub const MAX_CAMPAIGN_WEEKS: i64 = 16;
pub const SUSTAIN_CAMPAIGN_WEEKS: i64 = 6;
/// Upper bound on an explicit duration override; keeps date arithmetic in range.
pub const MAX_OVERRIDE_WEEKS: i64 = 520;

pub const MIN_TOTAL_BUDGET: f64 = 250_000.0;
pub const MAX_TOTAL_BUDGET: f64 = 20_000_000.0;
pub const BUDGET_ROUNDING_STEP: f64 = 50_000.0;
pub const INDIE_BASELINE_BUDGET: f64 = 350_000.0;

const TENTPOLE_PRODUCTION_BUDGET: f64 = 150_000_000.0;
const HIGH_POPULARITY: f64 = 70.0;
const TIER_A_LOCALIZATION_THRESHOLD: usize = 3;
const NEUTRAL_INTEREST_INDEX: f64 = 0.55;
const FANBASE_VOTE_SATURATION: f64 = 50_000.0;

/// Production budget floor, marketing ratio, and the ratio as a whole percentage.
const MARKETING_RATIOS: [(f64, f64, u32); 4] = [
    (150_000_000.0, 0.40, 40),
    (75_000_000.0, 0.32, 32),
    (25_000_000.0, 0.25, 25),
    (0.0, 0.18, 18),
];

#[derive(Clone, Debug)]
pub struct ParameterInputs<'a> {
    pub movie: Option<&'a MovieProfile>,
    pub comparison: &'a RegionComparison,
    pub budget_override: Option<f64>,
    pub duration_override: Option<i64>,
    pub release_date: NaiveDate,
    pub now: NaiveDateTime,
}

/// Demand signals shared by the budget and duration drivers.
#[derive(Clone, Debug, PartialEq)]
struct Signals {
    tier_a_count: usize,
    tier_b_count: usize,
    interest_index: f64,
    popularity: f64,
    production_budget: f64,
    vote_count: i64,
    release_gap_weeks: i64,
}

impl Signals {
    fn collect(input: &ParameterInputs<'_>) -> Self {
        let ranked = &input.comparison.ranked_regions;
        let top_scores: Vec<f64> = ranked
            .iter()
            .take(3)
            .map(|region| if region.total_score.is_finite() { region.total_score } else { 0.0 })
            .collect();
        let interest_index = if top_scores.is_empty() {
            NEUTRAL_INTEREST_INDEX
        } else {
            top_scores.iter().sum::<f64>() / top_scores.len() as f64 / 100.0
        };

        let release_start = input.release_date.and_time(NaiveTime::MIN);
        let release_gap_days = (release_start - input.now).num_days().max(0);

        Self {
            tier_a_count: input.comparison.tier_count(Tier::A),
            tier_b_count: input.comparison.tier_count(Tier::B),
            interest_index,
            popularity: input.movie.map(MovieProfile::popularity).unwrap_or(DEFAULT_POPULARITY),
            production_budget: input.movie.map(MovieProfile::production_budget).unwrap_or(0.0),
            vote_count: input.movie.map(MovieProfile::vote_count).unwrap_or(0),
            release_gap_weeks: (release_gap_days + 6) / 7,
        }
    }
}

/// Sizes total budget and campaign length from movie and regional signals.
/// Overrides bypass their derivation entirely and are reported as such.
pub fn derive_campaign_parameters(input: &ParameterInputs<'_>) -> CampaignParameters {
    let signals = Signals::collect(input);

    let (campaign_weeks, duration_drivers) = match input.duration_override {
        Some(weeks) => {
            let weeks = weeks.clamp(1, MAX_OVERRIDE_WEEKS);
            (weeks, vec![format!("Duration overridden upstream to {weeks} weeks.")])
        }
        None => derive_duration(&signals),
    };

    let (total_budget, budget_drivers) = match input.budget_override {
        Some(budget) => {
            // `as` truncates toward zero and saturates negatives and NaN to 0.
            let budget = budget as u64;
            (budget, vec![format!("Budget overridden upstream at ${}.", format_grouped(budget))])
        }
        None => derive_budget(&signals),
    };

    debug!(
        event_name = "planner.parameters.derived",
        total_budget,
        campaign_weeks,
        tier_a_markets = signals.tier_a_count,
        release_gap_weeks = signals.release_gap_weeks,
        "campaign parameters derived"
    );

    let movie_title = input.movie.and_then(MovieProfile::title).unwrap_or("the film");
    let rationale = CampaignRationale {
        summary: format!(
            "Budget and timeline tuned for {movie_title} based on production scale and market demand."
        ),
        budget: RationaleSection {
            summary: format!(
                "Allocated ${} to cover {} Tier-A markets and momentum signals.",
                format_grouped(total_budget),
                signals.tier_a_count
            ),
            drivers: budget_drivers,
        },
        duration: RationaleSection {
            summary: format!(
                "Running campaign for {campaign_weeks} weeks leading into {}.",
                input.release_date.format("%Y-%m-%d")
            ),
            drivers: duration_drivers,
        },
        signals: PlanningSignals {
            tier_a_markets: signals.tier_a_count,
            tier_b_markets: signals.tier_b_count,
            interest_index: round_to(signals.interest_index * 100.0, 1),
            popularity: round_to(signals.popularity, 1),
            release_gap_weeks: signals.release_gap_weeks,
        },
    };

    CampaignParameters { total_budget, campaign_weeks, rationale }
}

fn derive_duration(signals: &Signals) -> (i64, Vec<String>) {
    let mut drivers = Vec::new();

    let mut weeks = if signals.release_gap_weeks > 0 {
        let base = signals.release_gap_weeks.clamp(MIN_CAMPAIGN_WEEKS, MAX_CAMPAIGN_WEEKS);
        drivers.push(format!(
            "{}-week runway until release -> base {base}-week plan.",
            signals.release_gap_weeks
        ));
        base
    } else {
        drivers.push(format!(
            "Release date is in-market/unknown, applying {SUSTAIN_CAMPAIGN_WEEKS}-week sustain push."
        ));
        SUSTAIN_CAMPAIGN_WEEKS
    };

    if signals.popularity >= HIGH_POPULARITY {
        weeks += 1;
        drivers.push(format!(
            "High popularity score ({:.0}) adds +1 hype week.",
            signals.popularity
        ));
    }
    if signals.tier_a_count >= TIER_A_LOCALIZATION_THRESHOLD {
        weeks += 1;
        drivers.push(format!(
            "{} Tier-A markets need an extra localization week.",
            signals.tier_a_count
        ));
    }
    if signals.production_budget >= TENTPOLE_PRODUCTION_BUDGET {
        weeks += 1;
        drivers.push("Tentpole scale (> $150M production) adds +1 buffer week.".to_string());
    }

    (weeks.clamp(MIN_CAMPAIGN_WEEKS, MAX_CAMPAIGN_WEEKS), drivers)
}

fn derive_budget(signals: &Signals) -> (u64, Vec<String>) {
    let mut drivers = Vec::new();

    let mut budget = if signals.production_budget > 0.0 {
        let (_, ratio, ratio_pct) = MARKETING_RATIOS
            .iter()
            .copied()
            .find(|(floor, _, _)| signals.production_budget >= *floor)
            .unwrap_or(MARKETING_RATIOS[MARKETING_RATIOS.len() - 1]);
        drivers.push(format!(
            "Used {ratio_pct}% of ${} production budget as marketing baseline.",
            format_dollars(signals.production_budget)
        ));
        signals.production_budget * ratio
    } else {
        drivers.push(
            "No production budget reported, starting from $350K indie baseline.".to_string(),
        );
        INDIE_BASELINE_BUDGET
    };

    let popularity = signals.popularity.clamp(0.0, 100.0);
    let popularity_factor = 1.0 + (popularity / 100.0) * 0.35;
    budget *= popularity_factor;
    if popularity > 0.0 {
        drivers.push(format!(
            "Popularity score {:.0} adds {:.0}% hype premium.",
            signals.popularity,
            (popularity_factor - 1.0) * 100.0
        ));
    }

    let tier_factor = 1.0
        + signals.tier_a_count.min(4) as f64 * 0.08
        + signals.tier_b_count.min(4) as f64 * 0.03;
    budget *= tier_factor;
    drivers.push(format!(
        "Tier mix ({} Tier-A / {} Tier-B) drives {tier_factor:.2}x geographic weighting.",
        signals.tier_a_count, signals.tier_b_count
    ));

    let interest_factor = 1.0 + (signals.interest_index - NEUTRAL_INTEREST_INDEX).max(0.0) * 0.5;
    budget *= interest_factor;
    drivers.push(format!(
        "Regional interest index {:.0} => {interest_factor:.2}x demand lift.",
        signals.interest_index * 100.0
    ));

    if signals.vote_count > 0 {
        let audience_factor =
            1.0 + (signals.vote_count as f64 / FANBASE_VOTE_SATURATION).min(1.0) * 0.15;
        budget *= audience_factor;
        drivers.push(format!(
            "{} fan ratings justify {audience_factor:.2}x proof-of-fanbase boost.",
            format_grouped(signals.vote_count.unsigned_abs())
        ));
    }

    let bounded = budget.clamp(MIN_TOTAL_BUDGET, MAX_TOTAL_BUDGET);
    let rounded = (bounded / BUDGET_ROUNDING_STEP).round_ties_even() * BUDGET_ROUNDING_STEP;

    (rounded.max(MIN_TOTAL_BUDGET) as u64, drivers)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    use super::{derive_campaign_parameters, ParameterInputs};
    use crate::domain::movie::MovieProfile;
    use crate::domain::region::{RegionComparison, RegionScore, Tier};

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    fn midnight(value: &str) -> NaiveDateTime {
        date(value).and_hms_opt(0, 0, 0).expect("valid time")
    }

    fn region(code: &str, total_score: f64, tier: Tier) -> RegionScore {
        RegionScore {
            region: code.to_string(),
            total_score,
            tier,
            suggested_budget_pct: 25.0,
            recommendation: format!("Prioritize {code}"),
        }
    }

    fn inputs<'a>(
        movie: Option<&'a MovieProfile>,
        comparison: &'a RegionComparison,
        now: &str,
        release: &str,
    ) -> ParameterInputs<'a> {
        ParameterInputs {
            movie,
            comparison,
            budget_override: None,
            duration_override: None,
            release_date: date(release),
            now: midnight(now),
        }
    }

    #[test]
    fn indie_baseline_with_no_signals() {
        let comparison = RegionComparison::default();
        let params =
            derive_campaign_parameters(&inputs(None, &comparison, "2024-01-01", "2024-03-31"));

        // 350_000 * 1.1575 (popularity 45) = 405_125 -> 400_000
        assert_eq!(params.total_budget, 400_000);
        assert_eq!(params.campaign_weeks, 13);
        assert_eq!(params.rationale.signals.release_gap_weeks, 13);
        assert!(params.rationale.budget.drivers[0].contains("$350K indie baseline"));
        assert_eq!(params.rationale.signals.interest_index, 55.0);
    }

    #[test]
    fn tentpole_signals_hit_duration_ceiling() {
        let movie: MovieProfile = serde_json::from_value(json!({
            "title": "Skyfall Protocol",
            "budget": 200_000_000,
            "popularity": 85,
            "vote_count": 60_000
        }))
        .expect("profile");
        let comparison = RegionComparison::from_scores(
            vec![
                region("US", 95.0, Tier::A),
                region("GB", 90.0, Tier::A),
                region("DE", 85.0, Tier::A),
                region("FR", 80.0, Tier::A),
            ],
            Vec::new(),
        );

        let params = derive_campaign_parameters(&inputs(
            Some(&movie),
            &comparison,
            "2024-01-01",
            "2024-04-15",
        ));

        assert_eq!(params.campaign_weeks, 16);
        assert_eq!(params.rationale.duration.drivers.len(), 4);
        assert!(params.rationale.budget.drivers[0].contains("Used 40% of $200,000,000"));
        assert!(params.rationale.duration.drivers.iter().any(|line| line.contains("+1 hype week")));
        assert!(params.rationale.duration.drivers.iter().any(|line| line.contains("localization")));
        assert!(params.rationale.duration.drivers.iter().any(|line| line.contains("Tentpole")));
        assert_eq!(params.total_budget, 20_000_000);
    }

    #[test]
    fn negative_vote_count_earns_no_fanbase_boost() {
        let comparison = RegionComparison::default();
        let baseline: MovieProfile =
            serde_json::from_value(json!({"budget": 10_000_000, "vote_count": 0}))
                .expect("profile");
        let negative: MovieProfile =
            serde_json::from_value(json!({"budget": 10_000_000, "vote_count": -50_000}))
                .expect("profile");

        let expected = derive_campaign_parameters(&inputs(
            Some(&baseline),
            &comparison,
            "2024-01-01",
            "2024-03-31",
        ));
        let params = derive_campaign_parameters(&inputs(
            Some(&negative),
            &comparison,
            "2024-01-01",
            "2024-03-31",
        ));

        assert_eq!(params.total_budget, expected.total_budget);
        assert!(!params.rationale.budget.drivers.iter().any(|line| line.contains("fan ratings")));
    }

    #[test]
    fn past_release_uses_sustain_window() {
        let comparison = RegionComparison::default();
        let params =
            derive_campaign_parameters(&inputs(None, &comparison, "2024-05-01", "2024-04-01"));

        assert_eq!(params.campaign_weeks, 6);
        assert_eq!(params.rationale.signals.release_gap_weeks, 0);
        assert!(params.rationale.duration.drivers[0].contains("sustain push"));
    }

    #[test]
    fn short_runway_is_clamped_to_minimum() {
        let comparison = RegionComparison::default();
        let params =
            derive_campaign_parameters(&inputs(None, &comparison, "2024-05-01", "2024-05-10"));

        assert_eq!(params.rationale.signals.release_gap_weeks, 2);
        assert_eq!(params.campaign_weeks, 4);
    }

    #[test]
    fn overrides_short_circuit_both_logs() {
        let comparison = RegionComparison::default();
        let mut input = inputs(None, &comparison, "2024-01-01", "2024-06-15");
        input.budget_override = Some(2_000_000.9);
        input.duration_override = Some(0);

        let params = derive_campaign_parameters(&input);

        assert_eq!(params.total_budget, 2_000_000);
        assert_eq!(params.campaign_weeks, 1);
        assert_eq!(params.rationale.budget.drivers.len(), 1);
        assert!(params.rationale.budget.drivers[0].contains("overridden"));
        assert!(params.rationale.budget.drivers[0].contains("$2,000,000"));
        assert_eq!(params.rationale.duration.drivers.len(), 1);
        assert!(params.rationale.duration.drivers[0].contains("overridden"));
    }

    #[test]
    fn budget_stays_in_bounds_and_on_step() {
        let comparison = RegionComparison::from_scores(
            vec![region("US", 99.0, Tier::A), region("IN", 70.0, Tier::B)],
            Vec::new(),
        );
        for production in [0, 1_000_000, 30_000_000, 80_000_000, 500_000_000] {
            let movie: MovieProfile =
                serde_json::from_value(json!({"budget": production, "popularity": 60}))
                    .expect("profile");
            let params = derive_campaign_parameters(&inputs(
                Some(&movie),
                &comparison,
                "2024-01-01",
                "2024-03-01",
            ));

            assert!((250_000..=20_000_000).contains(&params.total_budget));
            assert_eq!(params.total_budget % 50_000, 0);
            assert!((4..=16).contains(&params.campaign_weeks));
        }
    }

    #[test]
    fn interest_index_uses_top_three_scores() {
        let comparison = RegionComparison::from_scores(
            vec![
                region("US", 90.0, Tier::A),
                region("GB", 80.0, Tier::B),
                region("IN", 70.0, Tier::B),
                region("BR", 10.0, Tier::C),
            ],
            Vec::new(),
        );
        let params =
            derive_campaign_parameters(&inputs(None, &comparison, "2024-01-01", "2024-03-01"));

        assert_eq!(params.rationale.signals.interest_index, 80.0);
        assert_eq!(params.rationale.signals.tier_b_markets, 2);
    }
}
