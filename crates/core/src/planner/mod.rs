pub mod budget;
pub mod channels;
pub mod milestones;
pub mod parameters;
pub mod phases;
pub mod signature;
pub mod timeline;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::domain::lenient;
use crate::domain::movie::{loose_float, loose_integer, MovieProfile};
use crate::domain::plan::{CampaignOverview, MoviePositioning, RolloutPlan};
use crate::domain::region::{
    lenient_regional_data, PrecomputedRanker, RegionComparison, RegionRanker, RegionalData,
};

use self::parameters::{derive_campaign_parameters, ParameterInputs};

pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inputs for one planning call. Override fields are loosely typed; values
/// that are not numeric are ignored and the derived figure is used instead.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub release_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_total: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_weeks: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::optional")]
    pub movie_profile: Option<MovieProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient_regional_data")]
    pub regional_data: Option<RegionalData>,
    #[serde(default, alias = "comparison", skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::optional")]
    pub precomputed_comparison: Option<RegionComparison>,
}

impl PlanRequest {
    pub fn budget_override(&self) -> Option<f64> {
        self.budget_total.as_ref().and_then(loose_float)
    }

    pub fn duration_override(&self) -> Option<i64> {
        self.campaign_weeks.as_ref().and_then(loose_integer)
    }
}

/// Builds rollout plans. Regions are scored by `R` unless the request carries
/// a precomputed comparison.
#[derive(Clone, Debug)]
pub struct RolloutPlanner<R = PrecomputedRanker> {
    ranker: R,
    fallback_release_days: i64,
}

impl Default for RolloutPlanner<PrecomputedRanker> {
    fn default() -> Self {
        Self::new(PrecomputedRanker::default(), &PlannerConfig::default())
    }
}

impl<R: RegionRanker> RolloutPlanner<R> {
    pub fn new(ranker: R, config: &PlannerConfig) -> Self {
        Self { ranker, fallback_release_days: config.fallback_release_days }
    }

    pub fn create_rollout_plan(&self, request: &PlanRequest, now: NaiveDateTime) -> RolloutPlan {
        let comparison = match &request.precomputed_comparison {
            Some(comparison) => comparison.clone(),
            None => self.ranker.compare_regions(&request.regional_data.clone().unwrap_or_default()),
        };
        let ranked_regions = &comparison.ranked_regions;

        let (release_date, release_fallback) = match parse_release_date(&request.release_date) {
            Some(date) => (date, false),
            None => {
                let fallback = now.date() + Duration::days(self.fallback_release_days);
                warn!(
                    event_name = "planner.release_date.fallback",
                    raw_release_date = %request.release_date,
                    fallback_release_date = %fallback,
                    "release date unreadable, planning against fallback"
                );
                (fallback, true)
            }
        };

        let movie = request.movie_profile.as_ref().filter(|profile| !profile.is_empty());
        let signature = signature::extract_movie_signature(movie);

        let mut parameters = derive_campaign_parameters(&ParameterInputs {
            movie,
            comparison: &comparison,
            budget_override: request.budget_override(),
            duration_override: request.duration_override(),
            release_date,
            now,
        });
        if release_fallback {
            parameters.rationale.summary.push_str(&format!(
                " Release date `{}` could not be read; planning against {}.",
                request.release_date.trim(),
                release_date.format(RELEASE_DATE_FORMAT)
            ));
        }

        let total_budget = parameters.total_budget;
        let campaign_weeks = parameters.campaign_weeks;
        let campaign_start = release_date - Duration::weeks(campaign_weeks);

        let phases = phases::create_phases(
            ranked_regions,
            campaign_start,
            release_date,
            &signature,
            campaign_weeks,
        );
        let budget_allocation = budget::allocate_budget(ranked_regions, total_budget);
        let timeline = timeline::create_timeline(&phases, campaign_start, release_date);
        let channel_strategy = channels::recommend_channels(ranked_regions);
        let key_milestones = milestones::generate_milestones(campaign_start, release_date);

        info!(
            event_name = "planner.plan.created",
            release_date = %release_date,
            campaign_start = %campaign_start,
            campaign_weeks,
            total_budget,
            phase_count = phases.len(),
            region_count = ranked_regions.len(),
            "rollout plan created"
        );

        RolloutPlan {
            campaign_overview: CampaignOverview {
                release_date,
                campaign_start,
                duration_weeks: campaign_weeks,
                total_budget,
                target_regions: ranked_regions.len(),
                movie_positioning: MoviePositioning {
                    title: signature.title.clone(),
                    primary_genre: signature.primary_genre.clone(),
                    hook: signature.hook.clone(),
                    lead: signature.lead.clone(),
                    tagline: signature.tagline.clone(),
                },
            },
            phases,
            budget_allocation,
            timeline,
            channel_strategy,
            key_milestones,
            recommendations: comparison.recommendations.clone(),
            plan_logic: parameters.rationale,
        }
    }
}

pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), RELEASE_DATE_FORMAT).ok()
}

/// `1234567` -> `"1,234,567"`.
pub(crate) fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub(crate) fn format_dollars(amount: f64) -> String {
    format_grouped(amount.max(0.0).round_ties_even() as u64)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    use super::{format_grouped, round_to, PlanRequest, RolloutPlanner};
    use crate::config::PlannerConfig;
    use crate::domain::region::{
        PrecomputedRanker, RegionComparison, RegionScore, RegionalData, Tier,
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn grouping_inserts_thousands_separators() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1_000), "1,000");
        assert_eq!(format_grouped(20_000_000), "20,000,000");
    }

    #[test]
    fn round_to_keeps_one_decimal() {
        assert_eq!(round_to(55.000_000_000_000_01, 1), 55.0);
        assert_eq!(round_to(72.46, 1), 72.5);
    }

    #[test]
    fn unreadable_release_date_falls_back_to_configured_window() {
        let planner: RolloutPlanner = RolloutPlanner::default();
        let request =
            PlanRequest { release_date: "next summer".to_string(), ..PlanRequest::default() };

        let plan = planner.create_rollout_plan(&request, now());

        assert_eq!(
            plan.campaign_overview.release_date,
            NaiveDate::from_ymd_opt(2024, 4, 30).expect("valid date")
        );
        assert!(plan.plan_logic.summary.contains("could not be read"));
        assert!(plan.phases.is_empty());
        assert!(plan.budget_allocation.is_empty());
    }

    #[test]
    fn ranker_scores_regions_when_no_comparison_is_supplied() {
        let comparison = RegionComparison::from_scores(
            vec![RegionScore {
                region: "JP".to_string(),
                total_score: 81.0,
                tier: Tier::A,
                suggested_budget_pct: 100.0,
                recommendation: "Anime crossover partners".to_string(),
            }],
            vec!["Lead in JP".to_string()],
        );
        let planner =
            RolloutPlanner::new(PrecomputedRanker::new(comparison), &PlannerConfig::default());
        let request = PlanRequest {
            release_date: "2024-05-10".to_string(),
            regional_data: Some(RegionalData::new()),
            ..PlanRequest::default()
        };

        let plan = planner.create_rollout_plan(&request, now());

        assert_eq!(plan.campaign_overview.target_regions, 1);
        assert_eq!(plan.recommendations, vec!["Lead in JP".to_string()]);
        assert_eq!(plan.phases.len(), 1);
    }

    #[test]
    fn non_numeric_overrides_are_ignored() {
        let request: PlanRequest = serde_json::from_value(json!({
            "release_date": "2024-06-15",
            "budget_total": "lots",
            "campaign_weeks": "6"
        }))
        .expect("request");

        assert_eq!(request.budget_override(), None);
        assert_eq!(request.duration_override(), Some(6));
    }

    #[test]
    fn degraded_request_payloads_still_decode() {
        let payloads = [
            json!({"release_date": "2024-06-15", "movie_profile": {"genres": null}}),
            json!({"release_date": "2024-06-15", "movie_profile": {"cast": null}}),
            json!({"release_date": "2024-06-15", "movie_profile": {"title": 42}}),
            json!({"release_date": "2024-06-15", "movie_profile": "Night Tide"}),
            json!({"release_date": "2024-06-15", "comparison": ["US"]}),
            json!({"release_date": "2024-06-15", "regional_data": [1, 2]}),
        ];

        for payload in payloads {
            let request: Result<PlanRequest, _> = serde_json::from_value(payload.clone());
            assert!(request.is_ok(), "payload should decode: {payload}");
        }
    }

    #[test]
    fn non_string_release_date_falls_back() {
        let request: PlanRequest =
            serde_json::from_value(json!({"release_date": 20240615})).expect("request");
        assert_eq!(request.release_date, "");

        let plan = RolloutPlanner::default().create_rollout_plan(&request, now());

        assert_eq!(
            plan.campaign_overview.release_date,
            NaiveDate::from_ymd_opt(2024, 4, 30).expect("valid date")
        );
    }

    #[test]
    fn regional_metrics_with_text_scores_are_kept_without_values() {
        let request: PlanRequest = serde_json::from_value(json!({
            "release_date": "2024-06-15",
            "regional_data": {
                "US": {"interest_score": "high", "engagement_rate": 0.4},
                "GB": "unknown"
            }
        }))
        .expect("request");

        let regional = request.regional_data.expect("regional data");
        assert_eq!(regional.len(), 1);
        assert_eq!(regional["US"].interest_score, None);
        assert_eq!(regional["US"].engagement_rate, Some(0.4));
    }

    #[test]
    fn profile_with_null_lists_plans_like_no_profile() {
        let request: PlanRequest = serde_json::from_value(json!({
            "release_date": "2024-05-10",
            "movie_profile": {"genres": null, "cast": null}
        }))
        .expect("request");

        let plan = RolloutPlanner::default().create_rollout_plan(&request, now());
        let baseline = RolloutPlanner::default().create_rollout_plan(
            &PlanRequest { release_date: "2024-05-10".to_string(), ..PlanRequest::default() },
            now(),
        );

        assert_eq!(plan, baseline);
    }
}
