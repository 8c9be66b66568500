use chrono::{Duration, NaiveDate, NaiveDateTime};
use rollout_core::domain::region::{RegionComparison, RegionScore, Tier};
use rollout_core::planner::timeline::PRE_CAMPAIGN_LABEL;
use rollout_core::{PlanRequest, RolloutPlan, RolloutPlanner};
use rust_decimal::Decimal;
use serde_json::json;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}

fn at_midnight(value: &str) -> NaiveDateTime {
    date(value).and_hms_opt(0, 0, 0).expect("valid time")
}

fn score(region: &str, total_score: f64, tier: Tier, suggested_budget_pct: f64) -> RegionScore {
    RegionScore {
        region: region.to_string(),
        total_score,
        tier,
        suggested_budget_pct,
        recommendation: format!("Focus paid media on {region}"),
    }
}

fn plan(request: &PlanRequest, now: NaiveDateTime) -> RolloutPlan {
    let planner: RolloutPlanner = RolloutPlanner::default();
    planner.create_rollout_plan(request, now)
}

fn assert_structural_invariants(plan: &RolloutPlan) {
    let overview = &plan.campaign_overview;
    assert_eq!(
        overview.campaign_start,
        overview.release_date - Duration::weeks(overview.duration_weeks)
    );

    if !plan.phases.is_empty() {
        let pct_total: u32 = plan.phases.iter().map(|phase| phase.budget_percentage).sum();
        assert_eq!(pct_total, 100);
        assert_eq!(plan.phases[0].start_date, overview.campaign_start);
        for (index, phase) in plan.phases.iter().enumerate() {
            assert_eq!(phase.phase as usize, index + 1);
            assert!(phase.duration_weeks >= 1);
            assert!(phase.start_date < overview.release_date);
        }
    }

    assert_eq!(plan.timeline.first().map(|week| week.start_date), Some(overview.campaign_start));
    assert_eq!(plan.timeline.last().map(|week| week.end_date), Some(overview.release_date));
    for pair in plan.timeline.windows(2) {
        assert_eq!(pair[0].end_date, pair[1].start_date);
        assert_eq!(pair[0].week + 1, pair[1].week);
    }
    for week in &plan.timeline {
        assert!(week.end_date > week.start_date);
        assert!(week.end_date - week.start_date <= Duration::days(7));
        assert_eq!(week.key_activities.len(), 3);
    }

    for pair in plan.key_milestones.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
    let release_day = plan.key_milestones.last().expect("release milestone");
    assert_eq!(release_day.milestone, "Release Day");
    assert_eq!(release_day.date, overview.release_date);

    for pair in plan.budget_allocation.windows(2) {
        assert!(pair[0].budget_amount >= pair[1].budget_amount);
    }
}

#[test]
fn four_region_override_scenario_produces_three_phases() {
    let comparison = RegionComparison::from_scores(
        vec![
            score("US", 88.0, Tier::A, 40.0),
            score("GB", 81.0, Tier::A, 25.0),
            score("IN", 64.0, Tier::B, 20.0),
            score("BR", 42.0, Tier::C, 15.0),
        ],
        vec!["Lead with US and GB".to_string()],
    );
    let request = PlanRequest {
        release_date: "2024-06-15".to_string(),
        budget_total: Some(json!(2_000_000)),
        campaign_weeks: Some(json!(6)),
        precomputed_comparison: Some(comparison),
        ..PlanRequest::default()
    };

    let plan = plan(&request, at_midnight("2024-03-01"));

    assert_structural_invariants(&plan);
    assert_eq!(plan.campaign_overview.total_budget, 2_000_000);
    assert_eq!(plan.campaign_overview.duration_weeks, 6);
    assert_eq!(plan.campaign_overview.campaign_start, date("2024-05-04"));
    assert_eq!(plan.campaign_overview.target_regions, 4);

    let tiers: Vec<Tier> = plan.phases.iter().map(|phase| phase.tier).collect();
    assert_eq!(tiers, vec![Tier::A, Tier::B, Tier::C]);
    assert_eq!(plan.phases[0].regions, vec!["US".to_string(), "GB".to_string()]);
    assert_eq!(plan.phases[1].start_date, date("2024-05-18"));
    assert_eq!(plan.phases[2].start_date, date("2024-06-01"));

    let pct_total: Decimal = plan.budget_allocation.iter().map(|entry| entry.percentage).sum();
    let amount_total: Decimal =
        plan.budget_allocation.iter().map(|entry| entry.budget_amount).sum();
    assert_eq!(pct_total, Decimal::ONE_HUNDRED);
    assert_eq!(amount_total, Decimal::from(2_000_000));
    assert_eq!(plan.budget_allocation[0].region, "US");

    assert!(plan.plan_logic.budget.drivers[0].contains("overridden"));
    assert!(plan.plan_logic.duration.drivers[0].contains("overridden"));
    assert_eq!(plan.recommendations, vec!["Lead with US and GB".to_string()]);
}

#[test]
fn empty_regions_without_profile_use_indie_baseline() {
    let now = at_midnight("2024-01-01");
    let release = now.date() + Duration::days(90);
    let request = PlanRequest {
        release_date: release.format("%Y-%m-%d").to_string(),
        ..PlanRequest::default()
    };

    let plan = plan(&request, now);

    assert_structural_invariants(&plan);
    assert_eq!(plan.campaign_overview.duration_weeks, 13);
    assert_eq!(plan.campaign_overview.total_budget, 400_000);
    assert_eq!(plan.campaign_overview.target_regions, 0);
    assert_eq!(plan.campaign_overview.movie_positioning.title, "This film");
    assert!(plan.phases.is_empty());
    assert!(plan.budget_allocation.is_empty());
    assert!(plan.timeline.iter().all(|week| week.phase == PRE_CAMPAIGN_LABEL));
    assert!(plan
        .plan_logic
        .budget
        .drivers
        .iter()
        .any(|driver| driver.contains("indie baseline")));
    assert_eq!(plan.plan_logic.signals.release_gap_weeks, 13);
}

#[test]
fn tentpole_signals_hit_duration_ceiling() {
    let comparison = RegionComparison::from_scores(
        vec![
            score("US", 92.0, Tier::A, 30.0),
            score("GB", 86.0, Tier::A, 25.0),
            score("DE", 84.0, Tier::A, 25.0),
            score("JP", 83.0, Tier::A, 20.0),
        ],
        Vec::new(),
    );
    let request: PlanRequest = serde_json::from_value(json!({
        "release_date": "2024-12-20",
        "movie_profile": {
            "title": "Starfall",
            "genres": [{"id": 878, "name": "Science Fiction"}, "Adventure"],
            "cast": ["Mara Quinn", {"name": "Theo Vance"}],
            "budget": 200_000_000,
            "popularity": 85,
            "vote_count": 60_000
        }
    }))
    .expect("request");
    let request = PlanRequest { precomputed_comparison: Some(comparison), ..request };

    let plan = plan(&request, at_midnight("2024-06-01"));

    assert_structural_invariants(&plan);
    assert_eq!(plan.campaign_overview.duration_weeks, 16);
    assert_eq!(plan.campaign_overview.total_budget, 20_000_000);
    assert_eq!(plan.phases.len(), 1);
    assert_eq!(plan.phases[0].name, "Science Fiction Fan Ignition");
    assert_eq!(plan.phases[0].budget_percentage, 100);
    assert_eq!(plan.campaign_overview.movie_positioning.lead, "Mara Quinn");

    let duration_drivers = plan.plan_logic.duration.drivers.join(" ");
    assert!(duration_drivers.contains("+1"));
    assert!(duration_drivers.contains("Tentpole"));
    assert_eq!(plan.plan_logic.signals.tier_a_markets, 4);
}

#[test]
fn derived_parameters_stay_in_bounds_across_release_windows() {
    let comparison = RegionComparison::from_scores(
        vec![score("US", 70.0, Tier::A, 60.0), score("MX", 55.0, Tier::B, 40.0)],
        Vec::new(),
    );
    let now = at_midnight("2024-01-01");

    for days_out in [-30_i64, 0, 1, 10, 27, 45, 90, 200, 400] {
        let release = now.date() + Duration::days(days_out);
        let request = PlanRequest {
            release_date: release.format("%Y-%m-%d").to_string(),
            precomputed_comparison: Some(comparison.clone()),
            ..PlanRequest::default()
        };

        let plan = plan(&request, now);

        assert_structural_invariants(&plan);
        let overview = &plan.campaign_overview;
        assert!((4..=16).contains(&overview.duration_weeks), "weeks for {days_out} days out");
        assert!((250_000..=20_000_000).contains(&overview.total_budget));
        assert_eq!(overview.total_budget % 50_000, 0);
    }
}

#[test]
fn malformed_region_payload_degrades_to_empty_plan_sections() {
    let request: PlanRequest = serde_json::from_value(json!({
        "release_date": " 2024-09-01 ",
        "comparison": {"ranked_regions": "not-a-list", "recommendations": []}
    }))
    .expect("request");

    let plan = plan(&request, at_midnight("2024-06-01"));

    assert_structural_invariants(&plan);
    assert_eq!(plan.campaign_overview.release_date, date("2024-09-01"));
    assert!(plan.phases.is_empty());
    assert!(plan.budget_allocation.is_empty());
    assert!(plan.channel_strategy.tier_a_regions.regions.is_empty());
}

#[test]
fn identical_inputs_yield_identical_plans() {
    let request: PlanRequest = serde_json::from_value(json!({
        "release_date": "2024-08-09",
        "movie_profile": {"title": "Quiet Harbor", "genres": ["Drama"], "popularity": "61.2"},
        "comparison": {
            "ranked_regions": [
                {"region": "FR", "total_score": 77.0, "tier": "A", "suggested_budget_pct": 55.0},
                {"region": "ES", "total_score": 58.5, "tier": "B", "suggested_budget_pct": 30.0},
                {"region": "PT", "total_score": 40.0, "tier": "C", "suggested_budget_pct": 15.0}
            ],
            "recommendations": ["Festival circuit first"]
        }
    }))
    .expect("request");
    let now = at_midnight("2024-05-01");

    let first = plan(&request, now);
    let second = plan(&request, now);

    assert_eq!(first, second);
    assert_structural_invariants(&first);
    assert_eq!(
        serde_json::to_value(&first).expect("serialize"),
        serde_json::to_value(&second).expect("serialize")
    );
}
