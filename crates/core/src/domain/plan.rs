use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::region::Tier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Positioning cues pulled from movie metadata to personalize plan copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSignature {
    pub title: String,
    pub primary_genre: String,
    pub genre_focus: String,
    pub hook: String,
    pub lead: String,
    pub tagline: String,
    pub audience_callout: String,
    pub supporting: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationaleSection {
    pub summary: String,
    pub drivers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanningSignals {
    pub tier_a_markets: usize,
    pub tier_b_markets: usize,
    pub interest_index: f64,
    pub popularity: f64,
    pub release_gap_weeks: i64,
}

/// Display-only explanation of how budget and duration were sized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignRationale {
    pub summary: String,
    pub budget: RationaleSection,
    pub duration: RationaleSection,
    pub signals: PlanningSignals,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignParameters {
    pub total_budget: u64,
    pub campaign_weeks: i64,
    pub rationale: CampaignRationale,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub phase: u32,
    pub name: String,
    pub start_date: NaiveDate,
    pub duration_weeks: i64,
    pub tier: Tier,
    pub regions: Vec<String>,
    pub intensity: Intensity,
    pub focus: String,
    pub budget_percentage: u32,
    pub movie_hook: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub region: String,
    pub budget_amount: Decimal,
    pub percentage: Decimal,
    pub tier: Tier,
    pub justification: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineWeek {
    pub week: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub phase: String,
    pub active_regions: Vec<String>,
    pub key_activities: Vec<String>,
    pub intensity: Intensity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub date: NaiveDate,
    pub milestone: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPlan {
    pub regions: Vec<String>,
    pub channels: Vec<String>,
    pub investment_level: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStrategy {
    pub tier_a_regions: ChannelPlan,
    pub tier_b_regions: ChannelPlan,
    pub tier_c_regions: ChannelPlan,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePositioning {
    pub title: String,
    pub primary_genre: String,
    pub hook: String,
    pub lead: String,
    pub tagline: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignOverview {
    pub release_date: NaiveDate,
    pub campaign_start: NaiveDate,
    pub duration_weeks: i64,
    pub total_budget: u64,
    pub target_regions: usize,
    pub movie_positioning: MoviePositioning,
}

/// The assembled rollout plan handed to downstream exporters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RolloutPlan {
    pub campaign_overview: CampaignOverview,
    pub phases: Vec<Phase>,
    pub budget_allocation: Vec<BudgetAllocation>,
    pub timeline: Vec<TimelineWeek>,
    pub channel_strategy: ChannelStrategy,
    pub key_milestones: Vec<Milestone>,
    pub recommendations: Vec<String>,
    pub plan_logic: CampaignRationale,
}
