pub mod config;
pub mod domain;
pub mod errors;
pub mod planner;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::movie::{MovieProfile, NameEntry, NameList};
pub use domain::plan::{
    BudgetAllocation, CampaignOverview, CampaignParameters, CampaignRationale, ChannelPlan,
    ChannelStrategy, Intensity, Milestone, MovieSignature, Phase, RolloutPlan, TimelineWeek,
};
pub use domain::region::{
    PrecomputedRanker, RegionComparison, RegionMetrics, RegionRanker, RegionScore, RegionalData,
    Tier,
};
pub use errors::{ApplicationError, InputError, InterfaceError};
pub use planner::{parse_release_date, PlanRequest, RolloutPlanner, RELEASE_DATE_FORMAT};
