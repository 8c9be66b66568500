use crate::domain::plan::{ChannelPlan, ChannelStrategy};
use crate::domain::region::{RegionScore, Tier};

const TIER_A_CHANNELS: [&str; 6] = [
    "TV spots (prime time)",
    "YouTube pre-roll",
    "Instagram/Facebook ads",
    "Outdoor billboards (major cities)",
    "Influencer partnerships",
    "Podcast sponsorships",
];

const TIER_B_CHANNELS: [&str; 4] =
    ["Digital video ads", "Social media ads", "Streaming platform ads", "Local radio spots"];

const TIER_C_CHANNELS: [&str; 4] =
    ["Social media organic", "Display ads", "Email campaigns", "Search engine marketing"];

/// Fixed channel mix per tier, listing each tier's regions in rank order.
pub fn recommend_channels(ranked_regions: &[RegionScore]) -> ChannelStrategy {
    ChannelStrategy {
        tier_a_regions: channel_plan(ranked_regions, Tier::A, &TIER_A_CHANNELS, "High"),
        tier_b_regions: channel_plan(ranked_regions, Tier::B, &TIER_B_CHANNELS, "Medium"),
        tier_c_regions: channel_plan(ranked_regions, Tier::C, &TIER_C_CHANNELS, "Low-Medium"),
    }
}

fn channel_plan(
    ranked_regions: &[RegionScore],
    tier: Tier,
    channels: &[&str],
    investment_level: &str,
) -> ChannelPlan {
    ChannelPlan {
        regions: ranked_regions
            .iter()
            .filter(|region| region.tier == tier)
            .map(|region| region.region.clone())
            .collect(),
        channels: channels.iter().map(|channel| channel.to_string()).collect(),
        investment_level: investment_level.to_string(),
    }
}
