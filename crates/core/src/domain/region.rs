use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient;

/// Coarse marketing priority of a region, `A` being the highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored region as produced by the ranking component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionScore {
    pub region: String,
    pub total_score: f64,
    pub tier: Tier,
    pub suggested_budget_pct: f64,
    #[serde(default)]
    pub recommendation: String,
}

impl RegionScore {
    fn rank_key(&self) -> f64 {
        if self.total_score.is_finite() {
            self.total_score
        } else {
            0.0
        }
    }
}

/// Ranked regions plus the ranker's free-text recommendations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionComparison {
    #[serde(default, deserialize_with = "lenient_region_scores")]
    pub ranked_regions: Vec<RegionScore>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub recommendations: Vec<String>,
}

impl RegionComparison {
    /// Orders scores descending by `total_score`; ties keep their input order.
    pub fn from_scores(mut scores: Vec<RegionScore>, recommendations: Vec<String>) -> Self {
        scores.sort_by(|left, right| {
            right.rank_key().partial_cmp(&left.rank_key()).unwrap_or(Ordering::Equal)
        });
        Self { ranked_regions: scores, recommendations }
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        self.ranked_regions.iter().filter(|region| region.tier == tier).count()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked_regions.is_empty()
    }
}

/// Raw engagement metrics for a region, keyed by region code in [`RegionalData`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    #[serde(default, deserialize_with = "lenient::float")]
    pub interest_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub engagement_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub growth_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub sentiment_score: Option<f64>,
}

pub type RegionalData = BTreeMap<String, RegionMetrics>;

/// Seam to the regional scoring component.
pub trait RegionRanker: Send + Sync {
    fn compare_regions(&self, regional_data: &RegionalData) -> RegionComparison;
}

/// Ranker that replays a comparison scored elsewhere.
#[derive(Clone, Debug, Default)]
pub struct PrecomputedRanker {
    comparison: RegionComparison,
}

impl PrecomputedRanker {
    pub fn new(comparison: RegionComparison) -> Self {
        Self { comparison }
    }
}

impl RegionRanker for PrecomputedRanker {
    fn compare_regions(&self, _regional_data: &RegionalData) -> RegionComparison {
        self.comparison.clone()
    }
}

// Entries that do not decode as a RegionScore are dropped rather than failing the payload.
fn lenient_region_scores<'de, D>(deserializer: D) -> Result<Vec<RegionScore>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let entries = match raw {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };

    Ok(entries.into_iter().filter_map(|entry| serde_json::from_value(entry).ok()).collect())
}

/// Regions whose metrics are not an object are dropped; a non-object payload is absent.
pub(crate) fn lenient_regional_data<'de, D>(
    deserializer: D,
) -> Result<Option<RegionalData>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(entries)) => entries,
        _ => return Ok(None),
    };

    Ok(Some(
        entries
            .into_iter()
            .filter_map(|(region, metrics)| {
                serde_json::from_value(metrics).ok().map(|metrics| (region, metrics))
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PrecomputedRanker, RegionComparison, RegionRanker, RegionScore, RegionalData, Tier};

    fn score(region: &str, total_score: f64, tier: Tier) -> RegionScore {
        RegionScore {
            region: region.to_string(),
            total_score,
            tier,
            suggested_budget_pct: 10.0,
            recommendation: String::new(),
        }
    }

    #[test]
    fn from_scores_orders_descending_and_keeps_ties_stable() {
        let comparison = RegionComparison::from_scores(
            vec![
                score("BR", 60.0, Tier::C),
                score("US", 90.0, Tier::A),
                score("GB", 75.0, Tier::A),
                score("IN", 75.0, Tier::B),
            ],
            Vec::new(),
        );

        let order: Vec<&str> =
            comparison.ranked_regions.iter().map(|region| region.region.as_str()).collect();
        assert_eq!(order, vec!["US", "GB", "IN", "BR"]);
        assert_eq!(comparison.tier_count(Tier::A), 2);
    }

    #[test]
    fn malformed_region_entries_are_dropped() {
        let comparison: RegionComparison = serde_json::from_value(json!({
            "ranked_regions": [
                {"region": "US", "total_score": 88.0, "tier": "A", "suggested_budget_pct": 30.0},
                {"region": "XX", "tier": "Z"},
                "garbage"
            ],
            "recommendations": ["Lead with US"]
        }))
        .expect("comparison should decode");

        assert_eq!(comparison.ranked_regions.len(), 1);
        assert_eq!(comparison.ranked_regions[0].recommendation, "");
        assert_eq!(comparison.recommendations, vec!["Lead with US".to_string()]);
    }

    #[test]
    fn non_array_region_payload_yields_empty_comparison() {
        let comparison: RegionComparison =
            serde_json::from_value(json!({"ranked_regions": {"US": 1}})).expect("decode");
        assert!(comparison.is_empty());
    }

    #[test]
    fn precomputed_ranker_replays_comparison() {
        let comparison =
            RegionComparison::from_scores(vec![score("US", 90.0, Tier::A)], Vec::new());
        let ranker = PrecomputedRanker::new(comparison.clone());

        assert_eq!(ranker.compare_regions(&RegionalData::new()), comparison);
    }
}
