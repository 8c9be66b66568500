use indexmap::IndexMap;
use rollout_core::{MovieProfile, RolloutPlan};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything an export pack is rendered from. Every section is optional;
/// missing pieces fall back to placeholder copy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportCampaign {
    #[serde(default)]
    pub movie_data: MovieProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollout_plan: Option<RolloutPlan>,
    #[serde(default)]
    pub ad_copy: AdCopy,
    /// Keyed by platform, in the order the generator produced them.
    #[serde(default)]
    pub social_posts: IndexMap<String, Value>,
    #[serde(default)]
    pub regional_analysis: RegionalAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdCopy {
    #[serde(default)]
    pub variants: Vec<AdVariant>,
    #[serde(default)]
    pub ai_enhanced_variants: Vec<AdVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_details: Option<Value>,
    #[serde(default)]
    pub sources: Vec<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdVariant {
    #[serde(default)]
    pub variant: Value,
    #[serde(default)]
    pub length: Value,
    #[serde(default)]
    pub platform: Value,
    #[serde(default)]
    pub text: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalAnalysis {
    #[serde(default)]
    pub target_regions: Vec<String>,
}

impl ExportCampaign {
    pub fn title(&self) -> &str {
        self.movie_data.title().unwrap_or("This Film")
    }

    /// Title reduced to ASCII letters, digits, `-`, `_` and spaces; "campaign"
    /// when nothing survives.
    pub fn sanitized_title(&self) -> String {
        let raw = self.movie_data.title.as_deref().unwrap_or("campaign");
        let kept: String = raw
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ' '))
            .collect();
        let trimmed = kept.trim();
        if trimmed.is_empty() {
            "campaign".to_string()
        } else {
            trimmed.to_string()
        }
    }

    pub fn primary_genre(&self) -> String {
        self.movie_data.genre_names().into_iter().next().unwrap_or_else(|| "Event".to_string())
    }

    pub fn release_date(&self) -> Option<&str> {
        self.movie_data.release_date.as_deref().filter(|date| !date.trim().is_empty())
    }
}

/// Renders a loosely typed JSON scalar as a table cell with newlines flattened.
pub(crate) fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    flatten_newlines(&text)
}

pub(crate) fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
