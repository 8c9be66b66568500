use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

pub const DEFAULT_POPULARITY: f64 = 45.0;

/// A cast, crew or genre entry as it arrives from metadata feeds: either a bare
/// name or a record carrying a `name` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameEntry {
    Plain(String),
    Named {
        #[serde(default)]
        name: Option<String>,
    },
    Unrecognized(Value),
}

impl NameEntry {
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            Self::Plain(name) => name.as_str(),
            Self::Named { name: Some(name) } => name.as_str(),
            Self::Named { name: None } | Self::Unrecognized(_) => return None,
        };
        (!name.trim().is_empty()).then_some(name)
    }
}

/// One entry or a list of entries; director metadata shows up in both shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameList {
    Many(Vec<NameEntry>),
    One(NameEntry),
}

impl NameList {
    pub fn names(&self) -> Vec<String> {
        match self {
            Self::Many(entries) => normalize_names(entries),
            Self::One(entry) => entry.name().map(str::to_string).into_iter().collect(),
        }
    }
}

/// Collapses mixed entries into a uniform list of names, dropping anything nameless.
pub fn normalize_names(entries: &[NameEntry]) -> Vec<String> {
    entries.iter().filter_map(NameEntry::name).map(str::to_string).collect()
}

/// Loosely typed movie metadata. Numeric fields stay as raw JSON and are read
/// through the lenient accessors below.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "lenient::name_entries")]
    pub genres: Vec<NameEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "lenient::name_entries")]
    pub cast: Vec<NameEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directors: Option<NameList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<NameList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::string")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::string")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::string")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<Value>,
}

impl MovieProfile {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    pub fn tagline(&self) -> Option<&str> {
        non_blank(self.tagline.as_deref())
    }

    pub fn genre_names(&self) -> Vec<String> {
        normalize_names(&self.genres)
    }

    pub fn cast_names(&self) -> Vec<String> {
        normalize_names(&self.cast)
    }

    /// `directors` wins when it yields any name, otherwise `director` is consulted.
    pub fn director_names(&self) -> Vec<String> {
        let primary = self.directors.as_ref().map(NameList::names).unwrap_or_default();
        if !primary.is_empty() {
            return primary;
        }
        self.director.as_ref().map(NameList::names).unwrap_or_default()
    }

    /// Popularity score; zero, missing or non-numeric values read as 45.
    pub fn popularity(&self) -> f64 {
        match self.popularity.as_ref().and_then(loose_float) {
            Some(value) if value != 0.0 => value,
            _ => DEFAULT_POPULARITY,
        }
    }

    pub fn production_budget(&self) -> f64 {
        self.budget.as_ref().and_then(loose_float).unwrap_or(0.0)
    }

    pub fn vote_count(&self) -> i64 {
        self.vote_count.as_ref().and_then(loose_integer).unwrap_or(0)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub(crate) fn loose_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

pub(crate) fn loose_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number.as_f64().filter(|float| float.is_finite()).map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}
