use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::campaign::{cell, flatten_newlines, AdVariant, ExportCampaign};
use crate::errors::ExportError;

const AD_COPY_HEADER: [&str; 5] = ["label", "variant", "length", "platform", "text"];
const SOCIAL_HEADER: [&str; 5] =
    ["platform", "text", "optimal_time", "post_type", "image_suggestion"];
const ROLLOUT_HEADER: [&str; 7] =
    ["week", "start_date", "end_date", "phase", "intensity", "regions", "activities"];
const AD_COPY_LABELS: [&str; 2] = ["A", "B"];
const MAX_STORYBOARD_FRAMES: usize = 4;
const TICKETS_WINDOW_DAYS: i64 = 21;

const VISUAL_DIRECTIONS: [&str; 4] = [
    "High-energy montage of hero shots",
    "Character close-up with moody lighting",
    "World-building wide shot with typography overlay",
    "Fan/community oriented collage",
];

/// Call to action keyed off how far away the release is.
pub fn cta_for_release(release_date: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = release_date.filter(|raw| !raw.is_empty()) else {
        return "Learn more".to_string();
    };
    let Ok(release) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
        return "Get tickets".to_string();
    };

    let now = now.naive_utc();
    let release_start = release.and_time(NaiveTime::MIN);
    if release_start <= now {
        "Watch now".to_string()
    } else if (release_start - now).num_days() <= TICKETS_WINDOW_DAYS {
        "Get tickets".to_string()
    } else {
        format!("Coming {}", release.format("%b %d"))
    }
}

pub fn ad_copy_csv(campaign: &ExportCampaign) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer();
    writer.write_record(AD_COPY_HEADER)?;

    let combined: Vec<&AdVariant> = campaign
        .ad_copy
        .variants
        .iter()
        .chain(&campaign.ad_copy.ai_enhanced_variants)
        .collect();

    for (index, label) in AD_COPY_LABELS.iter().enumerate() {
        match combined.get(index) {
            Some(variant) => writer.write_record([
                label.to_string(),
                cell(&variant.variant),
                cell(&variant.length),
                cell(&variant.platform),
                cell(&variant.text),
            ])?,
            None => writer.write_record([*label, "N/A", "N/A", "", "No variant generated"])?,
        }
    }

    finish_csv(writer)
}

pub fn social_posts_csv(campaign: &ExportCampaign) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer();
    writer.write_record(SOCIAL_HEADER)?;

    for (platform, payload) in &campaign.social_posts {
        if platform == "generated_at" {
            continue;
        }
        let Some(payload) = payload.as_object() else {
            continue;
        };
        let field = |key: &str| payload.get(key).map(cell).unwrap_or_default();

        let platform_name = match payload.get("platform") {
            Some(value) if !value.is_null() => cell(value),
            _ => platform.clone(),
        };
        writer.write_record([
            platform_name,
            field("text").trim().to_string(),
            field("optimal_time"),
            field("post_type"),
            field("image_suggestion"),
        ])?;
    }

    finish_csv(writer)
}

pub fn email_markdown(campaign: &ExportCampaign, now: DateTime<Utc>) -> String {
    let movie = &campaign.movie_data;
    let title = campaign.title();
    let tagline = movie.tagline().unwrap_or_default();
    let release_date = campaign.release_date().unwrap_or("TBD");
    let overview = movie.overview.as_deref().map(str::trim).unwrap_or_default();
    let cast = movie.cast_names().into_iter().take(3).collect::<Vec<_>>().join(", ");

    let cta = cta_for_release(Some(release_date), now);
    let subject_a = if tagline.is_empty() {
        format!("{title} arrives {release_date}")
    } else {
        format!("{title}: {tagline}")
    };
    let subject_b = format!("{title} - {cta}");

    let mut highlights = Vec::new();
    if !tagline.is_empty() {
        highlights.push(tagline.to_string());
    }
    if !cast.is_empty() {
        highlights.push(format!("Starring {cast}"));
    }
    if let Some(genre) = movie.genre_names().into_iter().next() {
        highlights.push(format!("Genre fans: {genre}"));
    }

    let body_intro = if overview.is_empty() {
        format!("{title} is gearing up for release on {release_date}.")
    } else {
        overview.to_string()
    };

    let mut lines = vec![
        format!("# Email Campaign: {title}"),
        String::new(),
        format!("**Subject Line A:** {subject_a}"),
        format!("**Subject Line B:** {subject_b}"),
        String::new(),
        format!("**Preview Text:** {title} lands {release_date}. {cta}."),
        String::new(),
        "Hi {{FirstName}},".to_string(),
        String::new(),
        body_intro,
        String::new(),
        "Key highlights:".to_string(),
    ];

    if highlights.is_empty() {
        lines.push("- Exclusive first look at the film.".to_string());
    } else {
        lines.extend(highlights.iter().map(|highlight| format!("- {highlight}")));
    }

    lines.extend([
        String::new(),
        format!("Ready to secure your seats? {cta}."),
        String::new(),
        "Best,".to_string(),
        "The Campaign Team".to_string(),
    ]);

    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct Storyboard<'a> {
    title: &'a str,
    release_date: Option<&'a str>,
    frames: Vec<StoryboardFrame>,
}

#[derive(Debug, Serialize)]
struct StoryboardFrame {
    frame: usize,
    title: String,
    visual_direction: &'static str,
    copy: String,
    cta: &'static str,
    start_date: Option<NaiveDate>,
    regions: Vec<String>,
    intensity: String,
}

pub fn storyboard_json(campaign: &ExportCampaign) -> Result<Vec<u8>, ExportError> {
    let title = campaign.title();
    let phases =
        campaign.rollout_plan.as_ref().map(|plan| plan.phases.as_slice()).unwrap_or_default();

    let frames: Vec<StoryboardFrame> = if phases.is_empty() {
        vec![StoryboardFrame {
            frame: 1,
            title: "Teaser Drop".to_string(),
            visual_direction: visual_direction(1),
            copy: "Intro hero moments & release date reveal".to_string(),
            cta: frame_cta(1),
            start_date: None,
            regions: campaign.regional_analysis.target_regions.clone(),
            intensity: String::new(),
        }]
    } else {
        phases
            .iter()
            .take(MAX_STORYBOARD_FRAMES)
            .enumerate()
            .map(|(index, phase)| {
                let frame = index + 1;
                let copy = if phase.focus.is_empty() {
                    format!("Highlight why {title} is a must-see.")
                } else {
                    phase.focus.clone()
                };
                StoryboardFrame {
                    frame,
                    title: phase.name.clone(),
                    visual_direction: visual_direction(frame),
                    copy,
                    cta: frame_cta(frame),
                    start_date: Some(phase.start_date),
                    regions: phase.regions.clone(),
                    intensity: phase.intensity.as_str().to_string(),
                }
            })
            .collect()
    };

    let storyboard =
        Storyboard { title, release_date: campaign.movie_data.release_date.as_deref(), frames };
    Ok(serde_json::to_vec_pretty(&storyboard)?)
}

pub fn thumbnail_brief_markdown(campaign: &ExportCampaign, now: DateTime<Utc>) -> String {
    let title = campaign.title();
    let tagline =
        campaign.movie_data.tagline().unwrap_or("Use bold text to tease the conflict or stakes.");
    let cast = campaign.movie_data.cast_names().into_iter().take(2).collect::<Vec<_>>().join(", ");
    let cast = if cast.is_empty() {
        "Use key art silhouettes if cast unavailable.".to_string()
    } else {
        cast
    };
    let cta = cta_for_release(campaign.release_date(), now);

    [
        format!("# Thumbnail Brief: {title}"),
        String::new(),
        format!("**Tone/Genre:** {}", campaign.primary_genre()),
        format!("**Tagline/Hook:** {tagline}"),
        String::new(),
        "## Visual Directions".to_string(),
        "- High contrast still of the lead with cinematic lighting".to_string(),
        "- Layer subtle grain or texture for a premium feel".to_string(),
        "- Include release date badge in a corner".to_string(),
        String::new(),
        "## Text Overlay Options".to_string(),
        format!("- \"{title}\" large with secondary line \"{cta}\""),
        "- Use angle brackets or slashes to hint at motion/action".to_string(),
        String::new(),
        "## Talent / Elements".to_string(),
        format!("- Priority cast: {cast}"),
        "- Background motif inspired by primary location or genre iconography".to_string(),
        String::new(),
        "## Color Palette".to_string(),
        "- Accent: Electric violet or fiery orange for CTA badge".to_string(),
        "- Base: Deep navy/charcoal to keep text legible".to_string(),
    ]
    .join("\n")
}

pub fn rollout_csv(campaign: &ExportCampaign) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer();
    writer.write_record(ROLLOUT_HEADER)?;

    let timeline =
        campaign.rollout_plan.as_ref().map(|plan| plan.timeline.as_slice()).unwrap_or_default();
    for week in timeline {
        writer.write_record([
            week.week.to_string(),
            week.start_date.format("%Y-%m-%d").to_string(),
            week.end_date.format("%Y-%m-%d").to_string(),
            flatten_newlines(&week.phase),
            week.intensity.as_str().to_string(),
            flatten_newlines(&week.active_regions.join(", ")),
            flatten_newlines(&week.key_activities.join(" | ")),
        ])?;
    }

    finish_csv(writer)
}

/// Source tracker details plus the flat citation list. String details are
/// parsed as JSON when they hold an object and kept under `raw` otherwise.
pub fn citations_json(campaign: &ExportCampaign) -> Result<Vec<u8>, ExportError> {
    let mut citations = match &campaign.ad_copy.source_details {
        Some(Value::Object(details)) => details.clone(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(parsed)) => parsed,
            _ => {
                let mut wrapped = Map::new();
                wrapped.insert("raw".to_string(), Value::String(raw.clone()));
                wrapped
            }
        },
        _ => Map::new(),
    };
    citations
        .insert("citation_strings".to_string(), Value::Array(campaign.ad_copy.sources.clone()));

    Ok(serde_json::to_vec_pretty(&Value::Object(citations))?)
}

fn visual_direction(frame: usize) -> &'static str {
    VISUAL_DIRECTIONS[(frame - 1) % VISUAL_DIRECTIONS.len()]
}

fn frame_cta(frame: usize) -> &'static str {
    if frame >= 2 {
        "Get tickets"
    } else {
        "Watch the trailer"
    }
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new().terminator(csv::Terminator::CRLF).from_writer(Vec::new())
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer.into_inner().map_err(|err| ExportError::Io(err.into_error()))
}
