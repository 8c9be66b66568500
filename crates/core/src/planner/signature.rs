use crate::domain::movie::MovieProfile;
use crate::domain::plan::MovieSignature;

const DEFAULT_TITLE: &str = "This film";
const DEFAULT_GENRE: &str = "Event";
const DEFAULT_LEAD: &str = "the ensemble cast";

const GENRE_FOCUS: [(&str, &str); 11] = [
    ("Action", "high-impact action beats"),
    ("Adventure", "world-building spectacle"),
    ("Science Fiction", "immersive sci-fi worldbuilding"),
    ("Fantasy", "mythic fantasy imagery"),
    ("Animation", "signature animation style"),
    ("Drama", "character-driven drama"),
    ("Comedy", "sharp comedic timing"),
    ("Horror", "edge-of-seat suspense"),
    ("Thriller", "white-knuckle thrills"),
    ("Romance", "sweeping romantic stakes"),
    ("Documentary", "truth-first storytelling"),
];

const GENRE_AUDIENCE: [(&str, &str); 11] = [
    ("Action", "action seekers"),
    ("Adventure", "genre fans"),
    ("Science Fiction", "sci-fi faithful"),
    ("Fantasy", "fantasy fandoms"),
    ("Animation", "family audiences"),
    ("Drama", "prestige audiences"),
    ("Comedy", "comedy lovers"),
    ("Horror", "thrill seekers"),
    ("Thriller", "thriller fans"),
    ("Romance", "date-night audiences"),
    ("Documentary", "non-fiction fans"),
];

/// Derives positioning text from movie metadata. Absent or empty metadata
/// yields the generic event signature; no field is ever required.
pub fn extract_movie_signature(profile: Option<&MovieProfile>) -> MovieSignature {
    let Some(profile) = profile.filter(|profile| !profile.is_empty()) else {
        return generic_signature();
    };

    let title = profile.title().unwrap_or(DEFAULT_TITLE).to_string();
    let primary_genre =
        profile.genre_names().into_iter().next().unwrap_or_else(|| DEFAULT_GENRE.to_string());
    let genre_lower = primary_genre.to_lowercase();

    let genre_focus = lookup(&GENRE_FOCUS, &primary_genre)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{genre_lower} energy"));
    let audience_callout = lookup(&GENRE_AUDIENCE, &primary_genre)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{genre_lower} fans"));

    let cast = profile.cast_names();
    let supporting: Vec<String> = cast.iter().skip(1).take(2).cloned().collect();
    let lead = cast.into_iter().next().or_else(|| profile.director_names().into_iter().next());

    let tagline = profile.tagline().unwrap_or_default().to_string();
    let hook = if !tagline.is_empty() {
        tagline.clone()
    } else if let Some(lead) = &lead {
        format!("{lead}'s {genre_lower} turn")
    } else {
        format!("fan-favorite {genre_lower} moments")
    };

    MovieSignature {
        title,
        primary_genre,
        genre_focus,
        hook,
        lead: lead.unwrap_or_else(|| DEFAULT_LEAD.to_string()),
        tagline,
        audience_callout,
        supporting,
    }
}

fn generic_signature() -> MovieSignature {
    MovieSignature {
        title: DEFAULT_TITLE.to_string(),
        primary_genre: DEFAULT_GENRE.to_string(),
        genre_focus: "cinematic spectacle".to_string(),
        hook: "Fan-favorite moments".to_string(),
        lead: DEFAULT_LEAD.to_string(),
        tagline: String::new(),
        audience_callout: "fans".to_string(),
        supporting: Vec::new(),
    }
}

fn lookup(table: &[(&'static str, &'static str)], genre: &str) -> Option<&'static str> {
    table.iter().find(|(key, _)| *key == genre).map(|(_, phrase)| *phrase)
}
