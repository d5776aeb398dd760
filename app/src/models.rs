//! Typed projections of upstream movie records.
//!
//! Every field except the identifier is defaulted on decode, whether it is
//! missing or `null`, so a partial upstream payload still produces a value. Rendering code goes through the
//! display helpers below instead of probing raw fields.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Decode an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Thumb,
    Poster,
    Original,
}

impl ImageSize {
    fn path_segment(self) -> &'static str {
        match self {
            ImageSize::Thumb => "w185",
            ImageSize::Poster => "w500",
            ImageSize::Original => "original",
        }
    }
}

pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", TMDB_IMAGE_BASE, size.path_segment(), p))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieSummary {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: i64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
}

impl MovieSummary {
    pub fn display_title(&self) -> &str {
        display_title(&self.title)
    }

    pub fn display_overview(&self) -> &str {
        display_overview(self.overview.as_deref())
    }

    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    /// Poster first, backdrop as a stand-in, placeholder last.
    pub fn poster_url(&self) -> String {
        let path = self
            .poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.backdrop_path.as_deref());
        image_url(path, ImageSize::Poster)
    }

    pub fn backdrop_url(&self) -> String {
        image_url(self.backdrop_path.as_deref(), ImageSize::Original)
    }

    pub fn rating_badge(&self) -> Option<String> {
        rating_badge(self.vote_average)
    }

    pub fn has_genre(&self, genre_id: i64) -> bool {
        self.genre_ids.contains(&genre_id)
    }

    /// Rendering key that masks an accidental repeat of an id across pages.
    pub fn render_key(&self) -> String {
        format!("{}-{}", self.id, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Genre {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductionCompany {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

impl ProductionCompany {
    pub fn logo_url(&self) -> Option<String> {
        self.logo_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| image_url(Some(p), ImageSize::Thumb))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpokenLanguage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub iso_639_1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub english_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ReleaseStatus {
    Rumored,
    Planned,
    #[serde(rename = "In Production")]
    InProduction,
    #[serde(rename = "Post Production")]
    PostProduction,
    Released,
    Canceled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ReleaseStatus {
    pub fn label(self) -> &'static str {
        match self {
            ReleaseStatus::Rumored => "Rumored",
            ReleaseStatus::Planned => "Planned",
            ReleaseStatus::InProduction => "In Production",
            ReleaseStatus::PostProduction => "Post Production",
            ReleaseStatus::Released => "Released",
            ReleaseStatus::Canceled => "Canceled",
            ReleaseStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieDetail {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: i64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ReleaseStatus,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl MovieDetail {
    /// List-view projection of this record.
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            release_date: self.release_date.clone(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            original_language: self.original_language.clone(),
            popularity: self.popularity,
            adult: false,
        }
    }

    /// Original title when the upstream supplies one, else the localized one.
    pub fn heading(&self) -> &str {
        self.original_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| display_title(&self.title))
    }

    pub fn display_overview(&self) -> &str {
        display_overview(self.overview.as_deref())
    }

    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    pub fn runtime_label(&self) -> Option<String> {
        self.runtime.filter(|r| *r > 0).map(runtime_label)
    }

    pub fn budget_label(&self) -> Option<String> {
        money_label(self.budget)
    }

    pub fn revenue_label(&self) -> Option<String> {
        money_label(self.revenue)
    }

    pub fn backdrop_url(&self) -> String {
        image_url(self.backdrop_path.as_deref(), ImageSize::Original)
    }

    pub fn poster_url(&self) -> String {
        self.summary().poster_url()
    }

    pub fn rating_badge(&self) -> Option<String> {
        rating_badge(self.vote_average)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum VideoKind {
    Trailer,
    Teaser,
    Clip,
    Featurette,
    #[serde(rename = "Behind the Scenes")]
    BehindTheScenes,
    Bloopers,
    #[serde(rename = "Opening Credits")]
    OpeningCredits,
    #[default]
    #[serde(other)]
    Other,
}

impl VideoKind {
    pub fn label(self) -> &'static str {
        match self {
            VideoKind::Trailer => "Trailer",
            VideoKind::Teaser => "Teaser",
            VideoKind::Clip => "Clip",
            VideoKind::Featurette => "Featurette",
            VideoKind::BehindTheScenes => "Behind the Scenes",
            VideoKind::Bloopers => "Bloopers",
            VideoKind::OpeningCredits => "Opening Credits",
            VideoKind::Other => "Video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Video {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: VideoKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub official: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube")
    }

    pub fn embed_url(&self) -> Option<String> {
        if self.key.is_empty() {
            return None;
        }
        if self.is_youtube() {
            Some(format!(
                "https://www.youtube.com/embed/{}?autoplay=1&rel=0&modestbranding=1",
                self.key
            ))
        } else if self.site.eq_ignore_ascii_case("vimeo") {
            Some(format!("https://player.vimeo.com/video/{}", self.key))
        } else {
            None
        }
    }

    pub fn thumbnail_url(&self) -> String {
        if self.is_youtube() && !self.key.is_empty() {
            format!("https://img.youtube.com/vi/{}/hqdefault.jpg", self.key)
        } else {
            PLACEHOLDER_IMAGE.to_string()
        }
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// Best trailer to play from a movie's video list.
pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    let youtube = || videos.iter().filter(|v| v.is_youtube() && !v.key.is_empty());
    youtube()
        .find(|v| v.kind == VideoKind::Trailer && v.official)
        .or_else(|| youtube().find(|v| v.kind == VideoKind::Trailer))
        .or_else(|| youtube().find(|v| v.kind == VideoKind::Teaser))
        .or_else(|| youtube().next())
}

pub fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        "Untitled"
    } else {
        title
    }
}

pub fn display_overview(overview: Option<&str>) -> &str {
    overview
        .filter(|o| !o.trim().is_empty())
        .unwrap_or("No description available.")
}

pub fn release_year(date: Option<&str>) -> Option<i32> {
    use chrono::Datelike;

    let date = date?.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.year())
        .ok()
        .or_else(|| date.split('-').next()?.parse().ok())
}

pub fn rating_badge(vote_average: f64) -> Option<String> {
    (vote_average > 0.0).then(|| format!("{:.1}", vote_average))
}

pub fn runtime_label(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn money_label(amount: u64) -> Option<String> {
    match amount {
        0 => None,
        1..=999 => Some(format!("${}", amount)),
        1_000..=999_999 => Some(format!("${}K", amount / 1_000)),
        _ => Some(format!("${:.1}M", amount as f64 / 1_000_000.0)),
    }
}

static GENRE_NAMES: Lazy<HashMap<i64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (28, "Action"),
        (12, "Adventure"),
        (16, "Animation"),
        (35, "Comedy"),
        (80, "Crime"),
        (99, "Documentary"),
        (18, "Drama"),
        (10751, "Family"),
        (14, "Fantasy"),
        (36, "History"),
        (27, "Horror"),
        (10402, "Music"),
        (9648, "Mystery"),
        (10749, "Romance"),
        (878, "Science Fiction"),
        (10770, "TV Movie"),
        (53, "Thriller"),
        (10752, "War"),
        (37, "Western"),
    ])
});

/// Display name for a well-known genre id.
pub fn genre_name(genre_id: i64) -> Option<&'static str> {
    GENRE_NAMES.get(&genre_id).copied()
}
