//! TMDB content model.
//!
//! Movies and TV shows arrive from different endpoints with slightly
//! different field names (`title`/`release_date` vs `name`/`first_air_date`).
//! The client tags every item with its [`MediaKind`] as soon as it is
//! decoded, so nothing downstream has to guess the variant from field
//! presence.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::ParseMediaKindError;

// --- Media kind ---

/// The two TMDB resource groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    /// Movies (`/movie/...`).
    #[serde(rename = "movie", alias = "movies")]
    Movie,
    /// TV shows (`/tv/...`).
    #[serde(rename = "tv", alias = "tv-shows")]
    Tv,
}

impl MediaKind {
    /// Both kinds, in tab order.
    pub const ALL: [Self; 2] = [Self::Movie, Self::Tv];

    /// URL path segment used by TMDB for this kind.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    /// Human label, e.g. for tab titles ("Movies", "TV Shows").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Tv => "TV Shows",
        }
    }

    /// Returns the other kind.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Movie => Self::Tv,
            Self::Tv => Self::Movie,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(Self::Movie),
            "tv" | "tv-shows" | "tv-show" => Ok(Self::Tv),
            _ => Err(ParseMediaKindError(String::from(s))),
        }
    }
}

// --- List envelope ---

/// Envelope of TMDB list endpoints (`top_rated`, `search`).
///
/// Only `results` is used; pagination metadata is kept for logging.
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Items on this page, in upstream order.
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- Movie ---

/// A movie as returned by list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average rating (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Number of votes.
    #[serde(default)]
    pub vote_count: u32,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
}

// --- TV show ---

/// A TV show as returned by list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TvShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// First air date (YYYY-MM-DD, empty or null when unknown).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Average rating (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Number of votes.
    #[serde(default)]
    pub vote_count: u32,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
}

// --- Content item ---

/// A movie or a TV show, tagged at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    /// Item from a `/movie` or `/search/movie` endpoint.
    Movie(Movie),
    /// Item from a `/tv` or `/search/tv` endpoint.
    TvShow(TvShow),
}

impl ContentItem {
    /// Resource group this item belongs to.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        match self {
            Self::Movie(_) => MediaKind::Movie,
            Self::TvShow(_) => MediaKind::Tv,
        }
    }

    /// TMDB identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        match self {
            Self::Movie(m) => m.id,
            Self::TvShow(t) => t.id,
        }
    }

    /// Display name (`title` for movies, `name` for shows).
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::TvShow(t) => &t.name,
        }
    }

    /// Poster image path, if any.
    #[must_use]
    pub fn poster_path(&self) -> Option<&str> {
        let path = match self {
            Self::Movie(m) => m.poster_path.as_deref(),
            Self::TvShow(t) => t.poster_path.as_deref(),
        };
        path.filter(|p| !p.is_empty())
    }

    /// Backdrop image path, if any.
    #[must_use]
    pub fn backdrop_path(&self) -> Option<&str> {
        let path = match self {
            Self::Movie(m) => m.backdrop_path.as_deref(),
            Self::TvShow(t) => t.backdrop_path.as_deref(),
        };
        path.filter(|p| !p.is_empty())
    }

    /// Release date (`release_date` or `first_air_date`); empty strings count as absent.
    #[must_use]
    pub fn release_date(&self) -> Option<&str> {
        let date = match self {
            Self::Movie(m) => m.release_date.as_deref(),
            Self::TvShow(t) => t.first_air_date.as_deref(),
        };
        date.map(str::trim).filter(|d| !d.is_empty())
    }

    /// Year part of the release date.
    ///
    /// Accepts a full `YYYY-MM-DD` date or a bare four-digit year.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date()?;
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(parsed.year());
        }
        if date.len() == 4 && date.chars().all(|c| c.is_ascii_digit()) {
            return date.parse().ok();
        }
        None
    }

    /// Average rating (0-10).
    #[must_use]
    pub const fn vote_average(&self) -> f64 {
        match self {
            Self::Movie(m) => m.vote_average,
            Self::TvShow(t) => t.vote_average,
        }
    }

    /// Number of votes.
    #[must_use]
    pub const fn vote_count(&self) -> u32 {
        match self {
            Self::Movie(m) => m.vote_count,
            Self::TvShow(t) => t.vote_count,
        }
    }

    /// Overview text; empty when upstream has none.
    #[must_use]
    pub fn overview(&self) -> &str {
        let overview = match self {
            Self::Movie(m) => m.overview.as_deref(),
            Self::TvShow(t) => t.overview.as_deref(),
        };
        overview.unwrap_or_default()
    }
}

impl From<Movie> for ContentItem {
    fn from(movie: Movie) -> Self {
        Self::Movie(movie)
    }
}

impl From<TvShow> for ContentItem {
    fn from(show: TvShow) -> Self {
        Self::TvShow(show)
    }
}
