//! Display strings derived from browser state.
//!
//! Everything here is pure; `ui` only lays the results out.

use moviehub_api::tmdb::images::{HeroImage, ImageSource, hero_image, poster_image};
use moviehub_api::tmdb::{ContentItem, MediaKind};

use super::state::{BrowserState, is_search_active};

/// Placeholder for an unknown release year.
const UNKNOWN_YEAR: &str = "N/A";

/// Shown when an item has no overview.
const NO_OVERVIEW: &str = "No overview available.";

/// Listing heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingHeader {
    /// Main line.
    pub title: String,
    /// Result count line, only while searching.
    pub subtitle: Option<String>,
}

/// Builds the listing heading.
#[must_use]
pub fn listing_header(state: &BrowserState) -> ListingHeader {
    let query = state.search_query();
    if is_search_active(query) {
        ListingHeader {
            title: format!("Search Results for \"{query}\""),
            subtitle: Some(format!("Found {} results", state.search_results().len())),
        }
    } else {
        ListingHeader {
            title: format!("Top 10 {}", state.active_tab().label()),
            subtitle: None,
        }
    }
}

/// Message shown when the listing has nothing to display.
#[must_use]
pub fn empty_message(state: &BrowserState) -> String {
    let query = state.search_query();
    if is_search_active(query) {
        return format!("No results found for \"{query}\"");
    }
    let noun = match state.active_tab() {
        MediaKind::Movie => "movies",
        MediaKind::Tv => "TV shows",
    };
    format!("No {noun} available")
}

/// One card of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Display name.
    pub title: String,
    /// Release year or `N/A`.
    pub year: String,
    /// Rating with one decimal.
    pub rating: String,
    /// Poster URL or the placeholder.
    pub poster: ImageSource,
}

impl CardView {
    /// Builds a card for `item`.
    #[must_use]
    pub fn new(item: &ContentItem) -> Self {
        Self {
            title: String::from(item.title()),
            year: release_year_label(item),
            rating: rating_label(item),
            poster: poster_image(item),
        }
    }
}

/// The detail page of a fetched item.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    /// Display name.
    pub title: String,
    /// Release year or `N/A`.
    pub year: String,
    /// Rating with one decimal.
    pub rating: String,
    /// Vote count, e.g. `(30000 votes)`.
    pub votes: String,
    /// Hero image.
    pub hero: HeroImage,
    /// Overview text or the fallback.
    pub overview: String,
    /// Label of the back action.
    pub back_label: String,
}

impl DetailPage {
    /// Builds the detail page for `item`.
    #[must_use]
    pub fn new(item: &ContentItem) -> Self {
        let overview = item.overview().trim();
        Self {
            title: String::from(item.title()),
            year: release_year_label(item),
            rating: rating_label(item),
            votes: format!("({} votes)", item.vote_count()),
            hero: hero_image(item),
            overview: if overview.is_empty() {
                String::from(NO_OVERVIEW)
            } else {
                String::from(overview)
            },
            back_label: back_label(item.kind()),
        }
    }
}

/// `Back to Movies` / `Back to TV Shows`.
#[must_use]
pub fn back_label(kind: MediaKind) -> String {
    format!("Back to {}", kind.label())
}

fn release_year_label(item: &ContentItem) -> String {
    item.release_year()
        .map_or_else(|| String::from(UNKNOWN_YEAR), |y| y.to_string())
}

fn rating_label(item: &ContentItem) -> String {
    format!("{:.1}", item.vote_average())
}
