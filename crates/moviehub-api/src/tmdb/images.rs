//! Image CDN URL composition.
//!
//! TMDB returns image paths as fragments (`/abc.jpg`); the full URL is
//! `{IMAGE_BASE_URL}/{size}{path}`.

use super::types::ContentItem;

/// Base URL of the TMDB image CDN.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Bundled image shown when an item has no poster.
pub const PLACEHOLDER_IMAGE: &str = "placeholder-movie.jpg";

/// Size tiers used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Card poster.
    W500,
    /// Detail hero when only a poster exists.
    W780,
    /// Detail hero backdrop.
    W1920,
}

impl ImageSize {
    /// Size segment of the CDN URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::W1920 => "w1920",
        }
    }
}

/// Builds a CDN URL for an image path fragment.
#[must_use]
pub fn image_url(size: ImageSize, path: &str) -> String {
    format!("{IMAGE_BASE_URL}/{}{path}", size.as_str())
}

/// Where an image should be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Remote CDN URL.
    Remote(String),
    /// The bundled placeholder.
    Placeholder,
}

impl ImageSource {
    /// URL or placeholder file name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote(url) => url,
            Self::Placeholder => PLACEHOLDER_IMAGE,
        }
    }

    /// Returns `true` for the bundled placeholder.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Card poster (`w500`), or the placeholder when the item has none.
#[must_use]
pub fn poster_image(item: &ContentItem) -> ImageSource {
    item.poster_path().map_or(ImageSource::Placeholder, |path| {
        ImageSource::Remote(image_url(ImageSize::W500, path))
    })
}

/// Hero image of the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroImage {
    /// Wide backdrop (`w1920`).
    Backdrop(String),
    /// Poster fallback (`w780`).
    Poster(String),
    /// Neither path is present.
    None,
}

impl HeroImage {
    /// Remote URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Backdrop(url) | Self::Poster(url) => Some(url),
            Self::None => None,
        }
    }
}

/// Picks the hero image: backdrop, then poster, then nothing.
#[must_use]
pub fn hero_image(item: &ContentItem) -> HeroImage {
    if let Some(path) = item.backdrop_path() {
        return HeroImage::Backdrop(image_url(ImageSize::W1920, path));
    }
    item.poster_path().map_or(HeroImage::None, |path| {
        HeroImage::Poster(image_url(ImageSize::W780, path))
    })
}
