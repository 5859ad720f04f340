//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints for the two
//! resource groups (movies and TV shows): top rated lists, search
//! and details.

mod api;
mod client;
mod error;
/// Image CDN URL composition.
pub mod images;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TOP_RATED_LIMIT, TmdbClient, TmdbClientBuilder};
pub use error::{ParseMediaKindError, RemoteFetchError};
pub use types::{ContentItem, MediaKind, Movie, PagedResponse, TvShow};
