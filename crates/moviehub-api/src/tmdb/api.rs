//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::RemoteFetchError;
use super::types::{ContentItem, MediaKind};

/// TMDB API trait.
///
/// One method per operation; the resource group (movies or TV shows) is
/// selected by [`MediaKind`]. Abstracts the HTTP client so the browser
/// state can be driven by mocks in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the top rated list for `kind`, truncated to the first
    /// [`TOP_RATED_LIMIT`](super::TOP_RATED_LIMIT) entries in upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteFetchError`] on transport failure, non-success status
    /// or an undecodable body.
    async fn top_rated(&self, kind: MediaKind) -> Result<Vec<ContentItem>, RemoteFetchError>;

    /// Searches `kind` with the raw query string; all results in upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteFetchError`] on transport failure, non-success status
    /// or an undecodable body.
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<Vec<ContentItem>, RemoteFetchError>;

    /// Fetches a single item by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteFetchError`] on transport failure, non-success status
    /// (including 404) or an undecodable body.
    async fn details(&self, kind: MediaKind, id: u64) -> Result<ContentItem, RemoteFetchError>;
}
