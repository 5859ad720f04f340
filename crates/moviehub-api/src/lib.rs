//! API client library for moviehub.
//!
//! Provides the TMDB client, the movie/TV content model and
//! image URL composition.

/// TMDB API client.
pub mod tmdb;
