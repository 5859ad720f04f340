//! Navigable locations of the browser.
//!
//! `/` is the listing, `/movie/{id}` and `/tv/{id}` are detail pages.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};
use moviehub_api::tmdb::MediaKind;

/// A browser location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Tabbed listing (`/`).
    Listing,
    /// Detail page (`/{kind}/{id}`).
    Detail {
        /// Resource group.
        kind: MediaKind,
        /// TMDB identifier.
        id: u64,
    },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => f.write_str("/"),
            Self::Detail { kind, id } => write!(f, "/{kind}/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::Listing);
        }
        let mut parts = trimmed.split('/');
        let (Some(kind), Some(id), None) = (parts.next(), parts.next(), parts.next()) else {
            bail!("unknown route {s:?}: expected /, /movie/<id> or /tv/<id>");
        };
        let kind = match kind {
            "movie" => MediaKind::Movie,
            "tv" => MediaKind::Tv,
            other => bail!("unknown route kind {other:?}: expected movie or tv"),
        };
        let id = id
            .parse::<u64>()
            .with_context(|| format!("invalid id in route {s:?}"))?;
        Ok(Self::Detail { kind, id })
    }
}
