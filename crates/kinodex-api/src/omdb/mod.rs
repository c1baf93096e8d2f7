//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint and retrieves title
//! search pages and full title detail records.

mod api;
mod client;
mod params;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
pub use params::{Plot, SearchParams, TitleKind};
pub use types::{NOT_AVAILABLE, SearchHit, SearchPage, TitleDetail};

/// IMDb title page base URL (for opening title pages in a browser).
pub const IMDB_TITLE_URL: &str = "https://www.imdb.com/title";
