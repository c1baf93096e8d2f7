//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::params::{Plot, SearchParams};
use super::types::{SearchPage, TitleDetail};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches for titles matching the query, one page at a time.
    ///
    /// A "no match" response is `Ok` with `Response: "False"`; check
    /// [`SearchPage::is_match`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, params: &SearchParams) -> Result<SearchPage>;

    /// Fetches the full detail record for a single title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails, or if
    /// OMDb does not know the identifier.
    async fn title_detail(&self, imdb_id: &str, plot: Plot) -> Result<TitleDetail>;
}
