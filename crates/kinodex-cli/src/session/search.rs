//! Search orchestrator and detail cache.
//!
//! `SearchSession` drives one logical search at a time: it hands out a
//! monotonic epoch for each outgoing list search, accepts the list page
//! and the detail batch back (discarding anything from a superseded
//! search), and keeps every fetched detail record in an append-only
//! cache for the lifetime of the session.

use std::collections::HashMap;

use anyhow::Result;
use kinodex_api::omdb::{LocalOmdbApi, Plot, SearchPage, SearchParams, TitleDetail, TitleKind};

use super::filter::{RatingBounds, filter_by_rating};
use super::pagination::PageState;

/// Monotonic token identifying one outgoing search.
pub type Epoch = u64;

/// User-facing message for a valid response with zero matches.
pub const MSG_NO_RESULTS: &str = "No movies found";

/// User-facing message for a failed list search.
pub const MSG_FETCH_ERROR: &str = "Error loading movies. Please try again later.";

/// What the user asked for, read from the controls when a search fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search text (already defaulted when the box was empty).
    pub text: String,
    /// Release year filter.
    pub year: Option<u16>,
    /// Title kind filter.
    pub kind: Option<TitleKind>,
}

impl SearchQuery {
    /// Builds API parameters for the given page.
    #[must_use]
    pub fn to_params(&self, page: u32) -> SearchParams {
        let mut params = SearchParams::new(self.text.clone()).page(page);
        if let Some(year) = self.year {
            params = params.year(year);
        }
        if let Some(kind) = self.kind {
            params = params.kind(kind);
        }
        params
    }
}

/// Result of feeding a list-search response into the session.
#[derive(Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// Response belongs to a superseded search; nothing changed.
    Stale,
    /// List search failed; prior state and cache are intact.
    Failed,
    /// Valid response with zero matches; pagination reset to 1 of 1.
    NoMatches,
    /// Page accepted. `ids` are the identifiers still missing from the
    /// cache; when empty the page can be assembled immediately.
    NeedDetails {
        /// Uncached identifiers, in page order.
        ids: Vec<String>,
    },
}

/// Result of feeding a detail batch into the session.
#[derive(Debug, PartialEq, Eq)]
pub enum DetailsOutcome {
    /// Batch belongs to a superseded search; nothing changed.
    Stale,
    /// Cache updated; the page can be assembled.
    Ready,
}

/// Owns paging state and the in-memory detail cache for one UI session.
#[derive(Debug)]
pub struct SearchSession {
    /// Epoch of the most recent search; responses tagged with anything
    /// older are discarded.
    epoch: Epoch,
    /// Pagination bookkeeping.
    pub page: PageState,
    /// Detail records keyed by identifier. Append-only, never evicted.
    cache: HashMap<String, TitleDetail>,
    /// Identifiers of the last accepted page, in API order.
    current_ids: Vec<String>,
}

impl SearchSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new(items_per_page: u32) -> Self {
        Self {
            epoch: 0,
            page: PageState::new(items_per_page),
            cache: HashMap::new(),
            current_ids: Vec::new(),
        }
    }

    /// Starts a new search: bumps the epoch and returns it. The caller
    /// tags the outgoing request with the returned value; there is no
    /// cancellation of requests already in flight.
    pub const fn begin_search(&mut self) -> Epoch {
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    /// Feeds a list-search response back into the session.
    pub fn accept_page(&mut self, epoch: Epoch, result: Result<SearchPage>) -> PageOutcome {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding stale search page");
            return PageOutcome::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(error = %err, "list search failed");
                return PageOutcome::Failed;
            }
        };

        if !page.is_match() {
            self.page.clear();
            self.current_ids.clear();
            return PageOutcome::NoMatches;
        }

        self.page.set_total(page.total());
        self.current_ids = page.hits.iter().map(|hit| hit.imdb_id.clone()).collect();

        let ids = self
            .current_ids
            .iter()
            .filter(|id| !self.cache.contains_key(*id))
            .cloned()
            .collect();
        PageOutcome::NeedDetails { ids }
    }

    /// Feeds a detail batch back into the session. Successful records
    /// enter the cache; per-item failures were already logged by the
    /// fetcher and are simply dropped, never aborting the batch.
    pub fn accept_details(
        &mut self,
        epoch: Epoch,
        fetched: Vec<(String, Option<TitleDetail>)>,
    ) -> DetailsOutcome {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding stale detail batch");
            return DetailsOutcome::Stale;
        }

        for (id, detail) in fetched {
            if let Some(detail) = detail {
                self.cache.insert(id, detail);
            } else {
                tracing::warn!(id = %id, "dropping title with failed detail fetch");
            }
        }
        DetailsOutcome::Ready
    }

    /// Assembles the current page from the cache, in the API's order,
    /// with the rating filter applied. Identifiers whose detail fetch
    /// failed are absent from the cache and silently skipped.
    #[must_use]
    pub fn assemble(&self, bounds: RatingBounds) -> Vec<TitleDetail> {
        let enriched: Vec<TitleDetail> = self
            .current_ids
            .iter()
            .filter_map(|id| self.cache.get(id))
            .cloned()
            .collect();
        filter_by_rating(&enriched, bounds)
    }

    /// Returns every cached record, sorted by title for stable display.
    /// Supports live re-filtering when only the rating bounds change,
    /// with no network call.
    #[must_use]
    pub fn cached_movies(&self) -> Vec<TitleDetail> {
        let mut movies: Vec<TitleDetail> = self.cache.values().cloned().collect();
        movies.sort_by(|a, b| a.title.cmp(&b.title));
        movies
    }
}

/// Fetches detail records for a batch of identifiers concurrently.
///
/// Completions are unordered internally, but the whole batch is joined
/// before returning. A failed fetch yields `None` for that identifier
/// and is logged; it never fails the batch.
pub async fn fetch_details<A: LocalOmdbApi>(
    api: &A,
    ids: &[String],
) -> Vec<(String, Option<TitleDetail>)> {
    let fetches = ids.iter().map(|id| async move {
        match api.title_detail(id, Plot::Full).await {
            Ok(detail) => (id.clone(), Some(detail)),
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "detail fetch failed");
                (id.clone(), None)
            }
        }
    });
    futures::future::join_all(fetches).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use anyhow::{anyhow, bail};

    use super::*;

    fn detail(id: &str, rating: &str) -> TitleDetail {
        let json = format!(
            r#"{{"imdbID":"{id}","Title":"Movie {id}","imdbRating":"{rating}"}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn page_with(ids: &[&str], total: u32) -> SearchPage {
        let hits: Vec<String> = ids
            .iter()
            .map(|id| format!(r#"{{"imdbID":"{id}","Title":"Movie {id}"}}"#))
            .collect();
        let json = format!(
            r#"{{"Response":"True","Search":[{}],"totalResults":"{total}"}}"#,
            hits.join(",")
        );
        serde_json::from_str(&json).unwrap()
    }

    fn no_match_page() -> SearchPage {
        serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap()
    }

    /// Mock API answering detail fetches from a fixed table.
    struct MockApi {
        details: HashMap<String, TitleDetail>,
    }

    impl LocalOmdbApi for MockApi {
        async fn search(&self, _params: &SearchParams) -> Result<SearchPage> {
            bail!("not used in this test")
        }

        async fn title_detail(&self, imdb_id: &str, _plot: Plot) -> Result<TitleDetail> {
            self.details
                .get(imdb_id)
                .cloned()
                .ok_or_else(|| anyhow!("unknown id: {imdb_id}"))
        }
    }

    #[test]
    fn test_fetches_only_uncached_ids() {
        // Arrange: A already cached, B not
        let mut session = SearchSession::new(10);
        let epoch = session.begin_search();
        session.accept_details(epoch, vec![(String::from("A"), Some(detail("A", "8.0")))]);

        // Act
        let epoch = session.begin_search();
        let outcome = session.accept_page(epoch, Ok(page_with(&["A", "B"], 2)));

        // Assert: only B's detail is still needed
        assert_eq!(
            outcome,
            PageOutcome::NeedDetails {
                ids: vec![String::from("B")]
            }
        );

        // Act: complete the batch and assemble with default bounds
        session.accept_details(epoch, vec![(String::from("B"), Some(detail("B", "6.5")))]);
        let movies = session.assemble(RatingBounds::default());

        // Assert: both enriched, in page order
        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_no_matches_resets_pagination() {
        // Arrange
        let mut session = SearchSession::new(10);
        let epoch = session.begin_search();
        assert_eq!(
            session.accept_page(epoch, Ok(page_with(&["A"], 30))),
            PageOutcome::NeedDetails {
                ids: vec![String::from("A")]
            }
        );
        assert!(session.page.change_page(2));

        // Act
        let epoch = session.begin_search();
        let outcome = session.accept_page(epoch, Ok(no_match_page()));

        // Assert: page 1 of 1, both controls disabled
        assert_eq!(outcome, PageOutcome::NoMatches);
        let summary = session.page.summary();
        assert_eq!(summary.current_page, 1);
        assert_eq!(summary.total_pages, 1);
        assert!(!summary.prev_enabled);
        assert!(!summary.next_enabled);
        assert!(session.assemble(RatingBounds::default()).is_empty());
    }

    #[test]
    fn test_stale_page_is_discarded() {
        // Arrange: a second search supersedes the first
        let mut session = SearchSession::new(10);
        let old_epoch = session.begin_search();
        let new_epoch = session.begin_search();
        let outcome = session.accept_page(new_epoch, Ok(page_with(&["B"], 1)));
        assert!(matches!(outcome, PageOutcome::NeedDetails { .. }));
        session.accept_details(new_epoch, vec![(String::from("B"), Some(detail("B", "7.0")))]);

        // Act: the slow first response arrives afterwards
        let outcome = session.accept_page(old_epoch, Ok(page_with(&["A"], 500)));

        // Assert: nothing about the newer search was overwritten
        assert_eq!(outcome, PageOutcome::Stale);
        assert_eq!(session.page.total_results(), 1);
        let movies = session.assemble(RatingBounds::default());
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].imdb_id, "B");
    }

    #[test]
    fn test_stale_details_are_discarded() {
        // Arrange
        let mut session = SearchSession::new(10);
        let old_epoch = session.begin_search();
        let _ = session.accept_page(old_epoch, Ok(page_with(&["A"], 1)));
        let new_epoch = session.begin_search();

        // Act
        let outcome =
            session.accept_details(old_epoch, vec![(String::from("A"), Some(detail("A", "9")))]);

        // Assert: nothing entered the cache
        assert_eq!(outcome, DetailsOutcome::Stale);
        assert!(session.cached_movies().is_empty());
        assert_ne!(old_epoch, new_epoch);
    }

    #[test]
    fn test_failed_list_search_keeps_cache() {
        // Arrange
        let mut session = SearchSession::new(10);
        let epoch = session.begin_search();
        let _ = session.accept_page(epoch, Ok(page_with(&["A"], 1)));
        session.accept_details(epoch, vec![(String::from("A"), Some(detail("A", "8.1")))]);

        // Act
        let epoch = session.begin_search();
        let outcome = session.accept_page(epoch, Err(anyhow!("connection refused")));

        // Assert: prior cache and page are intact
        assert_eq!(outcome, PageOutcome::Failed);
        let movies = session.assemble(RatingBounds::default());
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].imdb_id, "A");
    }

    #[test]
    fn test_failed_detail_is_dropped_not_fatal() {
        // Arrange
        let mut session = SearchSession::new(10);
        let epoch = session.begin_search();
        let _ = session.accept_page(epoch, Ok(page_with(&["A", "B", "C"], 3)));

        // Act: B's fetch failed
        let outcome = session.accept_details(
            epoch,
            vec![
                (String::from("A"), Some(detail("A", "7.7"))),
                (String::from("B"), None),
                (String::from("C"), Some(detail("C", "6.1"))),
            ],
        );

        // Assert: batch completes, B is skipped in assembly
        assert_eq!(outcome, DetailsOutcome::Ready);
        let ids: Vec<String> = session
            .assemble(RatingBounds::default())
            .into_iter()
            .map(|m| m.imdb_id)
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn test_refilter_cached_without_network() {
        // Arrange: five cached entries, ratings 5.0 to 9.0
        let mut session = SearchSession::new(10);
        let epoch = session.begin_search();
        let _ = session.accept_page(epoch, Ok(page_with(&["a", "b", "c", "d", "e"], 5)));
        session.accept_details(
            epoch,
            vec![
                (String::from("a"), Some(detail("a", "5.0"))),
                (String::from("b"), Some(detail("b", "6.0"))),
                (String::from("c"), Some(detail("c", "7.0"))),
                (String::from("d"), Some(detail("d", "8.0"))),
                (String::from("e"), Some(detail("e", "9.0"))),
            ],
        );

        // Act: rating-min raised to 7, no new search
        let bounds = RatingBounds::from_inputs("7", "");
        let movies = filter_by_rating(&session.cached_movies(), bounds);

        // Assert
        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "e"]);
    }

    #[test]
    fn test_assemble_applies_rating_filter() {
        // Arrange
        let mut session = SearchSession::new(10);
        let epoch = session.begin_search();
        let _ = session.accept_page(epoch, Ok(page_with(&["A", "B"], 2)));
        session.accept_details(
            epoch,
            vec![
                (String::from("A"), Some(detail("A", "4.0"))),
                (String::from("B"), Some(detail("B", "N/A"))),
            ],
        );

        // Act
        let movies = session.assemble(RatingBounds { min: 5.0, max: 10.0 });

        // Assert: A below range, B unrated
        assert!(movies.is_empty());
    }

    #[test]
    fn test_query_to_params() {
        // Arrange
        let query = SearchQuery {
            text: String::from("star"),
            year: Some(1977),
            kind: Some(TitleKind::Movie),
        };

        // Act
        let params = query.to_params(4);

        // Assert
        assert_eq!(
            params,
            SearchParams::new("star").year(1977).kind(TitleKind::Movie).page(4)
        );
    }

    #[tokio::test]
    async fn test_fetch_details_mixed_results() {
        // Arrange: the mock knows A but not B
        let mut details = HashMap::new();
        details.insert(String::from("A"), detail("A", "8.0"));
        let api = MockApi { details };
        let ids = vec![String::from("A"), String::from("B")];

        // Act
        let fetched = fetch_details(&api, &ids).await;

        // Assert: one success, one placeholder, batch order preserved
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].0, "A");
        assert!(fetched[0].1.is_some());
        assert_eq!(fetched[1].0, "B");
        assert!(fetched[1].1.is_none());
    }
}
