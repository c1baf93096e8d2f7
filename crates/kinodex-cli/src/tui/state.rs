//! Browser TUI state management.

use std::time::{Duration, Instant};

use chrono::Datelike;
use kinodex_api::omdb::{TitleDetail, TitleKind};
use ratatui::widgets::TableState;

use crate::config::SearchConfig;
use crate::session::debounce::Debouncer;
use crate::session::filter::RatingBounds;
use crate::session::search::{MSG_NO_RESULTS, SearchQuery, SearchSession};

/// Earliest year the year filter accepts.
const MIN_YEAR: u16 = 1900;

/// Which control is receiving typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Editing the search text.
    Query,
    /// Editing the year filter.
    Year,
    /// Editing the minimum rating.
    RatingMin,
    /// Editing the maximum rating.
    RatingMax,
}

/// What the event loop should do after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Issue a new list search for the current controls and page.
    StartSearch,
    /// Re-apply the rating filter to the cached results.
    Refilter,
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Search orchestrator and detail cache.
    pub session: SearchSession,
    /// Rows currently displayed, already rating-filtered.
    pub movies: Vec<TitleDetail>,
    /// Search text input.
    pub query_input: String,
    /// Year filter input (digits only).
    pub year_input: String,
    /// Minimum rating input.
    pub rating_min_input: String,
    /// Maximum rating input.
    pub rating_max_input: String,
    /// Title kind filter, cycled with a key.
    pub kind: Option<TitleKind>,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Detail modal content, when open.
    pub modal: Option<TitleDetail>,
    /// Table cursor.
    pub table_state: TableState,
    /// Status line message, when something needs saying.
    pub status: Option<&'static str>,
    /// True while a search or detail batch is in flight.
    pub loading: bool,
    /// Query used when the search box is empty.
    default_query: String,
    /// Delays list searches while the user is still typing.
    search_debounce: Debouncer,
    /// Delays re-filtering while rating digits are still coming.
    rating_debounce: Debouncer,
}

impl BrowserState {
    /// Delay before a typed query or year change fires a search.
    pub const SEARCH_DEBOUNCE_MS: u64 = 500;

    /// Delay before a rating bound change re-filters the results.
    pub const RATING_DEBOUNCE_MS: u64 = 300;

    /// Creates browser state from the search config.
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            session: SearchSession::new(config.items_per_page),
            movies: Vec::new(),
            query_input: String::new(),
            year_input: String::new(),
            rating_min_input: String::new(),
            rating_max_input: String::new(),
            kind: None,
            input_mode: InputMode::Normal,
            modal: None,
            table_state: TableState::default(),
            status: None,
            loading: false,
            default_query: config.default_query.clone(),
            search_debounce: Debouncer::new(Duration::from_millis(Self::SEARCH_DEBOUNCE_MS)),
            rating_debounce: Debouncer::new(Duration::from_millis(Self::RATING_DEBOUNCE_MS)),
        }
    }

    /// Builds the query the next search should run, falling back to the
    /// configured default when the search box is empty.
    #[must_use]
    pub fn current_query(&self) -> SearchQuery {
        let trimmed = self.query_input.trim();
        let text = if trimmed.is_empty() {
            self.default_query.clone()
        } else {
            String::from(trimmed)
        };
        SearchQuery {
            text,
            year: parse_year(&self.year_input),
            kind: self.kind,
        }
    }

    /// Current rating bounds, defaulting unusable input per side.
    #[must_use]
    pub fn rating_bounds(&self) -> RatingBounds {
        RatingBounds::from_inputs(&self.rating_min_input, &self.rating_max_input)
    }

    /// Appends a character to the active input. Non-digits are ignored
    /// in the year field; rating fields take digits and one dot.
    pub fn edit_push(&mut self, c: char, now: Instant) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::Query => {
                self.query_input.push(c);
                self.schedule_search(now);
            }
            InputMode::Year => {
                if c.is_ascii_digit() && self.year_input.len() < 4 {
                    self.year_input.push(c);
                    self.schedule_search(now);
                }
            }
            InputMode::RatingMin => {
                if rating_char_ok(&self.rating_min_input, c) {
                    self.rating_min_input.push(c);
                    self.rating_debounce.schedule(now);
                }
            }
            InputMode::RatingMax => {
                if rating_char_ok(&self.rating_max_input, c) {
                    self.rating_max_input.push(c);
                    self.rating_debounce.schedule(now);
                }
            }
        }
    }

    /// Removes the last character from the active input.
    pub fn edit_pop(&mut self, now: Instant) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::Query => {
                if self.query_input.pop().is_some() {
                    self.schedule_search(now);
                }
            }
            InputMode::Year => {
                if self.year_input.pop().is_some() {
                    self.schedule_search(now);
                }
            }
            InputMode::RatingMin => {
                if self.rating_min_input.pop().is_some() {
                    self.rating_debounce.schedule(now);
                }
            }
            InputMode::RatingMax => {
                if self.rating_max_input.pop().is_some() {
                    self.rating_debounce.schedule(now);
                }
            }
        }
    }

    /// Cycles the kind filter (all -> movie -> series -> episode -> all).
    /// A keypress is a committed choice, so the search fires immediately
    /// instead of going through the typing debouncer.
    pub fn cycle_kind(&mut self) -> Effect {
        self.kind = TitleKind::cycle(self.kind);
        self.session.page.reset();
        self.search_debounce.cancel();
        Effect::StartSearch
    }

    /// Requests a page change. Out-of-range requests are ignored.
    /// Returns the effect for the event loop.
    pub fn request_page(&mut self, delta: i32) -> Effect {
        if self.session.page.change_page(delta) {
            Effect::StartSearch
        } else {
            Effect::None
        }
    }

    /// Fires any due debouncer. A pending search wins over a pending
    /// re-filter since the fresh page gets filtered anyway.
    pub fn tick(&mut self, now: Instant) -> Effect {
        if self.search_debounce.fire_due(now) {
            self.rating_debounce.cancel();
            return Effect::StartSearch;
        }
        if self.rating_debounce.fire_due(now) {
            return Effect::Refilter;
        }
        Effect::None
    }

    /// Replaces the displayed rows and repositions the cursor.
    pub fn apply_movies(&mut self, movies: Vec<TitleDetail>) {
        self.movies = movies;
        self.loading = false;
        if self.movies.is_empty() {
            self.table_state.select(None);
            self.status = Some(MSG_NO_RESULTS);
        } else {
            let row = self
                .table_state
                .selected()
                .map_or(0, |i| i.min(self.movies.len().saturating_sub(1)));
            self.table_state.select(Some(row));
            self.status = None;
        }
    }

    /// Shows the fetch-failure message, keeping the displayed rows.
    pub const fn set_fetch_error(&mut self, message: &'static str) {
        self.loading = false;
        self.status = Some(message);
    }

    /// Moves the table cursor down.
    pub fn select_next(&mut self) {
        if self.movies.is_empty() {
            return;
        }
        let last = self.movies.len().saturating_sub(1);
        let next = self
            .table_state
            .selected()
            .map_or(0, |i| i.saturating_add(1).min(last));
        self.table_state.select(Some(next));
    }

    /// Moves the table cursor up.
    pub fn select_prev(&mut self) {
        if self.movies.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    /// Returns the movie under the cursor.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&TitleDetail> {
        self.movies.get(self.table_state.selected()?)
    }

    /// Opens the detail modal for the movie under the cursor. Opening
    /// while a modal is already up replaces it.
    pub fn open_modal(&mut self) {
        if let Some(movie) = self.selected_movie() {
            self.modal = Some(movie.clone());
        }
    }

    /// Closes the detail modal.
    pub fn dismiss_modal(&mut self) {
        self.modal = None;
    }

    /// Resets to page 1 and arms the search debouncer.
    fn schedule_search(&mut self, now: Instant) {
        self.session.page.reset();
        self.search_debounce.schedule(now);
    }
}

/// Parses the year filter. Out-of-range or non-numeric input means no
/// year constraint, matching the behavior of leaving the field empty.
fn parse_year(input: &str) -> Option<u16> {
    let year: u16 = input.trim().parse().ok()?;
    let current = u16::try_from(chrono::Utc::now().year()).unwrap_or(u16::MAX);
    (MIN_YEAR..=current).contains(&year).then_some(year)
}

/// A rating field takes digits plus at most one decimal point.
fn rating_char_ok(current: &str, c: char) -> bool {
    if current.len() >= 4 {
        return false;
    }
    c.is_ascii_digit() || (c == '.' && !current.contains('.'))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::arithmetic_side_effects)]

    use std::time::Duration;

    use super::*;

    fn make_state() -> BrowserState {
        BrowserState::new(&SearchConfig::default())
    }

    fn detail(id: &str, title: &str) -> TitleDetail {
        let json = format!(r#"{{"imdbID":"{id}","Title":"{title}","imdbRating":"7.0"}}"#);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_empty_query_falls_back_to_default() {
        // Arrange
        let mut state = make_state();
        state.query_input = String::from("   ");

        // Act
        let query = state.current_query();

        // Assert
        assert_eq!(query.text, "star");
        assert_eq!(query.year, None);
        assert_eq!(query.kind, None);
    }

    #[test]
    fn test_typed_query_wins_over_default() {
        // Arrange
        let mut state = make_state();
        state.query_input = String::from("  matrix ");

        // Act & Assert
        assert_eq!(state.current_query().text, "matrix");
    }

    #[test]
    fn test_typing_query_debounces_search() {
        // Arrange
        let mut state = make_state();
        state.input_mode = InputMode::Query;
        let start = Instant::now();

        // Act: keystrokes within the debounce window
        state.edit_push('s', start);
        state.edit_push('t', start + Duration::from_millis(200));

        // Assert: nothing fires early, one search after the window
        assert_eq!(state.tick(start + Duration::from_millis(400)), Effect::None);
        assert_eq!(
            state.tick(start + Duration::from_millis(701)),
            Effect::StartSearch
        );
        assert_eq!(state.tick(start + Duration::from_millis(702)), Effect::None);
    }

    #[test]
    fn test_rating_input_debounces_refilter() {
        // Arrange
        let mut state = make_state();
        state.input_mode = InputMode::RatingMin;
        let start = Instant::now();

        // Act
        state.edit_push('7', start);

        // Assert
        assert_eq!(state.tick(start + Duration::from_millis(100)), Effect::None);
        assert_eq!(
            state.tick(start + Duration::from_millis(301)),
            Effect::Refilter
        );
    }

    #[test]
    fn test_pending_search_cancels_pending_refilter() {
        // Arrange
        let mut state = make_state();
        let start = Instant::now();
        state.input_mode = InputMode::RatingMin;
        state.edit_push('7', start);
        state.input_mode = InputMode::Query;
        state.edit_push('a', start);

        // Act & Assert: the search fires and absorbs the refilter
        assert_eq!(
            state.tick(start + Duration::from_millis(501)),
            Effect::StartSearch
        );
        assert_eq!(state.tick(start + Duration::from_millis(502)), Effect::None);
    }

    #[test]
    fn test_year_field_rejects_non_digits() {
        // Arrange
        let mut state = make_state();
        state.input_mode = InputMode::Year;
        let now = Instant::now();

        // Act
        state.edit_push('1', now);
        state.edit_push('x', now);
        state.edit_push('9', now);
        state.edit_push('7', now);
        state.edit_push('7', now);
        state.edit_push('5', now); // fifth digit, rejected

        // Assert
        assert_eq!(state.year_input, "1977");
        assert_eq!(state.current_query().year, Some(1977));
    }

    #[test]
    fn test_parse_year_bounds() {
        // Assert
        assert_eq!(parse_year("1977"), Some(1977));
        assert_eq!(parse_year("1899"), None);
        assert_eq!(parse_year("9999"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("19x"), None);
    }

    #[test]
    fn test_rating_field_accepts_one_dot() {
        // Arrange
        let mut state = make_state();
        state.input_mode = InputMode::RatingMax;
        let now = Instant::now();

        // Act
        state.edit_push('8', now);
        state.edit_push('.', now);
        state.edit_push('.', now);
        state.edit_push('5', now);

        // Assert
        assert_eq!(state.rating_max_input, "8.5");
    }

    #[test]
    fn test_cycle_kind_full_loop() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        state.cycle_kind();
        assert_eq!(state.kind, Some(TitleKind::Movie));
        state.cycle_kind();
        assert_eq!(state.kind, Some(TitleKind::Series));
        state.cycle_kind();
        assert_eq!(state.kind, Some(TitleKind::Episode));
        state.cycle_kind();
        assert_eq!(state.kind, None);
    }

    #[test]
    fn test_cycle_kind_searches_without_debounce() {
        // Arrange: a pending typed search and a page past the first
        let mut state = make_state();
        state.session.page.set_total(50);
        assert!(state.session.page.change_page(2));
        state.input_mode = InputMode::Query;
        let start = Instant::now();
        state.edit_push('a', start);

        // Act
        let effect = state.cycle_kind();

        // Assert: fires now, from page 1, and the typed search is absorbed
        assert_eq!(effect, Effect::StartSearch);
        assert_eq!(state.session.page.current_page(), 1);
        assert_eq!(state.tick(start + Duration::from_millis(600)), Effect::None);
    }

    #[test]
    fn test_typing_resets_to_page_one() {
        // Arrange
        let mut state = make_state();
        state.session.page.set_total(50);
        assert!(state.session.page.change_page(3));
        state.input_mode = InputMode::Query;

        // Act
        state.edit_push('a', Instant::now());

        // Assert
        assert_eq!(state.session.page.current_page(), 1);
    }

    #[test]
    fn test_request_page_out_of_range_is_ignored() {
        // Arrange
        let mut state = make_state();
        state.session.page.set_total(10); // one page

        // Act & Assert
        assert_eq!(state.request_page(1), Effect::None);
        assert_eq!(state.request_page(-1), Effect::None);
    }

    #[test]
    fn test_apply_movies_positions_cursor() {
        // Arrange
        let mut state = make_state();

        // Act
        state.apply_movies(vec![detail("a", "Alpha"), detail("b", "Beta")]);

        // Assert
        assert_eq!(state.table_state.selected(), Some(0));
        assert_eq!(state.status, None);
    }

    #[test]
    fn test_apply_empty_shows_no_results() {
        // Arrange
        let mut state = make_state();
        state.apply_movies(vec![detail("a", "Alpha")]);

        // Act
        state.apply_movies(Vec::new());

        // Assert
        assert_eq!(state.table_state.selected(), None);
        assert_eq!(state.status, Some(MSG_NO_RESULTS));
    }

    #[test]
    fn test_cursor_clamped_when_list_shrinks() {
        // Arrange
        let mut state = make_state();
        state.apply_movies(vec![
            detail("a", "Alpha"),
            detail("b", "Beta"),
            detail("c", "Gamma"),
        ]);
        state.select_next();
        state.select_next();
        assert_eq!(state.table_state.selected(), Some(2));

        // Act
        state.apply_movies(vec![detail("a", "Alpha")]);

        // Assert
        assert_eq!(state.table_state.selected(), Some(0));
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        // Arrange
        let mut state = make_state();
        state.apply_movies(vec![detail("a", "Alpha"), detail("b", "Beta")]);

        // Act & Assert
        state.select_prev();
        assert_eq!(state.table_state.selected(), Some(0));
        state.select_next();
        state.select_next();
        assert_eq!(state.table_state.selected(), Some(1));
    }

    #[test]
    fn test_open_modal_replaces_previous() {
        // Arrange
        let mut state = make_state();
        state.apply_movies(vec![detail("a", "Alpha"), detail("b", "Beta")]);
        state.open_modal();
        assert_eq!(state.modal.as_ref().unwrap().imdb_id, "a");

        // Act: move and open again without dismissing
        state.select_next();
        state.open_modal();

        // Assert
        assert_eq!(state.modal.as_ref().unwrap().imdb_id, "b");

        state.dismiss_modal();
        assert!(state.modal.is_none());
    }
}
