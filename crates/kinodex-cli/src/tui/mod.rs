//! TUI module for the interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Network fetches run on
//! the [`worker::FetchWorker`] thread so the event loop never blocks.

/// Browser state types.
pub mod state;
mod ui;
/// Background fetch worker.
pub mod worker;

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use kinodex_api::omdb::{IMDB_TITLE_URL, OmdbClient};

use self::state::{BrowserState, Effect, InputMode};
use self::worker::{FetchRequest, FetchResponse, FetchWorker};
use crate::config::AppConfig;
use crate::session::filter::filter_by_rating;
use crate::session::search::{DetailsOutcome, MSG_FETCH_ERROR, PageOutcome};

/// Runs the movie browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup, the fetch worker, or event
/// handling fails.
pub fn run_browser(config: &AppConfig, client: OmdbClient) -> Result<()> {
    let worker = FetchWorker::spawn(client)?;
    let mut state = BrowserState::new(&config.search);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &worker);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    worker: &FetchWorker,
) -> Result<()> {
    // Populate the table with the default query right away.
    start_search(state, worker)?;

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        handle_responses(state, worker)?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let quit = match state.input_mode {
                InputMode::Normal => handle_normal_input(state, worker, key.code, key.modifiers)?,
                _ => handle_edit_input(state, key.code),
            };
            if quit {
                return Ok(());
            }
        }

        match state.tick(Instant::now()) {
            Effect::StartSearch => start_search(state, worker)?,
            Effect::Refilter => {
                // Rating changes re-filter what is already fetched.
                let movies =
                    filter_by_rating(&state.session.cached_movies(), state.rating_bounds());
                state.apply_movies(movies);
            }
            Effect::None => {}
        }
    }
}

/// Issues a list search for the current controls and page.
fn start_search(state: &mut BrowserState, worker: &FetchWorker) -> Result<()> {
    let epoch = state.session.begin_search();
    let params = state
        .current_query()
        .to_params(state.session.page.current_page());
    state.loading = true;
    worker.request(FetchRequest::Page { epoch, params })
}

/// Applies every response the worker has queued since last tick.
fn handle_responses(state: &mut BrowserState, worker: &FetchWorker) -> Result<()> {
    for response in worker.drain_responses() {
        match response {
            FetchResponse::Page { epoch, result } => {
                match state.session.accept_page(epoch, result) {
                    PageOutcome::Stale => {}
                    PageOutcome::Failed => state.set_fetch_error(MSG_FETCH_ERROR),
                    PageOutcome::NoMatches => state.apply_movies(Vec::new()),
                    PageOutcome::NeedDetails { ids } => {
                        if ids.is_empty() {
                            // Every hit already cached from an earlier page.
                            let movies = state.session.assemble(state.rating_bounds());
                            state.apply_movies(movies);
                        } else {
                            worker.request(FetchRequest::Details { epoch, ids })?;
                        }
                    }
                }
            }
            FetchResponse::Details { epoch, fetched } => {
                match state.session.accept_details(epoch, fetched) {
                    DetailsOutcome::Stale => {}
                    DetailsOutcome::Ready => {
                        let movies = state.session.assemble(state.rating_bounds());
                        state.apply_movies(movies);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Handles key input in normal mode. Returns `Ok(true)` to exit.
fn handle_normal_input(
    state: &mut BrowserState,
    worker: &FetchWorker,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Result<bool> {
    if state.modal.is_some() {
        match key {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Esc | KeyCode::Enter => state.dismiss_modal(),
            KeyCode::Char('o') => open_imdb_page(state),
            _ => {}
        }
        return Ok(false);
    }

    match key {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(),
        KeyCode::Left | KeyCode::Char('p') => {
            if state.request_page(-1) == Effect::StartSearch {
                start_search(state, worker)?;
            }
        }
        KeyCode::Right | KeyCode::Char('n') => {
            if state.request_page(1) == Effect::StartSearch {
                start_search(state, worker)?;
            }
        }
        KeyCode::Enter => state.open_modal(),
        KeyCode::Char('/') => state.input_mode = InputMode::Query,
        KeyCode::Char('y') => state.input_mode = InputMode::Year,
        KeyCode::Char('[') => state.input_mode = InputMode::RatingMin,
        KeyCode::Char(']') => state.input_mode = InputMode::RatingMax,
        KeyCode::Char('t') => {
            if state.cycle_kind() == Effect::StartSearch {
                start_search(state, worker)?;
            }
        }
        KeyCode::Char('o') => open_imdb_page(state),
        _ => {}
    }
    Ok(false)
}

/// Handles key input while editing a control. Returns `true` to exit.
fn handle_edit_input(state: &mut BrowserState, key: KeyCode) -> bool {
    let now = Instant::now();
    match key {
        KeyCode::Esc | KeyCode::Enter => state.input_mode = InputMode::Normal,
        KeyCode::Backspace => state.edit_pop(now),
        KeyCode::Char(c) => state.edit_push(c, now),
        _ => {}
    }
    false
}

/// Opens the IMDb page for the modal movie, or the one under the cursor.
fn open_imdb_page(state: &BrowserState) {
    let movie = state.modal.as_ref().or_else(|| state.selected_movie());
    let Some(movie) = movie else {
        return;
    };
    let url = format!("{IMDB_TITLE_URL}/{}/", movie.imdb_id);
    if let Err(err) = open::that(&url) {
        tracing::warn!(url = %url, error = %err, "failed to open browser");
    }
}
