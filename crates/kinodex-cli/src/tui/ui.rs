//! TUI rendering logic for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use kinodex_api::omdb::{NOT_AVAILABLE, TitleDetail};

use super::state::{BrowserState, InputMode};

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // controls
            Constraint::Min(5),    // result table
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_controls(frame, chunks[0], state);
    draw_results(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);

    if state.modal.is_some() {
        draw_modal(frame, state);
    }
}

/// Highlights the border of whichever control is being edited.
fn control_style(state: &BrowserState, mode: InputMode) -> Style {
    if state.input_mode == mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Draws the control row: query, year, kind, and rating bounds.
#[allow(clippy::indexing_slicing)]
fn draw_controls(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Length(9),
        ])
        .split(area);

    let query = Paragraph::new(state.query_input.as_str())
        .style(control_style(state, InputMode::Query))
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(query, chunks[0]);

    let year = Paragraph::new(state.year_input.as_str())
        .style(control_style(state, InputMode::Year))
        .block(Block::default().borders(Borders::ALL).title(" Year: y "));
    frame.render_widget(year, chunks[1]);

    let kind_label = state.kind.map_or("all", |k| k.as_query_value());
    let kind = Paragraph::new(kind_label)
        .block(Block::default().borders(Borders::ALL).title(" Type: t "));
    frame.render_widget(kind, chunks[2]);

    let min = Paragraph::new(state.rating_min_input.as_str())
        .style(control_style(state, InputMode::RatingMin))
        .block(Block::default().borders(Borders::ALL).title(" Min: [ "));
    frame.render_widget(min, chunks[3]);

    let max = Paragraph::new(state.rating_max_input.as_str())
        .style(control_style(state, InputMode::RatingMax))
        .block(Block::default().borders(Borders::ALL).title(" Max: ] "));
    frame.render_widget(max, chunks[4]);
}

/// Draws the result table, or the status message when there is nothing
/// to show.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let title = if state.loading {
        " Movies (loading...) "
    } else {
        " Movies "
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if state.movies.is_empty() {
        let text = state.status.unwrap_or("");
        let message = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let header = Row::new(vec!["Title", "Year", "Type", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .movies
        .iter()
        .map(|m| {
            Row::new(vec![
                m.title.clone(),
                String::from(display_field(&m.year)),
                String::from(display_field(&m.kind)),
                String::from(display_field(&m.imdb_rating)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the footer with the page indicator and key hints. A pending
/// status message takes the hint slot so a fetch failure stays visible
/// even while earlier rows are still on screen.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let summary = state.session.page.summary();
    let prev = if summary.prev_enabled { "p" } else { "-" };
    let next = if summary.next_enabled { "n" } else { "-" };
    let page_text = format!(
        " Page {} of {}  [{prev}/{next}] ",
        summary.current_page, summary.total_pages
    );

    let hints = if state.modal.is_some() {
        "Esc: close  o: open IMDb  q: quit"
    } else if state.input_mode == InputMode::Normal {
        "\u{2191}\u{2193}/j/k: move  Enter: details  p/n: page  /: search  y: year  t: type  [/]: rating  o: IMDb  q: quit"
    } else {
        "Type to edit | Esc/Enter: done"
    };

    // With no rows the result area already shows the message.
    let trailing = match state.status {
        Some(status) if !state.movies.is_empty() => {
            Span::styled(status, Style::default().fg(Color::Red))
        }
        _ => Span::raw(hints),
    };

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(page_text, Style::default().add_modifier(Modifier::BOLD)),
        trailing,
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the detail modal over the table.
fn draw_modal(frame: &mut Frame, state: &BrowserState) {
    let Some(movie) = state.modal.as_ref() else {
        return;
    };

    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let lines = detail_lines(movie);
    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", movie.title)),
    );
    frame.render_widget(popup, area);
}

/// Builds the labelled field list for the detail modal.
fn detail_lines(movie: &TitleDetail) -> Vec<Line<'_>> {
    let label_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{label:<11}"), label_style),
            Span::raw(String::from(display_field(value))),
        ])
    };

    let mut lines = vec![
        field("Year", &movie.year),
        field("Type", &movie.kind),
        field("Rated", &movie.rated),
        field("Rating", &movie.imdb_rating),
        field("Votes", &movie.imdb_votes),
        field("Genre", &movie.genre),
        field("Director", &movie.director),
        field("Writer", &movie.writer),
        field("Actors", &movie.actors),
        field("Runtime", &movie.runtime),
        field("Released", &movie.released),
        field("Box Office", movie.box_office.as_deref().unwrap_or(NOT_AVAILABLE)),
        field("Awards", &movie.awards),
        field("Poster", movie.poster_url().unwrap_or("")),
        Line::from(""),
    ];
    lines.push(Line::from(Span::raw(movie.plot.clone())));
    lines
}

/// Replaces the `"N/A"` sentinel (and empty strings) with a dash.
fn display_field(value: &str) -> &str {
    if value.is_empty() || value == NOT_AVAILABLE {
        "-"
    } else {
        value
    }
}

/// Centers a rect of the given percentage size inside `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = area.height.saturating_mul(percent_y) / 100;
    let x = area.x.saturating_add(area.width.saturating_sub(width) / 2);
    let y = area.y.saturating_add(area.height.saturating_sub(height) / 2);
    Rect::new(x, y, width, height)
}
