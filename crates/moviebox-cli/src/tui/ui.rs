//! TUI rendering logic for the movie browser.

use moviebox_api::tmdb::{Movie, MovieDetails, MovieListPage, SizeTier, image_url_opt};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table, Wrap};

use super::filters::FilterState;
use super::pager::Pager;
use super::state::{BrowseState, HomeSection, InputMode, RAIL_LEN, Route};
use crate::fetch::{FetchFailure, FetchSlot, FetchState};

/// Formats a number with thousands separators (e.g. 946385 -> "946,385").
#[allow(clippy::arithmetic_side_effects)]
fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);

    // The dedicated cannot-connect screen replaces the whole route body.
    if let Some(failure) = state.credential_failure().cloned() {
        draw_cannot_connect(frame, chunks[1], &failure);
    } else {
        match state.route() {
            Route::Home => draw_home(frame, chunks[1], state),
            Route::Movies | Route::Genre(_) => draw_movie_list(frame, chunks[1], state),
            Route::Search => draw_search(frame, chunks[1], state),
            Route::Details(_) => draw_details(frame, chunks[1], state),
            Route::NotFound(id) => draw_not_found(frame, chunks[1], id),
        }
    }

    draw_footer(frame, chunks[2], state);

    match state.input_mode {
        InputMode::GenreSelect => draw_genre_overlay(frame, state),
        InputMode::YearSelect => draw_year_overlay(frame, state),
        InputMode::Normal | InputMode::SearchInput => {}
    }
}

/// Route label for the header.
fn route_title(state: &BrowseState) -> String {
    match state.route() {
        Route::Home => String::from("Home"),
        Route::Movies => String::from("Discover Movies"),
        Route::Genre(id) => state
            .genre_name(id)
            .map_or_else(|| format!("Genre {id}"), |name| format!("{name} Movies")),
        Route::Search => match &state.search_query {
            Some(query) => format!("Search: \"{query}\""),
            None => String::from("Search"),
        },
        Route::Details(_) => state
            .details
            .ready()
            .map_or_else(|| String::from("Details"), |d| d.title.clone()),
        Route::NotFound(_) => String::from("Not Found"),
    }
}

/// Draws the header with the route title and page position.
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let mut spans = vec![
        Span::styled(
            " moviebox ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(route_title(state)),
    ];
    if let Some(pager) = state.active_pager()
        && pager.total() > 0
    {
        spans.push(Span::raw(format!(
            "  (page {}/{})",
            pager.current(),
            pager.total()
        )));
    }

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Draws the three home rails, highlighting the focused one.
#[allow(clippy::indexing_slicing)]
fn draw_home(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (i, section) in HomeSection::ALL.into_iter().enumerate() {
        let focused = state.home_section == section;
        draw_home_rail(frame, chunks[i], state, section, focused);
    }
}

/// Draws one home rail.
fn draw_home_rail(
    frame: &mut Frame,
    area: Rect,
    state: &mut BrowseState,
    section: HomeSection,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", section.title()))
        .border_style(border_style);

    let slot = match section {
        HomeSection::Popular => &state.home_popular,
        HomeSection::TopRated => &state.home_top_rated,
        HomeSection::Upcoming => &state.home_upcoming,
    };
    match slot.state() {
        FetchState::Ready(page) => {
            if page.results.is_empty() {
                frame.render_widget(
                    Paragraph::new("No movies found").block(block),
                    area,
                );
                return;
            }
            let rows: Vec<Row> = page
                .results
                .iter()
                .take(RAIL_LEN)
                .map(movie_row)
                .collect();
            let table = Table::new(rows, movie_widths())
                .block(block)
                .row_highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );
            if focused {
                frame.render_stateful_widget(table, area, &mut state.home_table);
            } else {
                frame.render_widget(table, area);
            }
        }
        FetchState::Failed(failure) => draw_failure_in(frame, area, block, failure),
        FetchState::Idle | FetchState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
        }
    }
}

/// Draws the discover/genre list: filter bar, table, pagination.
#[allow(clippy::indexing_slicing)]
fn draw_movie_list(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // filter bar
            Constraint::Min(3),    // results
            Constraint::Length(3), // pagination
        ])
        .split(area);

    draw_filter_bar(frame, chunks[0], state);
    draw_results_table(
        frame,
        chunks[1],
        &state.movies,
        &mut state.movies_table,
        " Movies ",
    );
    draw_pagination(frame, chunks[2], &state.movies_pager);
}

/// Draws the filter bar summary line.
fn draw_filter_bar(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let filters: &FilterState = &state.filters;
    let genre_label = filters.effective_genre().map_or_else(
        || String::from("All Genres"),
        |id| {
            state
                .genre_name(id)
                .map_or_else(|| id.to_string(), String::from)
        },
    );
    let year_label = filters
        .selected_year
        .map_or_else(|| String::from("All Years"), |y| y.to_string());

    let line = Line::from(vec![
        Span::raw("Genre [g]: "),
        Span::styled(genre_label, Style::default().fg(Color::Yellow)),
        Span::raw("   Year [y]: "),
        Span::styled(year_label, Style::default().fg(Color::Yellow)),
        Span::raw("   Sort [s]: "),
        Span::styled(filters.sort_by.label(), Style::default().fg(Color::Yellow)),
    ]);
    let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Filters "));
    frame.render_widget(bar, area);
}

/// Draws the search view: input, table, pagination.
#[allow(clippy::indexing_slicing)]
fn draw_search(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // query input
            Constraint::Min(3),    // results
            Constraint::Length(3), // pagination
        ])
        .split(area);

    let input_style = if state.input_mode == InputMode::SearchInput {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.search_input.clone())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(input, chunks[0]);

    let title = match (&state.search_query, state.search.ready()) {
        (Some(query), Some(page)) => format!(
            " {} results for \"{query}\" ",
            fmt_num(u64::from(page.total_results))
        ),
        _ => String::from(" Results "),
    };
    if state.search_query.is_none() {
        let hint = Paragraph::new("Enter a search term to find movies")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(hint, chunks[1]);
    } else {
        draw_results_table(frame, chunks[1], &state.search, &mut state.search_table, &title);
    }
    draw_pagination(frame, chunks[2], &state.search_pager);
}

/// Draws a movie result table with loading/empty/failure states.
fn draw_results_table(
    frame: &mut Frame,
    area: Rect,
    slot: &FetchSlot<MovieListPage>,
    table_state: &mut ratatui::widgets::TableState,
    title: &str,
) {
    let block = Block::default().borders(Borders::ALL).title(String::from(title));
    match slot.state() {
        FetchState::Ready(page) => {
            if page.results.is_empty() {
                let empty = Paragraph::new("No movies found\nTry adjusting your filters")
                    .block(block);
                frame.render_widget(empty, area);
                return;
            }
            let header = Row::new(vec!["Title", "Year", "Rating", "Votes"])
                .style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .bottom_margin(1);
            let rows: Vec<Row> = page.results.iter().map(movie_row).collect();
            let table = Table::new(rows, movie_widths())
                .header(header)
                .block(block)
                .row_highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );
            frame.render_stateful_widget(table, area, table_state);
        }
        FetchState::Failed(failure) => draw_failure_in(frame, area, block, failure),
        FetchState::Idle | FetchState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
        }
    }
}

/// A table row for one movie.
fn movie_row(movie: &Movie) -> Row<'_> {
    Row::new(vec![
        movie.title.clone(),
        movie
            .release_year()
            .map_or_else(|| String::from("--"), String::from),
        format!("{:.1}", movie.vote_average),
        fmt_num(u64::from(movie.vote_count)),
    ])
}

/// Column widths shared by all movie tables.
const fn movie_widths() -> [Constraint; 4] {
    [
        Constraint::Min(30),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(10),
    ]
}

/// Draws the windowed pagination bar.
fn draw_pagination(frame: &mut Frame, area: Rect, pager: &Pager) {
    let window = pager.window();
    if window.is_empty() {
        // Single page: nothing to paginate.
        frame.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    }

    let enabled = Style::default();
    let disabled = Style::default().fg(Color::DarkGray);
    let current = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let prev_style = if pager.has_prev() { enabled } else { disabled };
    let next_style = if pager.has_next() { enabled } else { disabled };

    let mut spans = vec![
        Span::styled("\u{ab} First [H] ", prev_style),
        Span::styled("\u{2039} Prev [h] ", prev_style),
    ];
    for page in window {
        let style = if page == pager.current() { current } else { enabled };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::styled(" Next [l] \u{203a}", next_style));
    spans.push(Span::styled(" Last [L] \u{bb}", next_style));

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Pages "));
    frame.render_widget(bar, area);
}

/// Draws the details view: metadata plus recommendations.
#[allow(clippy::indexing_slicing)]
fn draw_details(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(9)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title(" Details ");
    match state.details.state() {
        FetchState::Ready(details) => {
            let text = details_lines(details);
            let body = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
            frame.render_widget(body, chunks[0]);
        }
        FetchState::Failed(failure) => draw_failure_in(frame, chunks[0], block, failure),
        FetchState::Idle | FetchState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), chunks[0]);
        }
    }

    draw_recommendations(frame, chunks[1], state);
}

/// Metadata lines for the details body.
fn details_lines(details: &MovieDetails) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let year = details
        .release_date
        .as_deref()
        .and_then(|d| d.get(..4))
        .unwrap_or("----");
    lines.push(Line::from(Span::styled(
        format!("{} ({year})", details.title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(
            String::from(tagline),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::default());

    let genres = details
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let runtime = details
        .formatted_runtime()
        .unwrap_or_else(|| String::from("N/A"));
    lines.push(Line::from(format!(
        "\u{2605} {:.1} ({} votes)   {runtime}   {genres}",
        details.vote_average,
        fmt_num(u64::from(details.vote_count)),
    )));
    lines.push(Line::default());

    if let Some(overview) = details.overview.as_deref() {
        lines.push(Line::from(String::from(overview)));
        lines.push(Line::default());
    }

    let cast = details
        .cast()
        .iter()
        .take(5)
        .map(|member| format!("{} as {}", member.name, member.character))
        .collect::<Vec<_>>()
        .join(", ");
    if !cast.is_empty() {
        lines.push(Line::from(format!("Cast: {cast}")));
    }
    if let Some(trailer) = details.trailer() {
        lines.push(Line::from(format!(
            "Trailer: https://www.youtube.com/watch?v={}",
            trailer.key
        )));
    }
    if let Some(poster) = image_url_opt(details.poster_path.as_deref(), SizeTier::Large) {
        lines.push(Line::from(format!("Poster: {poster}")));
    }

    lines
}

/// Draws the recommendations rail below the details.
fn draw_recommendations(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recommended ");
    match state.recommendations.state() {
        FetchState::Ready(page) => {
            if page.results.is_empty() {
                frame.render_widget(Paragraph::new("No recommendations").block(block), area);
                return;
            }
            let rows: Vec<Row> = page
                .results
                .iter()
                .take(RAIL_LEN)
                .map(movie_row)
                .collect();
            let table = Table::new(rows, movie_widths())
                .block(block)
                .row_highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );
            frame.render_stateful_widget(table, area, &mut state.recs_table);
        }
        FetchState::Failed(failure) => draw_failure_in(frame, area, block, failure),
        FetchState::Idle | FetchState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
        }
    }
}

/// Draws the unknown-genre fallback.
fn draw_not_found(frame: &mut Frame, area: Rect, id: u32) {
    let text = vec![
        Line::from(Span::styled(
            "Genre not found",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(format!("No genre with id {id} exists.")),
        Line::from("Press Esc to go back or m for the movie list."),
    ];
    let body = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

/// Draws the generic retryable failure inside a block.
fn draw_failure_in(frame: &mut Frame, area: Rect, block: Block<'_>, failure: &FetchFailure) {
    let text = vec![
        Line::from(Span::styled(
            "Failed to load movies. Please try again later.",
            Style::default().fg(Color::Red),
        )),
        Line::default(),
        Line::from(failure.message.clone()),
        Line::default(),
        Line::from("Press r to retry."),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }).block(block), area);
}

/// Draws the dedicated cannot-connect screen.
fn draw_cannot_connect(frame: &mut Frame, area: Rect, failure: &FetchFailure) {
    let text = vec![
        Line::from(Span::styled(
            "API Connection Error",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("We couldn't connect to the movie database. This could be because:"),
        Line::from("  - The API key is missing from your configuration"),
        Line::from("  - The API key is invalid or has expired"),
        Line::from("  - There's a network issue connecting to the API"),
        Line::default(),
        Line::from(failure.message.clone()),
        Line::default(),
        Line::from("To fix this:"),
        Line::from("  1. Get an API key at https://www.themoviedb.org/settings/api"),
        Line::from("  2. Set TMDB_API_KEY, or add `key` under [api] in config.toml"),
        Line::from("  3. Press r to retry"),
    ];
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Cannot Connect "));
    frame.render_widget(body, area);
}

/// Draws the footer key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let hints = match state.input_mode {
        InputMode::SearchInput => "Type query | Enter: search | Esc: cancel",
        InputMode::GenreSelect | InputMode::YearSelect => {
            "\u{2191}\u{2193}/j/k: move | Enter: apply | Esc: cancel"
        }
        InputMode::Normal => match state.route() {
            Route::Home => {
                "\u{2191}\u{2193}/j/k: move  Tab: section  Enter: details  m: movies  /: search  q: quit"
            }
            Route::Movies | Route::Genre(_) => {
                "\u{2191}\u{2193}: move  h/l/H/L: pages  g/y/s: filters  Enter: details  o: open  Esc: back  q: quit"
            }
            Route::Search => {
                "\u{2191}\u{2193}: move  h/l/H/L: pages  /: edit query  Enter: details  Esc: back  q: quit"
            }
            Route::Details(_) => {
                "\u{2191}\u{2193}: move  Enter: open recommendation  o: open in browser  Esc: back  q: quit"
            }
            Route::NotFound(_) => "Esc: back  m: movies  q: quit",
        },
    };

    let footer = Paragraph::new(hints).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Centered popup rect.
#[allow(clippy::indexing_slicing)]
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Draws a selector overlay list with the cursor highlighted.
fn draw_selector(frame: &mut Frame, title: &str, items: &[String], cursor: usize) {
    let area = popup_area(frame.area(), 36, 16);
    frame.render_widget(ratatui::widgets::Clear, area);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if i == cursor {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(label.clone(), style))
        })
        .collect();

    let list = List::new(list_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(String::from(title)),
    );
    frame.render_widget(list, area);
}

/// Draws the genre selector overlay.
fn draw_genre_overlay(frame: &mut Frame, state: &BrowseState) {
    let mut items = vec![String::from("All Genres")];
    if let Some(genres) = state.genres.ready() {
        items.extend(genres.iter().map(|g| g.name.clone()));
    }
    draw_selector(frame, " Genre ", &items, state.overlay_cursor);
}

/// Draws the year selector overlay.
fn draw_year_overlay(frame: &mut Frame, state: &BrowseState) {
    let mut items = vec![String::from("All Years")];
    items.extend(FilterState::year_choices().iter().map(ToString::to_string));
    draw_selector(frame, " Release Year ", &items, state.overlay_cursor);
}
