//! Browse TUI main loop and fetch dispatch.
//!
//! The event loop is synchronous; every fetch runs as a spawned tokio
//! task that reports its `(generation, outcome)` over an mpsc channel
//! drained once per tick. Superseded outcomes are discarded by the
//! fetch slots, so a slow page-1 response can never overwrite page 2.

use std::io;
use std::sync::Arc;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviebox_api::tmdb::{LocalMovieDb, TmdbClient};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::filters::FilterState;
use super::state::{BrowseState, Effect, FetchOutcome, HomeSection, InputMode, Route};
use super::ui;
use crate::fetch::FetchFailure;

/// Runs the browse TUI.
///
/// Must be called from within a multi-thread tokio runtime: the loop
/// blocks its thread while spawned fetches run on the worker pool.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_browser(client: TmdbClient, initial_route: Route) -> Result<()> {
    let client = Arc::new(client);
    let (tx, rx) = mpsc::channel();
    let mut state = BrowseState::new(initial_route);
    let effects = state.initial_effects();
    dispatch(&client, &tx, effects);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &client, &tx, &rx);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowseState,
    client: &Arc<TmdbClient>,
    tx: &mpsc::Sender<FetchOutcome>,
    rx: &mpsc::Receiver<FetchOutcome>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        while let Ok(outcome) = rx.try_recv() {
            state.apply(outcome);
        }

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let effects = match state.input_mode {
                InputMode::SearchInput => handle_search_input(state, key.code),
                InputMode::GenreSelect | InputMode::YearSelect => {
                    handle_selector_input(state, key.code)
                }
                InputMode::Normal => {
                    if should_quit(key.code, key.modifiers) {
                        return Ok(());
                    }
                    handle_normal_input(state, key.code)
                }
            };
            dispatch(client, tx, effects);
        }
    }
}

/// Whether the key quits the browser.
fn should_quit(key: KeyCode, modifiers: KeyModifiers) -> bool {
    match key {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Handles key input while typing a search query.
fn handle_search_input(state: &mut BrowseState, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            Vec::new()
        }
        KeyCode::Enter => state.submit_search(),
        KeyCode::Backspace => {
            state.search_input.pop();
            Vec::new()
        }
        KeyCode::Char(c) => {
            state.search_input.push(c);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Handles key input inside the genre/year selector overlay.
fn handle_selector_input(state: &mut BrowseState, key: KeyCode) -> Vec<Effect> {
    let len = match state.input_mode {
        InputMode::GenreSelect => state
            .genres
            .ready()
            .map_or(1, |genres| genres.len().saturating_add(1)),
        InputMode::YearSelect => FilterState::year_choices().len().saturating_add(1),
        InputMode::Normal | InputMode::SearchInput => 1,
    };

    match key {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            Vec::new()
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.overlay_cursor = state.overlay_cursor.saturating_sub(1);
            Vec::new()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.overlay_cursor.saturating_add(1) < len {
                state.overlay_cursor = state.overlay_cursor.saturating_add(1);
            }
            Vec::new()
        }
        KeyCode::Enter => apply_selector(state),
        _ => Vec::new(),
    }
}

/// Applies the overlay selection at the cursor.
fn apply_selector(state: &mut BrowseState) -> Vec<Effect> {
    let cursor = state.overlay_cursor;
    let mode = state.input_mode;
    state.input_mode = InputMode::Normal;
    match mode {
        InputMode::GenreSelect => {
            if cursor == 0 {
                state.select_genre(None)
            } else {
                let genre_id = state
                    .genres
                    .ready()
                    .and_then(|genres| genres.get(cursor.saturating_sub(1)))
                    .map(|g| g.id);
                genre_id.map_or_else(Vec::new, |id| state.select_genre(Some(id)))
            }
        }
        InputMode::YearSelect => {
            if cursor == 0 {
                state.select_year(None)
            } else {
                let year = FilterState::year_choices()
                    .get(cursor.saturating_sub(1))
                    .copied();
                year.map_or_else(Vec::new, |y| state.select_year(Some(y)))
            }
        }
        InputMode::Normal | InputMode::SearchInput => Vec::new(),
    }
}

/// Handles key input in normal navigation mode.
fn handle_normal_input(state: &mut BrowseState, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_up();
            Vec::new()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_down();
            Vec::new()
        }
        KeyCode::Tab => {
            state.next_home_section();
            Vec::new()
        }
        KeyCode::Enter => state
            .selected_movie()
            .map(|movie| movie.id)
            .map_or_else(Vec::new, |id| state.navigate(Route::Details(id))),
        KeyCode::Esc => state.back(),
        KeyCode::Char('m') => state.navigate(Route::Movies),
        KeyCode::Char('/') => {
            state.input_mode = InputMode::SearchInput;
            Vec::new()
        }
        KeyCode::Char('r') => state.retry(),
        KeyCode::Char('o') => {
            open_movie_page(state);
            Vec::new()
        }
        KeyCode::Char('g') if on_list_route(state) => {
            state.overlay_cursor = genre_cursor(state);
            state.input_mode = InputMode::GenreSelect;
            Vec::new()
        }
        KeyCode::Char('y') if on_list_route(state) => {
            state.overlay_cursor = year_cursor(state);
            state.input_mode = InputMode::YearSelect;
            Vec::new()
        }
        KeyCode::Char('s') if on_list_route(state) => state.cycle_sort(),
        KeyCode::Left | KeyCode::Char('h') => state.page_prev(),
        KeyCode::Right | KeyCode::Char('l') => state.page_next(),
        KeyCode::Char('H') => state.page_first(),
        KeyCode::Char('L') => state.page_last(),
        _ => Vec::new(),
    }
}

/// Whether the current route shows the filter bar.
fn on_list_route(state: &BrowseState) -> bool {
    matches!(state.route(), Route::Movies | Route::Genre(_))
}

/// Overlay cursor seeded from the current genre selection.
fn genre_cursor(state: &BrowseState) -> usize {
    let Some(selected) = state.filters.effective_genre() else {
        return 0;
    };
    state
        .genres
        .ready()
        .and_then(|genres| genres.iter().position(|g| g.id == selected))
        .map_or(0, |pos| pos.saturating_add(1))
}

/// Overlay cursor seeded from the current year selection.
fn year_cursor(state: &BrowseState) -> usize {
    let Some(selected) = state.filters.selected_year else {
        return 0;
    };
    FilterState::year_choices()
        .iter()
        .position(|y| *y == selected)
        .map_or(0, |pos| pos.saturating_add(1))
}

/// Opens the TMDB page for the current movie.
fn open_movie_page(state: &BrowseState) {
    let movie_id = match state.route() {
        Route::Details(id) => Some(id),
        _ => state.selected_movie().map(|m| m.id),
    };
    if let Some(id) = movie_id {
        let _ = open::that(format!("https://www.themoviedb.org/movie/{id}"));
    }
}

/// Spawns one task per effect, reporting back over the channel.
fn dispatch(client: &Arc<TmdbClient>, tx: &mpsc::Sender<FetchOutcome>, effects: Vec<Effect>) {
    for effect in effects {
        let client = Arc::clone(client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = run_effect(&client, effect).await;
            // The loop may already have exited; a dead channel is fine.
            let _ = tx.send(outcome);
        });
    }
}

/// Runs one fetch and wraps it as an outcome.
async fn run_effect(client: &TmdbClient, effect: Effect) -> FetchOutcome {
    match effect {
        Effect::FetchGenres { generation } => FetchOutcome::Genres(
            generation,
            client.genres().await.map_err(|e| FetchFailure::from(&e)),
        ),
        Effect::FetchHome {
            section,
            generation,
        } => {
            let result = match section {
                HomeSection::Popular => client.popular(1).await,
                HomeSection::TopRated => client.top_rated(1).await,
                HomeSection::Upcoming => client.upcoming(1).await,
            };
            FetchOutcome::Home(
                section,
                generation,
                result.map_err(|e| FetchFailure::from(&e)),
            )
        }
        Effect::FetchMovies {
            generation,
            filter,
            page,
        } => FetchOutcome::Movies(
            generation,
            client
                .discover(&filter, page)
                .await
                .map_err(|e| FetchFailure::from(&e)),
        ),
        Effect::FetchSearch {
            generation,
            query,
            page,
        } => FetchOutcome::Search(
            generation,
            client
                .search(&query, page)
                .await
                .map_err(|e| FetchFailure::from(&e)),
        ),
        Effect::FetchDetails {
            generation,
            movie_id,
        } => FetchOutcome::Details(
            generation,
            client
                .movie_details(movie_id)
                .await
                .map_err(|e| FetchFailure::from(&e)),
        ),
        Effect::FetchRecommendations {
            generation,
            movie_id,
        } => FetchOutcome::Recommendations(
            generation,
            client
                .recommendations(movie_id, 1)
                .await
                .map_err(|e| FetchFailure::from(&e)),
        ),
    }
}
