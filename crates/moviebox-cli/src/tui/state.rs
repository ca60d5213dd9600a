//! Browse TUI state management.

use moviebox_api::tmdb::{DiscoverFilter, Genre, Movie, MovieDetails, MovieListPage};
use ratatui::widgets::TableState;

use super::filters::FilterState;
use super::pager::Pager;
use crate::fetch::{FetchFailure, FetchSlot};

/// A client-visible route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing view with popular/top-rated/upcoming rails.
    Home,
    /// Unscoped discovery list.
    Movies,
    /// Discovery list scoped to a genre.
    Genre(u32),
    /// Text search results.
    Search,
    /// Single movie details.
    Details(u64),
    /// Unknown genre id fallback.
    NotFound(u32),
}

/// Rail on the home view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSection {
    /// Popular movies.
    Popular,
    /// Top-rated movies.
    TopRated,
    /// Upcoming releases.
    Upcoming,
}

impl HomeSection {
    /// Rails in display order.
    pub const ALL: [Self; 3] = [Self::Popular, Self::TopRated, Self::Upcoming];

    /// Section heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Popular => "Popular Movies",
            Self::TopRated => "Top Rated Movies",
            Self::Upcoming => "Upcoming Releases",
        }
    }
}

/// Input mode for the browse TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    SearchInput,
    /// Genre selector overlay.
    GenreSelect,
    /// Year selector overlay.
    YearSelect,
}

/// A fetch the event loop must dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the genre list.
    FetchGenres {
        /// Generation to echo back.
        generation: u64,
    },
    /// Load one home rail.
    FetchHome {
        /// Which rail.
        section: HomeSection,
        /// Generation to echo back.
        generation: u64,
    },
    /// Run a discovery query for the movies view.
    FetchMovies {
        /// Generation to echo back.
        generation: u64,
        /// Composed filter.
        filter: DiscoverFilter,
        /// Page to request.
        page: u32,
    },
    /// Run a text search.
    FetchSearch {
        /// Generation to echo back.
        generation: u64,
        /// Submitted query.
        query: String,
        /// Page to request.
        page: u32,
    },
    /// Load movie details.
    FetchDetails {
        /// Generation to echo back.
        generation: u64,
        /// Movie id.
        movie_id: u64,
    },
    /// Load recommendations for a movie.
    FetchRecommendations {
        /// Generation to echo back.
        generation: u64,
        /// Movie id.
        movie_id: u64,
    },
}

/// A completed fetch delivered back to the state.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Genre list result.
    Genres(u64, Result<Vec<Genre>, FetchFailure>),
    /// Home rail result.
    Home(HomeSection, u64, Result<MovieListPage, FetchFailure>),
    /// Movies view result.
    Movies(u64, Result<MovieListPage, FetchFailure>),
    /// Search result.
    Search(u64, Result<MovieListPage, FetchFailure>),
    /// Details result.
    Details(u64, Result<MovieDetails, FetchFailure>),
    /// Recommendations result.
    Recommendations(u64, Result<MovieListPage, FetchFailure>),
}

/// State for the browse TUI.
pub struct BrowseState {
    /// Current route.
    route: Route,
    /// Routes to return to on Esc.
    back_stack: Vec<Route>,
    /// Current input mode.
    pub input_mode: InputMode,

    /// Genre catalog (fetched once per session).
    pub genres: FetchSlot<Vec<Genre>>,

    /// Home: popular rail.
    pub home_popular: FetchSlot<MovieListPage>,
    /// Home: top-rated rail.
    pub home_top_rated: FetchSlot<MovieListPage>,
    /// Home: upcoming rail.
    pub home_upcoming: FetchSlot<MovieListPage>,
    /// Home: focused rail.
    pub home_section: HomeSection,
    /// Home: cursor within the focused rail.
    pub home_table: TableState,

    /// Movies view results.
    pub movies: FetchSlot<MovieListPage>,
    /// Movies view pagination.
    pub movies_pager: Pager,
    /// Movies view filter selections.
    pub filters: FilterState,
    /// Movies view cursor.
    pub movies_table: TableState,

    /// Search input buffer.
    pub search_input: String,
    /// Last submitted query.
    pub search_query: Option<String>,
    /// Search results.
    pub search: FetchSlot<MovieListPage>,
    /// Search pagination.
    pub search_pager: Pager,
    /// Search cursor.
    pub search_table: TableState,

    /// Details view data.
    pub details: FetchSlot<MovieDetails>,
    /// Recommendations below the details.
    pub recommendations: FetchSlot<MovieListPage>,
    /// Recommendations cursor.
    pub recs_table: TableState,

    /// Cursor within the genre/year selector overlay.
    pub overlay_cursor: usize,
}

impl BrowseState {
    /// Creates the initial state for a route.
    #[must_use]
    pub fn new(initial_route: Route) -> Self {
        let route_genre = match initial_route {
            Route::Genre(id) => Some(id),
            _ => None,
        };
        Self {
            route: initial_route,
            back_stack: Vec::new(),
            input_mode: InputMode::Normal,
            genres: FetchSlot::new(),
            home_popular: FetchSlot::new(),
            home_top_rated: FetchSlot::new(),
            home_upcoming: FetchSlot::new(),
            home_section: HomeSection::Popular,
            home_table: TableState::default(),
            movies: FetchSlot::new(),
            movies_pager: Pager::new(0),
            filters: FilterState::new(route_genre),
            movies_table: TableState::default(),
            search_input: String::new(),
            search_query: None,
            search: FetchSlot::new(),
            search_pager: Pager::new(0),
            search_table: TableState::default(),
            details: FetchSlot::new(),
            recommendations: FetchSlot::new(),
            recs_table: TableState::default(),
            overlay_cursor: 0,
        }
    }

    /// Current route.
    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    /// Fetches to dispatch when the TUI starts.
    pub fn initial_effects(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::FetchGenres {
            generation: self.genres.begin(),
        }];
        effects.extend(self.load_route());
        effects
    }

    /// Navigates to a route, remembering the current one for Esc.
    pub fn navigate(&mut self, route: Route) -> Vec<Effect> {
        if route == self.route {
            return Vec::new();
        }
        self.back_stack.push(self.route);
        self.enter_route(route)
    }

    /// Returns to the previous route, refetching its data.
    ///
    /// Restoring keeps the filter and page position; only the route-scoped
    /// genre is re-derived from the route itself.
    pub fn back(&mut self) -> Vec<Effect> {
        let Some(route) = self.back_stack.pop() else {
            return Vec::new();
        };
        self.route = route;
        self.filters.route_genre = match route {
            Route::Genre(id) => Some(id),
            _ => None,
        };
        self.load_route()
    }

    /// Switches the route and issues its fetches.
    fn enter_route(&mut self, route: Route) -> Vec<Effect> {
        self.route = route;
        if let Route::Genre(id) = route {
            // Entering a genre-scoped route resets the filter bar around
            // that genre, like remounting the page.
            self.filters = FilterState::new(Some(id));
            self.movies_pager.reset();
            if self.genre_is_unknown(id) {
                self.route = Route::NotFound(id);
                return Vec::new();
            }
        }
        if route == Route::Movies {
            self.filters = FilterState::new(None);
            self.movies_pager.reset();
        }
        self.load_route()
    }

    /// Issues the fetches the current route needs.
    fn load_route(&mut self) -> Vec<Effect> {
        match self.route {
            Route::Home => {
                self.home_table.select(Some(0));
                vec![
                    Effect::FetchHome {
                        section: HomeSection::Popular,
                        generation: self.home_popular.begin(),
                    },
                    Effect::FetchHome {
                        section: HomeSection::TopRated,
                        generation: self.home_top_rated.begin(),
                    },
                    Effect::FetchHome {
                        section: HomeSection::Upcoming,
                        generation: self.home_upcoming.begin(),
                    },
                ]
            }
            Route::Movies | Route::Genre(_) => vec![self.begin_movies_fetch()],
            Route::Search => match self.search_query.clone() {
                Some(query) => vec![self.begin_search_fetch(&query)],
                None => Vec::new(),
            },
            Route::Details(movie_id) => vec![
                Effect::FetchDetails {
                    generation: self.details.begin(),
                    movie_id,
                },
                Effect::FetchRecommendations {
                    generation: self.recommendations.begin(),
                    movie_id,
                },
            ],
            Route::NotFound(_) => Vec::new(),
        }
    }

    /// Starts a movies-view fetch for the current filter and page.
    fn begin_movies_fetch(&mut self) -> Effect {
        self.movies_table.select(Some(0));
        Effect::FetchMovies {
            generation: self.movies.begin(),
            filter: self.filters.compose(),
            page: self.movies_pager.current(),
        }
    }

    /// Starts a search fetch for the current query and page.
    fn begin_search_fetch(&mut self, query: &str) -> Effect {
        self.search_table.select(Some(0));
        Effect::FetchSearch {
            generation: self.search.begin(),
            query: String::from(query),
            page: self.search_pager.current(),
        }
    }

    /// Manual retry of the current route's fetches.
    pub fn retry(&mut self) -> Vec<Effect> {
        self.load_route()
    }

    /// Applies a completed fetch, discarding stale generations.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Genres(generation, result) => {
                self.genres.settle(generation, result);
                // A pre-scoped route may now turn out to be unknown.
                if let Route::Genre(id) = self.route
                    && self.genre_is_unknown(id)
                {
                    self.route = Route::NotFound(id);
                }
            }
            FetchOutcome::Home(section, generation, result) => {
                let slot = match section {
                    HomeSection::Popular => &mut self.home_popular,
                    HomeSection::TopRated => &mut self.home_top_rated,
                    HomeSection::Upcoming => &mut self.home_upcoming,
                };
                slot.settle(generation, result);
            }
            FetchOutcome::Movies(generation, result) => {
                if self.movies.settle(generation, result)
                    && let Some(page) = self.movies.ready()
                {
                    self.movies_pager.set_total(page.clamped_total_pages());
                }
            }
            FetchOutcome::Search(generation, result) => {
                if self.search.settle(generation, result)
                    && let Some(page) = self.search.ready()
                {
                    self.search_pager.set_total(page.clamped_total_pages());
                }
            }
            FetchOutcome::Details(generation, result) => {
                self.details.settle(generation, result);
            }
            FetchOutcome::Recommendations(generation, result) => {
                self.recommendations.settle(generation, result);
            }
        }
    }

    /// Whether the genre catalog is loaded and does not contain `id`.
    fn genre_is_unknown(&self, id: u32) -> bool {
        self.genres
            .ready()
            .is_some_and(|genres| !genres.iter().any(|g| g.id == id))
    }

    /// Display name for a genre id, once the catalog is loaded.
    #[must_use]
    pub fn genre_name(&self, id: u32) -> Option<&str> {
        self.genres
            .ready()?
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }

    // --- Filter changes (all reset pagination to page 1) ---

    /// Applies a genre selection. Also navigates: a genre moves to its
    /// scoped route, clearing moves back to the unscoped list.
    pub fn select_genre(&mut self, genre: Option<u32>) -> Vec<Effect> {
        match genre {
            Some(id) => self.navigate(Route::Genre(id)),
            None => {
                if self.route == Route::Movies {
                    // Already unscoped: just clear the selector.
                    self.filters.selected_genre = None;
                    self.movies_pager.reset();
                    vec![self.begin_movies_fetch()]
                } else {
                    self.navigate(Route::Movies)
                }
            }
        }
    }

    /// Applies a year selection and refetches from page 1.
    pub fn select_year(&mut self, year: Option<u32>) -> Vec<Effect> {
        self.filters.selected_year = year;
        self.movies_pager.reset();
        vec![self.begin_movies_fetch()]
    }

    /// Advances the sort order and refetches from page 1.
    pub fn cycle_sort(&mut self) -> Vec<Effect> {
        self.filters.cycle_sort();
        self.movies_pager.reset();
        vec![self.begin_movies_fetch()]
    }

    // --- Search ---

    /// Submits the search input. Blank input clears the results.
    pub fn submit_search(&mut self) -> Vec<Effect> {
        self.input_mode = InputMode::Normal;
        let query = self.search_input.trim();
        if query.is_empty() {
            self.search_query = None;
            self.search.reset();
            self.search_pager = Pager::new(0);
            return Vec::new();
        }
        let query = String::from(query);
        self.search_query = Some(query.clone());
        self.search_pager.reset();
        let mut effects = if self.route == Route::Search {
            Vec::new()
        } else {
            self.navigate(Route::Search)
        };
        if effects.is_empty() {
            effects.push(self.begin_search_fetch(&query));
        }
        effects
    }

    // --- Pagination (movies and search views) ---

    /// Moves to the first page of the current list view.
    pub fn page_first(&mut self) -> Vec<Effect> {
        self.page_transition(|p| p.first())
    }

    /// Moves one page back.
    pub fn page_prev(&mut self) -> Vec<Effect> {
        self.page_transition(|p| p.prev())
    }

    /// Moves one page forward.
    pub fn page_next(&mut self) -> Vec<Effect> {
        self.page_transition(|p| p.next())
    }

    /// Moves to the last page.
    pub fn page_last(&mut self) -> Vec<Effect> {
        self.page_transition(|p| p.last())
    }

    /// Runs a pager transition for the current route; a changed page
    /// triggers a refetch.
    fn page_transition(&mut self, transition: impl Fn(&mut Pager) -> bool) -> Vec<Effect> {
        match self.route {
            Route::Movies | Route::Genre(_) => {
                if transition(&mut self.movies_pager) {
                    vec![self.begin_movies_fetch()]
                } else {
                    Vec::new()
                }
            }
            Route::Search => {
                let Some(query) = self.search_query.clone() else {
                    return Vec::new();
                };
                if transition(&mut self.search_pager) {
                    vec![self.begin_search_fetch(&query)]
                } else {
                    Vec::new()
                }
            }
            Route::Home | Route::Details(_) | Route::NotFound(_) => Vec::new(),
        }
    }

    // --- Cursor movement ---

    /// Length of the list under the cursor for the current route.
    fn active_list_len(&self) -> usize {
        match self.route {
            Route::Home => self
                .home_slot(self.home_section)
                .ready()
                .map_or(0, |page| page.results.len().min(RAIL_LEN)),
            Route::Movies | Route::Genre(_) => {
                self.movies.ready().map_or(0, |page| page.results.len())
            }
            Route::Search => self.search.ready().map_or(0, |page| page.results.len()),
            Route::Details(_) => self
                .recommendations
                .ready()
                .map_or(0, |page| page.results.len().min(RAIL_LEN)),
            Route::NotFound(_) => 0,
        }
    }

    /// Table state under the cursor for the current route.
    fn active_table(&mut self) -> Option<&mut TableState> {
        match self.route {
            Route::Home => Some(&mut self.home_table),
            Route::Movies | Route::Genre(_) => Some(&mut self.movies_table),
            Route::Search => Some(&mut self.search_table),
            Route::Details(_) => Some(&mut self.recs_table),
            Route::NotFound(_) => None,
        }
    }

    /// Moves the cursor up.
    pub fn move_up(&mut self) {
        if let Some(table) = self.active_table() {
            let current = table.selected().unwrap_or(0);
            if current > 0 {
                table.select(Some(current.saturating_sub(1)));
            }
        }
    }

    /// Moves the cursor down.
    pub fn move_down(&mut self) {
        let len = self.active_list_len();
        if let Some(table) = self.active_table() {
            let current = table.selected().unwrap_or(0);
            if current.saturating_add(1) < len {
                table.select(Some(current.saturating_add(1)));
            }
        }
    }

    /// Switches to the next home rail.
    pub fn next_home_section(&mut self) {
        if self.route != Route::Home {
            return;
        }
        let position = HomeSection::ALL
            .iter()
            .position(|s| *s == self.home_section)
            .unwrap_or(0);
        let next = HomeSection::ALL
            .get(position.saturating_add(1))
            .copied()
            .unwrap_or(HomeSection::Popular);
        self.home_section = next;
        self.home_table.select(Some(0));
    }

    /// Slot backing a home rail.
    #[must_use]
    pub const fn home_slot(&self, section: HomeSection) -> &FetchSlot<MovieListPage> {
        match section {
            HomeSection::Popular => &self.home_popular,
            HomeSection::TopRated => &self.home_top_rated,
            HomeSection::Upcoming => &self.home_upcoming,
        }
    }

    /// The movie under the cursor, if any.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        match self.route {
            Route::Home => {
                let page = self.home_slot(self.home_section).ready()?;
                let index = self.home_table.selected()?;
                page.results.get(index)
            }
            Route::Movies | Route::Genre(_) => {
                let page = self.movies.ready()?;
                page.results.get(self.movies_table.selected()?)
            }
            Route::Search => {
                let page = self.search.ready()?;
                page.results.get(self.search_table.selected()?)
            }
            Route::Details(_) => {
                let page = self.recommendations.ready()?;
                page.results.get(self.recs_table.selected()?)
            }
            Route::NotFound(_) => None,
        }
    }

    /// Whether any slot on the current route holds a credential failure.
    #[must_use]
    pub fn credential_failure(&self) -> Option<&FetchFailure> {
        let slots: Vec<&FetchFailure> = match self.route {
            Route::Home => [
                self.home_popular.failure(),
                self.home_top_rated.failure(),
                self.home_upcoming.failure(),
            ]
            .into_iter()
            .flatten()
            .collect(),
            Route::Movies | Route::Genre(_) => self.movies.failure().into_iter().collect(),
            Route::Search => self.search.failure().into_iter().collect(),
            Route::Details(_) => self.details.failure().into_iter().collect(),
            Route::NotFound(_) => Vec::new(),
        };
        slots
            .into_iter()
            .find(|f| f.kind == crate::fetch::FailureKind::Credential)
    }

    /// Pager for the current route's list, if it has one.
    #[must_use]
    pub const fn active_pager(&self) -> Option<&Pager> {
        match self.route {
            Route::Movies | Route::Genre(_) => Some(&self.movies_pager),
            Route::Search => Some(&self.search_pager),
            Route::Home | Route::Details(_) | Route::NotFound(_) => None,
        }
    }
}

/// Rows shown per home/recommendations rail.
pub const RAIL_LEN: usize = 5;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use moviebox_api::tmdb::SortBy;

    use super::*;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: String::from(title),
            original_title: String::from(title),
            original_language: String::from("en"),
            release_date: Some(String::from("2017-10-04")),
            overview: Some(String::from("overview")),
            popularity: 10.0,
            vote_average: 7.5,
            vote_count: 100,
            genre_ids: vec![878],
            adult: false,
            poster_path: None,
            backdrop_path: None,
        }
    }

    fn list_page(total_pages: u32) -> MovieListPage {
        MovieListPage {
            page: 1,
            results: vec![movie(78, "Blade Runner"), movie(603, "The Matrix")],
            total_pages,
            total_results: total_pages.saturating_mul(20),
        }
    }

    fn genre_catalog() -> Vec<Genre> {
        vec![
            Genre {
                id: 878,
                name: String::from("Science Fiction"),
            },
            Genre {
                id: 35,
                name: String::from("Comedy"),
            },
        ]
    }

    /// Drives a state to the Movies route with a settled result.
    fn movies_state(total_pages: u32) -> BrowseState {
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();
        let effects = state.navigate(Route::Movies);
        let Effect::FetchMovies { generation, .. } = effects[0].clone() else {
            panic!("expected a movies fetch");
        };
        state.apply(FetchOutcome::Movies(generation, Ok(list_page(total_pages))));
        state
    }

    #[test]
    fn test_initial_effects_for_home() {
        // Arrange
        let mut state = BrowseState::new(Route::Home);

        // Act
        let effects = state.initial_effects();

        // Assert: genre catalog plus the three rails
        assert_eq!(effects.len(), 4);
        assert!(matches!(effects[0], Effect::FetchGenres { .. }));
        assert!(state.home_popular.is_loading());
    }

    #[test]
    fn test_navigate_to_movies_fetches_page_one() {
        // Arrange
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();

        // Act
        let effects = state.navigate(Route::Movies);

        // Assert
        assert_eq!(
            effects,
            vec![Effect::FetchMovies {
                generation: 1,
                filter: DiscoverFilter::new(),
                page: 1,
            }]
        );
    }

    #[test]
    fn test_envelope_total_pages_clamped_before_windowing() {
        // Arrange & Act: envelope reports 900 pages
        let state = movies_state(900);

        // Assert
        assert_eq!(state.movies_pager.total(), 500);
    }

    #[test]
    fn test_filter_change_resets_page() {
        // Arrange: sitting on page 3
        let mut state = movies_state(20);
        state.page_next();
        state.page_next();
        assert_eq!(state.movies_pager.current(), 3);

        // Act
        let effects = state.select_year(Some(2020));

        // Assert: back to page 1 with the year in the filter
        assert_eq!(state.movies_pager.current(), 1);
        let Effect::FetchMovies { filter, page, .. } = &effects[0] else {
            panic!("expected a movies fetch");
        };
        assert_eq!(*page, 1);
        assert_eq!(filter.year, Some(2020));
        assert_eq!(filter.genre_id, None);
        assert_eq!(filter.sort_by, SortBy::PopularityDesc);
    }

    #[test]
    fn test_sort_change_resets_page() {
        // Arrange
        let mut state = movies_state(20);
        state.page_last();
        assert_eq!(state.movies_pager.current(), 20);

        // Act
        let effects = state.cycle_sort();

        // Assert
        assert_eq!(state.movies_pager.current(), 1);
        let Effect::FetchMovies { filter, .. } = &effects[0] else {
            panic!("expected a movies fetch");
        };
        assert_eq!(filter.sort_by, SortBy::PopularityAsc);
    }

    #[test]
    fn test_genre_route_always_scopes_the_filter() {
        // Arrange: genre-scoped route
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();
        state.navigate(Route::Genre(878));

        // Act: a year change must keep the route's genre
        let effects = state.select_year(Some(2019));

        // Assert
        let Effect::FetchMovies { filter, .. } = &effects[0] else {
            panic!("expected a movies fetch");
        };
        assert_eq!(filter.genre_id, Some(878));
        assert_eq!(filter.year, Some(2019));
    }

    #[test]
    fn test_select_genre_navigates_to_scoped_route() {
        // Arrange
        let mut state = movies_state(20);

        // Act
        state.select_genre(Some(35));

        // Assert
        assert_eq!(state.route(), Route::Genre(35));
        assert_eq!(state.filters.route_genre, Some(35));
    }

    #[test]
    fn test_clearing_genre_returns_to_unscoped_route() {
        // Arrange
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();
        state.navigate(Route::Genre(878));

        // Act
        let effects = state.select_genre(None);

        // Assert
        assert_eq!(state.route(), Route::Movies);
        let Effect::FetchMovies { filter, .. } = &effects[0] else {
            panic!("expected a movies fetch");
        };
        assert_eq!(filter.genre_id, None);
    }

    #[test]
    fn test_unknown_genre_becomes_not_found() {
        // Arrange: catalog already loaded
        let mut state = BrowseState::new(Route::Home);
        let effects = state.initial_effects();
        let Effect::FetchGenres { generation } = effects[0] else {
            panic!("expected a genres fetch");
        };
        state.apply(FetchOutcome::Genres(generation, Ok(genre_catalog())));

        // Act
        state.navigate(Route::Genre(999));

        // Assert
        assert_eq!(state.route(), Route::NotFound(999));
    }

    #[test]
    fn test_pre_scoped_route_validated_when_catalog_arrives() {
        // Arrange: browse started directly on an unknown genre
        let mut state = BrowseState::new(Route::Genre(999));
        let effects = state.initial_effects();
        let Effect::FetchGenres { generation } = effects[0] else {
            panic!("expected a genres fetch");
        };

        // Act
        state.apply(FetchOutcome::Genres(generation, Ok(genre_catalog())));

        // Assert
        assert_eq!(state.route(), Route::NotFound(999));
    }

    #[test]
    fn test_page_next_fetches_next_page() {
        // Arrange
        let mut state = movies_state(20);

        // Act
        let effects = state.page_next();

        // Assert
        let Effect::FetchMovies { page, .. } = &effects[0] else {
            panic!("expected a movies fetch");
        };
        assert_eq!(*page, 2);
    }

    #[test]
    fn test_page_next_at_end_is_a_no_op() {
        // Arrange
        let mut state = movies_state(20);
        state.page_last();

        // Act
        let effects = state.page_next();

        // Assert
        assert!(effects.is_empty());
        assert_eq!(state.movies_pager.current(), 20);
    }

    #[test]
    fn test_stale_movies_outcome_is_discarded() {
        // Arrange: page 1 fetch superseded by page 2
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();
        let effects = state.navigate(Route::Movies);
        let Effect::FetchMovies { generation: old, .. } = effects[0].clone() else {
            panic!("expected a movies fetch");
        };
        state.apply(FetchOutcome::Movies(old, Ok(list_page(20))));
        let effects = state.page_next();
        let Effect::FetchMovies { generation: new, .. } = effects[0].clone() else {
            panic!("expected a movies fetch");
        };

        // Act: the new page settles, then the stale one arrives late
        let mut newer = list_page(20);
        newer.page = 2;
        state.apply(FetchOutcome::Movies(new, Ok(newer)));
        state.apply(FetchOutcome::Movies(old, Ok(list_page(20))));

        // Assert: the late stale envelope did not overwrite page 2
        assert_eq!(state.movies.ready().unwrap().page, 2);
    }

    #[test]
    fn test_submit_search_navigates_and_fetches() {
        // Arrange
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();
        state.search_input = String::from("  blade runner  ");

        // Act
        let effects = state.submit_search();

        // Assert: trimmed query, page 1
        assert_eq!(state.route(), Route::Search);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::FetchSearch { query, page: 1, .. } if query == "blade runner"
        )));
    }

    #[test]
    fn test_blank_search_clears_results() {
        // Arrange
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();
        state.search_input = String::from("   ");

        // Act
        let effects = state.submit_search();

        // Assert
        assert!(effects.is_empty());
        assert!(state.search_query.is_none());
    }

    #[test]
    fn test_back_returns_and_refetches() {
        // Arrange
        let mut state = movies_state(20);
        state.navigate(Route::Details(78));

        // Act
        let effects = state.back();

        // Assert
        assert_eq!(state.route(), Route::Movies);
        assert!(matches!(effects[0], Effect::FetchMovies { .. }));
    }

    #[test]
    fn test_back_preserves_page_position() {
        // Arrange: page 2, then into details
        let mut state = movies_state(20);
        state.page_next();
        state.navigate(Route::Details(78));

        // Act
        let effects = state.back();

        // Assert: the restored list refetches its old page
        let Effect::FetchMovies { page, .. } = &effects[0] else {
            panic!("expected a movies fetch");
        };
        assert_eq!(*page, 2);
    }

    #[test]
    fn test_selected_movie_follows_cursor() {
        // Arrange
        let mut state = movies_state(20);

        // Act
        state.move_down();

        // Assert
        assert_eq!(state.selected_movie().unwrap().id, 603);
    }

    #[test]
    fn test_cursor_clamps_at_list_end() {
        // Arrange
        let mut state = movies_state(20);

        // Act: two movies, three moves
        state.move_down();
        state.move_down();
        state.move_down();

        // Assert
        assert_eq!(state.movies_table.selected(), Some(1));
    }

    #[test]
    fn test_credential_failure_detected_on_route() {
        // Arrange
        let mut state = BrowseState::new(Route::Home);
        state.initial_effects();
        let effects = state.navigate(Route::Movies);
        let Effect::FetchMovies { generation, .. } = effects[0].clone() else {
            panic!("expected a movies fetch");
        };

        // Act
        state.apply(FetchOutcome::Movies(
            generation,
            Err(FetchFailure {
                kind: crate::fetch::FailureKind::Credential,
                message: String::from("TMDB rejected the API key"),
            }),
        ));

        // Assert
        assert!(state.credential_failure().is_some());
    }

    #[test]
    fn test_retry_reissues_route_fetches() {
        // Arrange
        let mut state = movies_state(20);

        // Act
        let effects = state.retry();

        // Assert: a fresh generation for the same page
        assert!(matches!(
            effects[0],
            Effect::FetchMovies { page: 1, .. }
        ));
        assert!(state.movies.is_loading());
    }
}
