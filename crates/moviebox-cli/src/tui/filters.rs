//! Filter bar state: genre/year/sort selections composed into a
//! discovery filter.

use chrono::Datelike;
use moviebox_api::tmdb::{DiscoverFilter, SortBy};

/// Number of years offered by the year selector.
const YEAR_CHOICES: u32 = 20;

/// Current filter selections for a movie list view.
///
/// `route_genre` is the genre implied by the current route (a
/// genre-scoped list). When set, it always wins over the user's own
/// genre selection in the composed filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Genre implied by the current route.
    pub route_genre: Option<u32>,
    /// Genre chosen in the selector.
    pub selected_genre: Option<u32>,
    /// Release year chosen in the selector.
    pub selected_year: Option<u32>,
    /// Sort order.
    pub sort_by: SortBy,
}

impl FilterState {
    /// Creates a filter state for a route, seeding the route genre.
    #[must_use]
    pub fn new(route_genre: Option<u32>) -> Self {
        Self {
            route_genre,
            ..Self::default()
        }
    }

    /// The genre that takes effect: the route's, else the selector's.
    #[must_use]
    pub const fn effective_genre(&self) -> Option<u32> {
        match self.route_genre {
            Some(id) => Some(id),
            None => self.selected_genre,
        }
    }

    /// Composes the complete filter object for the discovery query.
    #[must_use]
    pub fn compose(&self) -> DiscoverFilter {
        DiscoverFilter {
            genre_id: self.effective_genre(),
            year: self.selected_year,
            sort_by: self.sort_by,
        }
    }

    /// Advances the sort order to the next specifier.
    pub fn cycle_sort(&mut self) {
        self.sort_by = self.sort_by.next();
    }

    /// Selectable years: the current year back through 20 years.
    #[must_use]
    pub fn year_choices() -> Vec<u32> {
        let current_year = u32::try_from(chrono::Local::now().year()).unwrap_or(1970);
        (0..YEAR_CHOICES)
            .map(|offset| current_year.saturating_sub(offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_default_state_composes_default_filter() {
        // Arrange & Act
        let filter = FilterState::new(None).compose();

        // Assert
        assert_eq!(filter, DiscoverFilter::new());
    }

    #[test]
    fn test_year_only_selection() {
        // Arrange
        let mut state = FilterState::new(None);
        state.selected_year = Some(2020);

        // Act
        let filter = state.compose();

        // Assert: year and default sort only, no genre
        assert_eq!(filter.genre_id, None);
        assert_eq!(filter.year, Some(2020));
        assert_eq!(filter.sort_by, SortBy::PopularityDesc);
    }

    #[test]
    fn test_route_genre_wins_over_selector() {
        // Arrange: genre-scoped route, user picked a different genre
        let mut state = FilterState::new(Some(878));
        state.selected_genre = Some(35);

        // Act
        let filter = state.compose();

        // Assert
        assert_eq!(filter.genre_id, Some(878));
    }

    #[test]
    fn test_route_genre_applies_with_empty_selector() {
        // Arrange
        let state = FilterState::new(Some(878));

        // Act
        let filter = state.compose();

        // Assert
        assert_eq!(filter.genre_id, Some(878));
    }

    #[test]
    fn test_selector_genre_used_without_route_genre() {
        // Arrange
        let mut state = FilterState::new(None);
        state.selected_genre = Some(35);

        // Act
        let filter = state.compose();

        // Assert
        assert_eq!(filter.genre_id, Some(35));
    }

    #[test]
    fn test_cycle_sort_advances() {
        // Arrange
        let mut state = FilterState::new(None);

        // Act
        state.cycle_sort();

        // Assert
        assert_eq!(state.sort_by, SortBy::PopularityAsc);
    }

    #[test]
    fn test_year_choices_span_twenty_years() {
        // Arrange & Act
        let years = FilterState::year_choices();

        // Assert
        assert_eq!(years.len(), 20);
        assert_eq!(years[0], years[19] + 19);
        assert!(years.windows(2).all(|w| w[0] == w[1] + 1));
    }
}
