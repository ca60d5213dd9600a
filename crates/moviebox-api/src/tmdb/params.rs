//! Discovery query parameter composition.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Sort specifier for discovery queries, in TMDB's dotted wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// `popularity.desc` (the upstream default).
    #[default]
    PopularityDesc,
    /// `popularity.asc`.
    PopularityAsc,
    /// `vote_average.desc`.
    VoteAverageDesc,
    /// `vote_average.asc`.
    VoteAverageAsc,
    /// `release_date.desc`.
    ReleaseDateDesc,
    /// `release_date.asc`.
    ReleaseDateAsc,
}

impl SortBy {
    /// All specifiers, in selector display order.
    pub const ALL: [Self; 6] = [
        Self::PopularityDesc,
        Self::PopularityAsc,
        Self::VoteAverageDesc,
        Self::VoteAverageAsc,
        Self::ReleaseDateDesc,
        Self::ReleaseDateAsc,
    ];

    /// Wire form sent as the `sort_by` query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PopularityDesc => "popularity.desc",
            Self::PopularityAsc => "popularity.asc",
            Self::VoteAverageDesc => "vote_average.desc",
            Self::VoteAverageAsc => "vote_average.asc",
            Self::ReleaseDateDesc => "release_date.desc",
            Self::ReleaseDateAsc => "release_date.asc",
        }
    }

    /// Human-readable selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PopularityDesc => "Popularity (Descending)",
            Self::PopularityAsc => "Popularity (Ascending)",
            Self::VoteAverageDesc => "Rating (Descending)",
            Self::VoteAverageAsc => "Rating (Ascending)",
            Self::ReleaseDateDesc => "Release Date (Newest)",
            Self::ReleaseDateAsc => "Release Date (Oldest)",
        }
    }

    /// Next specifier in [`Self::ALL`], wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let position = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        let wrapped = position.saturating_add(1).checked_rem(Self::ALL.len());
        *Self::ALL
            .get(wrapped.unwrap_or(0))
            .unwrap_or(&Self::PopularityDesc)
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort specifier string is not recognized.
#[derive(Debug, Clone, Error)]
#[error("unrecognized sort specifier: {0} (expected e.g. popularity.desc)")]
pub struct ParseSortByError(String);

impl FromStr for SortBy {
    type Err = ParseSortByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|sort| sort.as_str() == s)
            .copied()
            .ok_or_else(|| ParseSortByError(String::from(s)))
    }
}

/// Filter selections composed into a discovery query.
///
/// Absent genre/year are omitted from the emitted query entirely,
/// never sent as empty values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoverFilter {
    /// Genre restriction (`with_genres`).
    pub genre_id: Option<u32>,
    /// Release year restriction (`primary_release_year`).
    pub year: Option<u32>,
    /// Sort order (`sort_by`, always sent).
    pub sort_by: SortBy,
}

impl DiscoverFilter {
    /// Creates an empty filter with the default sort order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a genre.
    #[must_use]
    pub const fn genre(mut self, genre_id: u32) -> Self {
        self.genre_id = Some(genre_id);
        self
    }

    /// Restricts to a primary release year.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub const fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Emits the query pairs for `discover/movie`.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> =
            vec![("sort_by", String::from(self.sort_by.as_str()))];
        if let Some(genre_id) = self.genre_id {
            query.push(("with_genres", genre_id.to_string()));
        }
        if let Some(year) = self.year {
            query.push(("primary_release_year", year.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_sort_is_popularity_desc() {
        // Arrange & Act
        let filter = DiscoverFilter::new();

        // Assert
        assert_eq!(filter.sort_by, SortBy::PopularityDesc);
    }

    #[test]
    fn test_year_only_emits_no_genre_key() {
        // Arrange
        let filter = DiscoverFilter::new().year(2020);

        // Act
        let query = filter.to_query();

        // Assert: exactly the year and the default sort, nothing else
        assert_eq!(
            query,
            vec![
                ("sort_by", String::from("popularity.desc")),
                ("primary_release_year", String::from("2020")),
            ]
        );
    }

    #[test]
    fn test_empty_filter_emits_only_sort() {
        // Arrange & Act
        let query = DiscoverFilter::new().to_query();

        // Assert
        assert_eq!(query, vec![("sort_by", String::from("popularity.desc"))]);
    }

    #[test]
    fn test_full_filter_emits_all_keys() {
        // Arrange
        let filter = DiscoverFilter::new()
            .genre(878)
            .year(2017)
            .sort_by(SortBy::VoteAverageDesc);

        // Act
        let query = filter.to_query();

        // Assert
        assert!(query.contains(&("with_genres", String::from("878"))));
        assert!(query.contains(&("primary_release_year", String::from("2017"))));
        assert!(query.contains(&("sort_by", String::from("vote_average.desc"))));
    }

    #[test]
    fn test_sort_by_round_trip() {
        // Arrange & Act & Assert
        for sort in SortBy::ALL {
            assert_eq!(sort.as_str().parse::<SortBy>().unwrap(), sort);
        }
    }

    #[test]
    fn test_sort_by_rejects_unknown_specifier() {
        // Arrange & Act
        let result = "release_date.sideways".parse::<SortBy>();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("unrecognized sort specifier")
        );
    }

    #[test]
    fn test_sort_by_next_cycles_through_all() {
        // Arrange
        let mut sort = SortBy::PopularityDesc;

        // Act: advance through the whole cycle
        for _ in 0..SortBy::ALL.len() {
            sort = sort.next();
        }

        // Assert: back at the start
        assert_eq!(sort, SortBy::PopularityDesc);
    }
}
