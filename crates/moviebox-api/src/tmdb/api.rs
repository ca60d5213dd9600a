//! `MovieDb` trait definition.
#![allow(clippy::future_not_send)]

use super::error::ApiError;
use super::params::DiscoverFilter;
use super::types::{Genre, MovieDetails, MovieListPage};

/// TMDB movie API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(MovieDb: Send)]
pub trait LocalMovieDb {
    /// Lists popular movies.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails.
    async fn popular(&self, page: u32) -> Result<MovieListPage, ApiError>;

    /// Lists top-rated movies.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails.
    async fn top_rated(&self, page: u32) -> Result<MovieListPage, ApiError>;

    /// Lists upcoming releases.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails.
    async fn upcoming(&self, page: u32) -> Result<MovieListPage, ApiError>;

    /// Fetches movie details with appended credits and videos.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails;
    /// an unknown id surfaces as [`ApiError::Upstream`] with code 34.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails, ApiError>;

    /// Lists movies recommended for the given movie.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails.
    async fn recommendations(&self, movie_id: u64, page: u32) -> Result<MovieListPage, ApiError>;

    /// Searches movies by free text.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails.
    async fn search(&self, query: &str, page: u32) -> Result<MovieListPage, ApiError>;

    /// Fetches the movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails.
    async fn genres(&self) -> Result<Vec<Genre>, ApiError>;

    /// Runs a discovery query with the given filter.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the HTTP request or JSON decoding fails.
    async fn discover(&self, filter: &DiscoverFilter, page: u32)
    -> Result<MovieListPage, ApiError>;
}
