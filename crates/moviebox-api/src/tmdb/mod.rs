//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints and
//! retrieves movie lists, details, genres, and discovery results.

mod api;
mod client;
mod error;
mod images;
mod pacing;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieDb, MovieDb};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::ApiError;
pub use images::{SizeTier, image_url, image_url_opt};
pub use params::{DiscoverFilter, ParseSortByError, SortBy};
pub use types::{
    CastMember, Credits, CrewMember, ErrorBody, Genre, GenreList, MAX_LIST_PAGES, Movie,
    MovieDetails, MovieListPage, Video, VideoList,
};
