//! TMDB API client library for moviebox.
//!
//! Provides a typed client for the TMDB v3 movie endpoints, parameter
//! composition for discovery queries, and image CDN URL helpers.

/// TMDB API client.
pub mod tmdb;
