//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalMovieDb;
use super::error::ApiError;
use super::pacing::RequestPacer;
use super::params::DiscoverFilter;
use super::types::{ErrorBody, Genre, GenreList, MovieDetails, MovieListPage};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// TMDB API client.
///
/// Authenticates with a v3 API key sent as the `api_key` query parameter
/// on every request.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key.
    api_key: String,
    /// Request pacer.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when:
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient, ApiError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Config {
                message: String::from("api_key is required"),
            })?;
        let user_agent = self.user_agent.ok_or_else(|| ApiError::Config {
            message: String::from("user_agent is required"),
        })?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).map_err(|source| ApiError::Url {
                path: String::from(DEFAULT_BASE_URL),
                source,
            })?
        };

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::default_interval, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a paced GET request with the `api_key` query parameter and
    /// decodes the JSON response, classifying failures into [`ApiError`].
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.pacer.lock().await.pace().await;

        let url = self.base_url.join(path).map_err(|source| ApiError::Url {
            path: String::from(path),
            source,
        })?;

        let request = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .build()?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let response = self.http_client.execute(request).await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            return Err(classify_failure(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: String::from(path),
            source,
        })
    }
}

/// Maps a non-success response to the error taxonomy.
///
/// HTTP 401 and TMDB body codes 7/10 mean the key is unusable; everything
/// else keeps its upstream status and message for the caller.
fn classify_failure(status: reqwest::StatusCode, body: &str) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

    if let Some(error_body) = parsed {
        if status == reqwest::StatusCode::UNAUTHORIZED
            || ApiError::code_means_invalid_key(error_body.status_code)
        {
            return ApiError::InvalidKey {
                message: error_body.status_message,
            };
        }
        return ApiError::Upstream {
            status: status.as_u16(),
            code: error_body.status_code,
            message: error_body.status_message,
        };
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ApiError::InvalidKey {
            message: String::from("authorization failed"),
        };
    }

    ApiError::Http {
        status: status.as_u16(),
    }
}

impl LocalMovieDb for TmdbClient {
    #[instrument(skip_all)]
    async fn popular(&self, page: u32) -> Result<MovieListPage, ApiError> {
        let query = [("page", page.to_string())];
        self.get_json("movie/popular", &query).await
    }

    #[instrument(skip_all)]
    async fn top_rated(&self, page: u32) -> Result<MovieListPage, ApiError> {
        let query = [("page", page.to_string())];
        self.get_json("movie/top_rated", &query).await
    }

    #[instrument(skip_all)]
    async fn upcoming(&self, page: u32) -> Result<MovieListPage, ApiError> {
        let query = [("page", page.to_string())];
        self.get_json("movie/upcoming", &query).await
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails, ApiError> {
        let path = format!("movie/{movie_id}");
        let query = [("append_to_response", String::from("videos,credits"))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn recommendations(&self, movie_id: u64, page: u32) -> Result<MovieListPage, ApiError> {
        let path = format!("movie/{movie_id}/recommendations");
        let query = [("page", page.to_string())];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn search(&self, query: &str, page: u32) -> Result<MovieListPage, ApiError> {
        let query = [
            ("query", String::from(query)),
            ("page", page.to_string()),
        ];
        self.get_json("search/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        let list: GenreList = self.get_json("genre/movie/list", &[]).await?;
        Ok(list.genres)
    }

    #[instrument(skip_all)]
    async fn discover(
        &self,
        filter: &DiscoverFilter,
        page: u32,
    ) -> Result<MovieListPage, ApiError> {
        let mut query = filter.to_query();
        query.push(("page", page.to_string()));
        self.get_json("discover/movie", &query).await
    }
}
