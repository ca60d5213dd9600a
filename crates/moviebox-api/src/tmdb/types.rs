//! TMDB API response types.

use serde::Deserialize;

/// TMDB rejects list pages beyond 500; envelopes are clamped to this.
pub const MAX_LIST_PAGES: u32 = 500;

// --- Result envelope ---

/// Result envelope returned by every list-producing endpoint
/// (popular, top rated, upcoming, search, discover, recommendations).
#[derive(Debug, Clone, Deserialize)]
pub struct MovieListPage {
    /// Current page number (1-based).
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<Movie>,
    /// Total number of pages reported by TMDB.
    pub total_pages: u32,
    /// Total number of results across all pages.
    pub total_results: u32,
}

impl MovieListPage {
    /// Total pages usable for pagination, capped at [`MAX_LIST_PAGES`].
    #[must_use]
    pub fn clamped_total_pages(&self) -> u32 {
        self.total_pages.min(MAX_LIST_PAGES)
    }
}

// --- Movies ---

/// A movie entry within a list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Release date (YYYY-MM-DD), absent for unreleased entries.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl Movie {
    /// Four-digit release year, if the release date is known.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

/// Response from `movie/{id}` with `append_to_response=videos,credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release status (e.g. "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Resolved genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production budget in USD.
    #[serde(default)]
    pub budget: u64,
    /// Worldwide revenue in USD.
    #[serde(default)]
    pub revenue: u64,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Official homepage.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Appended cast/crew data.
    #[serde(default)]
    pub credits: Option<Credits>,
    /// Appended video data.
    #[serde(default)]
    pub videos: Option<VideoList>,
}

impl MovieDetails {
    /// Cast ordered by billing, empty when credits were not appended.
    #[must_use]
    pub fn cast(&self) -> &[CastMember] {
        self.credits.as_ref().map_or(&[], |c| c.cast.as_slice())
    }

    /// First official YouTube trailer, falling back to any YouTube trailer.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        let videos = self.videos.as_ref()?.results.as_slice();
        let trailers = || {
            videos
                .iter()
                .filter(|v| v.site == "YouTube" && v.kind == "Trailer")
        };
        trailers().find(|v| v.official).or_else(|| trailers().next())
    }

    /// Runtime formatted as `2h 43m`.
    #[must_use]
    pub fn formatted_runtime(&self) -> Option<String> {
        let minutes = self.runtime?;
        Some(format!("{}h {:02}m", minutes / 60, minutes % 60))
    }
}

// --- Credits ---

/// Cast and crew appended to a details response.
#[derive(Debug, Clone, Deserialize)]
pub struct Credits {
    /// Cast members in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew members.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A single cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Actor name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: String,
    /// Billing order (0 = top billing).
    #[serde(default)]
    pub order: u32,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A single crew member.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Job (e.g. "Director").
    #[serde(default)]
    pub job: String,
    /// Department (e.g. "Directing").
    #[serde(default)]
    pub department: String,
}

// --- Videos ---

/// Video list appended to a details response.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoList {
    /// Videos for this movie.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A single video entry (trailer, teaser, clip).
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// TMDB video ID.
    pub id: String,
    /// Provider-side key (YouTube video ID).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether this is an official upload.
    #[serde(default)]
    pub official: bool,
}

// --- Genres ---

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    /// All movie genres.
    pub genres: Vec<Genre>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Display name.
    pub name: String,
}

// --- Errors ---

/// TMDB error document returned on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// TMDB status code (7 = invalid key, 34 = not found, ...).
    pub status_code: u32,
    /// Human-readable status message.
    pub status_message: String,
    /// Always `false` on errors.
    #[serde(default)]
    pub success: bool,
}
