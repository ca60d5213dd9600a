//! Image CDN URL construction.

/// Base URL for the TMDB image CDN.
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Image size tier, mapping to a CDN width bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 200px wide (`w200`).
    Small,
    /// 300px wide (`w300`).
    Medium,
    /// 500px wide (`w500`).
    Large,
    /// Full resolution (`original`).
    Original,
}

impl SizeTier {
    /// CDN path segment for this tier.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Small => "w200",
            Self::Medium => "w300",
            Self::Large => "w500",
            Self::Original => "original",
        }
    }
}

/// Builds the full CDN URL for an image path (paths start with `/`).
#[must_use]
pub fn image_url(path: &str, tier: SizeTier) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    format!("{IMAGE_BASE_URL}{}/{trimmed}", tier.path_segment())
}

/// Like [`image_url`], for call sites holding an optional path.
#[must_use]
pub fn image_url_opt(path: Option<&str>, tier: SizeTier) -> Option<String> {
    path.map(|p| image_url(p, tier))
}
