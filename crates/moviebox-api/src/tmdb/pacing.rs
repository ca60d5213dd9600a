//! Request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Single-tier pacer enforcing a minimum interval between requests.
///
/// TMDB budgets roughly 40 requests per second per key. This is pacing,
/// not retry: when the budget is exceeded anyway, the client surfaces
/// HTTP 429 to the caller instead of retrying.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Timestamp of the previous request.
    last_request: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a pacer with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until the next request is allowed.
    pub async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval.saturating_sub(elapsed)).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_does_not_wait() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_secs(1));

        // Act
        let start = Instant::now();
        pacer.pace().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_enforces_min_interval() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        pacer.pace().await;
        pacer.pace().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_records_timestamp() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_millis(0));

        // Act
        pacer.pace().await;

        // Assert
        assert!(pacer.last_request.is_some());
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let pacer = RequestPacer::default_interval();

        // Assert
        assert_eq!(pacer.min_interval, Duration::from_millis(25));
    }
}
