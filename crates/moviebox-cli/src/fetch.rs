//! Per-request fetch state machine.
//!
//! Each remote-backed view owns a [`FetchSlot`] that tracks the lifecycle
//! `Idle -> Loading -> Ready | Failed` together with a request generation.
//! Outcomes from superseded requests are discarded on arrival, so a stale
//! in-flight response can never overwrite a newer one. In-flight requests
//! are not aborted; their results simply die at [`FetchSlot::settle`].

use moviebox_api::tmdb::ApiError;

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The credential is missing or rejected; rendered as the dedicated
    /// cannot-connect screen.
    Credential,
    /// Anything else (network, upstream, decode); rendered as the generic
    /// retryable failure message.
    Upstream,
}

/// A classified fetch failure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable message.
    pub message: String,
}

impl From<&ApiError> for FetchFailure {
    fn from(err: &ApiError) -> Self {
        let kind = if err.is_credential_failure() {
            FailureKind::Credential
        } else {
            FailureKind::Upstream
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Lifecycle of one tracked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Ready(T),
    /// The latest request failed.
    Failed(FetchFailure),
}

/// A fetch slot: current state plus the generation of the latest request.
#[derive(Debug)]
pub struct FetchSlot<T> {
    state: FetchState<T>,
    generation: u64,
}

impl<T> FetchSlot<T> {
    /// Creates an idle slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FetchState::Idle,
            generation: 0,
        }
    }

    /// Starts a new request: bumps the generation (invalidating every
    /// outcome still in flight) and moves to `Loading`.
    ///
    /// Returns the generation the caller must echo back into
    /// [`Self::settle`].
    pub fn begin(&mut self) -> u64 {
        self.generation = self.generation.saturating_add(1);
        self.state = FetchState::Loading;
        self.generation
    }

    /// Applies an outcome. Outcomes from superseded generations are
    /// discarded; returns whether the outcome was applied.
    pub fn settle(&mut self, generation: u64, outcome: Result<T, FetchFailure>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state = match outcome {
            Ok(value) => FetchState::Ready(value),
            Err(failure) => FetchState::Failed(failure),
        };
        true
    }

    /// Returns to `Idle`, invalidating any in-flight request.
    pub fn reset(&mut self) {
        self.generation = self.generation.saturating_add(1);
        self.state = FetchState::Idle;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    /// The latest successful value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match &self.state {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The latest failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&FetchFailure> {
        match &self.state {
            FetchState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_slot_starts_idle() {
        // Arrange & Act
        let slot: FetchSlot<u32> = FetchSlot::new();

        // Assert
        assert_eq!(*slot.state(), FetchState::Idle);
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_begin_moves_to_loading() {
        // Arrange
        let mut slot: FetchSlot<u32> = FetchSlot::new();

        // Act
        let generation = slot.begin();

        // Assert
        assert_eq!(generation, 1);
        assert!(slot.is_loading());
    }

    #[test]
    fn test_settle_applies_matching_generation() {
        // Arrange
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        let generation = slot.begin();

        // Act
        let applied = slot.settle(generation, Ok(42));

        // Assert
        assert!(applied);
        assert_eq!(slot.ready(), Some(&42));
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        // Arrange: first request superseded by a second
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        // Act: the stale outcome arrives after the newer one settled
        let newer_applied = slot.settle(second, Ok(2));
        let stale_applied = slot.settle(first, Ok(1));

        // Assert: newest wins even though the stale result resolved later
        assert!(newer_applied);
        assert!(!stale_applied);
        assert_eq!(slot.ready(), Some(&2));
    }

    #[test]
    fn test_stale_outcome_does_not_clobber_loading() {
        // Arrange
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        let first = slot.begin();
        slot.begin();

        // Act: stale result arrives while the newer request is in flight
        let applied = slot.settle(first, Ok(1));

        // Assert: still loading, waiting for the newer outcome
        assert!(!applied);
        assert!(slot.is_loading());
    }

    #[test]
    fn test_failure_is_surfaced() {
        // Arrange
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        let generation = slot.begin();
        let failure = FetchFailure {
            kind: FailureKind::Upstream,
            message: String::from("TMDB API error (HTTP 502)"),
        };

        // Act
        slot.settle(generation, Err(failure.clone()));

        // Assert
        assert_eq!(slot.failure(), Some(&failure));
        assert!(slot.ready().is_none());
    }

    #[test]
    fn test_refetch_replaces_failure() {
        // Arrange
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        let generation = slot.begin();
        slot.settle(
            generation,
            Err(FetchFailure {
                kind: FailureKind::Upstream,
                message: String::from("boom"),
            }),
        );

        // Act: manual retry
        let retry = slot.begin();
        slot.settle(retry, Ok(7));

        // Assert
        assert_eq!(slot.ready(), Some(&7));
        assert!(slot.failure().is_none());
    }

    #[test]
    fn test_reset_invalidates_in_flight() {
        // Arrange
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        let generation = slot.begin();

        // Act
        slot.reset();
        let applied = slot.settle(generation, Ok(9));

        // Assert
        assert!(!applied);
        assert_eq!(*slot.state(), FetchState::Idle);
    }

    #[test]
    fn test_failure_kind_from_api_error() {
        // Arrange
        let invalid = ApiError::InvalidKey {
            message: String::from("Invalid API key"),
        };
        let rate_limited = ApiError::RateLimited;

        // Act
        let credential = FetchFailure::from(&invalid);
        let upstream = FetchFailure::from(&rate_limited);

        // Assert
        assert_eq!(credential.kind, FailureKind::Credential);
        assert_eq!(upstream.kind, FailureKind::Upstream);
    }
}
