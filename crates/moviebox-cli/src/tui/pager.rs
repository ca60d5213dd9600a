//! Pagination windowing and page transitions.

/// Number of page buttons shown at once.
const WINDOW_SIZE: u32 = 5;

/// Computes the ordered page numbers to render as buttons.
///
/// The window is centered on `current_page` and clamped to
/// `[1, total_pages]`. With `total_pages <= 1` there is nothing to
/// paginate and the window is empty.
#[must_use]
pub fn page_window(current_page: u32, total_pages: u32) -> Vec<u32> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let mut start = current_page.saturating_sub(WINDOW_SIZE / 2).max(1);
    let mut end = start.saturating_add(WINDOW_SIZE - 1);
    if end > total_pages {
        end = total_pages;
        start = end.saturating_sub(WINDOW_SIZE - 1).max(1);
    }

    (start..=end).collect()
}

/// Pagination cursor over a clamped page count.
///
/// Invariant: `1 <= current <= total` whenever `total > 0`. Transitions
/// only ever move `current`; `total` changes only via [`Pager::set_total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: u32,
    total: u32,
}

impl Pager {
    /// Creates a pager on page 1.
    #[must_use]
    pub const fn new(total_pages: u32) -> Self {
        Self {
            current: 1,
            total: total_pages,
        }
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Total pages.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Updates the total page count (from a fresh result envelope),
    /// clamping the current page back into range if needed.
    pub fn set_total(&mut self, total_pages: u32) {
        self.total = total_pages;
        if total_pages > 0 && self.current > total_pages {
            self.current = total_pages;
        }
    }

    /// Page buttons to render for the current position.
    #[must_use]
    pub fn window(&self) -> Vec<u32> {
        page_window(self.current, self.total)
    }

    /// Whether First/Previous are enabled.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current > 1
    }

    /// Whether Next/Last are enabled.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.total > 0 && self.current < self.total
    }

    /// Jumps to a page. Out-of-range targets are ignored.
    /// Returns whether the current page changed.
    pub fn goto(&mut self, page: u32) -> bool {
        if page == 0 || page > self.total.max(1) || page == self.current {
            return false;
        }
        self.current = page;
        true
    }

    /// Moves to page 1. Returns whether the current page changed.
    pub fn first(&mut self) -> bool {
        self.goto(1)
    }

    /// Moves one page back. Returns whether the current page changed.
    pub fn prev(&mut self) -> bool {
        let target = self.current.saturating_sub(1);
        self.goto(target)
    }

    /// Moves one page forward. Returns whether the current page changed.
    pub fn next(&mut self) -> bool {
        let target = self.current.saturating_add(1);
        self.goto(target)
    }

    /// Moves to the last page. Returns whether the current page changed.
    pub fn last(&mut self) -> bool {
        self.goto(self.total)
    }

    /// Returns to page 1 unconditionally (filter changes).
    pub const fn reset(&mut self) {
        self.current = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_window_for_single_page() {
        // Arrange & Act & Assert
        assert!(page_window(1, 0).is_empty());
        assert!(page_window(1, 1).is_empty());
    }

    #[test]
    fn test_window_at_start() {
        // Arrange & Act & Assert
        assert_eq!(page_window(1, 20), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 20), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 20), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_at_end() {
        // Arrange & Act & Assert
        assert_eq!(page_window(20, 20), vec![16, 17, 18, 19, 20]);
        assert_eq!(page_window(19, 20), vec![16, 17, 18, 19, 20]);
        assert_eq!(page_window(18, 20), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_window_centered_in_middle() {
        // Arrange & Act & Assert
        assert_eq!(page_window(10, 20), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_window_shorter_than_five() {
        // Arrange & Act & Assert
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(3, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_window_length_and_membership() {
        // Arrange & Act & Assert: for every valid position the window has
        // min(5, total) entries and contains the current page
        for total in 2..=12u32 {
            for current in 1..=total {
                let window = page_window(current, total);
                assert_eq!(window.len(), total.min(5) as usize);
                assert!(window.contains(&current));
            }
        }
    }

    #[test]
    fn test_pager_transitions() {
        // Arrange
        let mut pager = Pager::new(20);

        // Act & Assert
        assert!(!pager.has_prev());
        assert!(pager.has_next());

        assert!(pager.next());
        assert_eq!(pager.current(), 2);

        assert!(pager.last());
        assert_eq!(pager.current(), 20);
        assert!(!pager.has_next());

        assert!(!pager.next()); // already at the end
        assert_eq!(pager.current(), 20);

        assert!(pager.prev());
        assert_eq!(pager.current(), 19);

        assert!(pager.first());
        assert_eq!(pager.current(), 1);
        assert!(!pager.prev()); // already at the start
    }

    #[test]
    fn test_goto_rejects_out_of_range() {
        // Arrange
        let mut pager = Pager::new(5);

        // Act & Assert
        assert!(!pager.goto(0));
        assert!(!pager.goto(6));
        assert!(pager.goto(4));
        assert_eq!(pager.current(), 4);
    }

    #[test]
    fn test_transitions_never_mutate_total() {
        // Arrange
        let mut pager = Pager::new(20);

        // Act
        pager.next();
        pager.last();
        pager.first();
        pager.goto(7);

        // Assert
        assert_eq!(pager.total(), 20);
    }

    #[test]
    fn test_set_total_clamps_current() {
        // Arrange
        let mut pager = Pager::new(20);
        pager.last();

        // Act: a refetch reports fewer pages
        pager.set_total(4);

        // Assert
        assert_eq!(pager.current(), 4);
        assert_eq!(pager.total(), 4);
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        // Arrange
        let mut pager = Pager::new(20);
        pager.goto(15);

        // Act
        pager.reset();

        // Assert
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn test_single_page_disables_everything() {
        // Arrange
        let pager = Pager::new(1);

        // Assert
        assert!(!pager.has_prev());
        assert!(!pager.has_next());
        assert!(pager.window().is_empty());
    }
}
