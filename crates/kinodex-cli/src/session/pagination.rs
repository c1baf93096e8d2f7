//! Pagination state for paged search results.

/// Derived pagination summary handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// Current page, 1-based.
    pub current_page: u32,
    /// Total page count (>= 1).
    pub total_pages: u32,
    /// Whether navigating backwards is possible.
    pub prev_enabled: bool,
    /// Whether navigating forwards is possible.
    pub next_enabled: bool,
}

/// Pagination state: current page plus the last known total result count.
///
/// The total page count is always derived, never stored, so it cannot
/// drift from `total_results`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Current page, 1-based. Always within `[1, total_pages()]`.
    current_page: u32,
    /// Total result count reported by the last accepted search.
    total_results: u32,
    /// Results per page (> 0).
    items_per_page: u32,
}

impl PageState {
    /// Creates pagination state at page 1 with no results.
    #[must_use]
    pub const fn new(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_results: 0,
            items_per_page: if items_per_page == 0 {
                1
            } else {
                items_per_page
            },
        }
    }

    /// Current page, 1-based.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total result count.
    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Derived total page count: `ceil(total_results / items_per_page)`,
    /// minimum 1 so an empty result set still renders "Page 1 of 1".
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        let pages = self.total_results.div_ceil(self.items_per_page);
        if pages == 0 { 1 } else { pages }
    }

    /// Records a new total result count from an accepted search page.
    ///
    /// Reported totals can shrink between pages; the current page is
    /// clamped so it never exceeds the new page count.
    pub const fn set_total(&mut self, total_results: u32) {
        self.total_results = total_results;
        let pages = self.total_pages();
        if self.current_page > pages {
            self.current_page = pages;
        }
    }

    /// Resets to page 1, keeping the total.
    pub const fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Resets to page 1 with zero results (the "no matches" state).
    pub const fn clear(&mut self) {
        self.current_page = 1;
        self.total_results = 0;
    }

    /// Attempts to move by `delta` pages.
    ///
    /// The move is accepted only when the proposed page lies within
    /// `[1, total_pages()]`; anything else is rejected and the state is
    /// left unchanged (no clamping, no wraparound). Returns whether the
    /// move was accepted.
    #[must_use]
    pub fn change_page(&mut self, delta: i32) -> bool {
        let proposed = i64::from(self.current_page).saturating_add(i64::from(delta));
        if proposed >= 1 && proposed <= i64::from(self.total_pages()) {
            // Bounds checked above; total_pages() fits in u32.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                self.current_page = proposed as u32;
            }
            true
        } else {
            false
        }
    }

    /// Whether the previous-page control should be enabled.
    #[must_use]
    pub const fn prev_enabled(&self) -> bool {
        self.current_page > 1
    }

    /// Whether the next-page control should be enabled.
    #[must_use]
    pub const fn next_enabled(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Builds the derived summary for rendering.
    #[must_use]
    pub const fn summary(&self) -> PageSummary {
        PageSummary {
            current_page: self.current_page,
            total_pages: self.total_pages(),
            prev_enabled: self.prev_enabled(),
            next_enabled: self.next_enabled(),
        }
    }
}
