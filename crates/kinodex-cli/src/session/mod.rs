//! Search session core.
//!
//! Pure state logic for the movie browser: pagination bookkeeping,
//! rating-range filtering, debounced-input timing, and the search
//! orchestrator with its append-only detail cache. Nothing in here
//! touches the terminal or the network, so every piece is unit-testable.

/// Latest-wins delayed-trigger timer.
pub mod debounce;
/// Rating-range filtering.
pub mod filter;
/// Page arithmetic and navigation flags.
pub mod pagination;
/// Search orchestrator and detail cache.
pub mod search;
