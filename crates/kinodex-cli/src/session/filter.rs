//! Rating-range filtering over detail records.

use kinodex_api::omdb::TitleDetail;

/// Rating lower bound used when the control is empty or non-numeric.
const DEFAULT_MIN: f64 = 0.0;

/// Rating upper bound used when the control is empty or non-numeric.
const DEFAULT_MAX: f64 = 10.0;

/// Inclusive rating range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBounds {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl RatingBounds {
    /// Builds bounds from raw control text.
    ///
    /// Empty or non-numeric input falls back to 0 (min) and 10 (max).
    #[must_use]
    pub fn from_inputs(min_text: &str, max_text: &str) -> Self {
        Self {
            min: parse_bound(min_text, DEFAULT_MIN),
            max: parse_bound(max_text, DEFAULT_MAX),
        }
    }

    /// Whether a rating lies within the bounds, inclusive.
    #[must_use]
    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min && rating <= self.max
    }
}

fn parse_bound(text: &str, fallback: f64) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(fallback)
}

/// Keeps the records whose rating parses to a finite number within the
/// bounds. Records with a missing or non-numeric rating are always
/// excluded, never passed by default.
#[must_use]
pub fn filter_by_rating(movies: &[TitleDetail], bounds: RatingBounds) -> Vec<TitleDetail> {
    movies
        .iter()
        .filter(|movie| movie.rating().is_some_and(|r| bounds.contains(r)))
        .cloned()
        .collect()
}
