//! OMDb API response types.

use serde::Deserialize;

/// Sentinel the OMDb API uses for absent field values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Response from a list search (`s=` query).
///
/// OMDb signals "no match" with HTTP 200 and `Response: "False"`, so an
/// empty result set deserializes successfully and must be checked with
/// [`SearchPage::is_match`].
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// `"True"` when at least one title matched.
    #[serde(rename = "Response")]
    pub response: String,
    /// Matching titles for the requested page (up to 10).
    #[serde(rename = "Search", default)]
    pub hits: Vec<SearchHit>,
    /// Total match count across all pages, string-encoded.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    /// Error message when `Response` is `"False"` (e.g. "Movie not found!").
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl SearchPage {
    /// Returns `true` when the search matched at least one title.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.response == "True"
    }

    /// Parses the string-encoded total result count (0 on absence or garbage).
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total_results
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}

/// A single lightweight row from a list search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Stable IMDb identifier (e.g. `tt0076759`), the detail-cache key.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title name.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year (may be a range like `"1987–1994"` for series).
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Title kind (`movie`, `series`, `episode`).
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// Poster URL, or `"N/A"`.
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

/// Full title record from a detail fetch (`i=` query).
///
/// String fields carry the `"N/A"` sentinel rather than being absent;
/// only `BoxOffice` is sometimes missing entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleDetail {
    /// Stable IMDb identifier.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title name.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Title kind (`movie`, `series`, `episode`).
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// Age rating (e.g. `"PG"`), or `"N/A"`.
    #[serde(rename = "Rated", default)]
    pub rated: String,
    /// IMDb rating as a decimal string, or `"N/A"`.
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    /// Vote count with thousands separators (e.g. `"1,460,000"`).
    #[serde(rename = "imdbVotes", default)]
    pub imdb_votes: String,
    /// Comma-separated genres.
    #[serde(rename = "Genre", default)]
    pub genre: String,
    /// Director name(s).
    #[serde(rename = "Director", default)]
    pub director: String,
    /// Writer credit(s).
    #[serde(rename = "Writer", default)]
    pub writer: String,
    /// Principal cast.
    #[serde(rename = "Actors", default)]
    pub actors: String,
    /// Awards summary.
    #[serde(rename = "Awards", default)]
    pub awards: String,
    /// Runtime (e.g. `"121 min"`).
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    /// Release date (e.g. `"25 May 1977"`).
    #[serde(rename = "Released", default)]
    pub released: String,
    /// Box office gross; missing for series and older titles.
    #[serde(rename = "BoxOffice", default)]
    pub box_office: Option<String>,
    /// Plot text (full plot when requested with `plot=full`).
    #[serde(rename = "Plot", default)]
    pub plot: String,
    /// Poster URL, or `"N/A"`.
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl TitleDetail {
    /// Parses the IMDb rating into a finite number.
    ///
    /// Returns `None` for the `"N/A"` sentinel or any non-numeric value.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.imdb_rating.parse::<f64>().ok().filter(|r| r.is_finite())
    }

    /// Returns the poster URL, `None` when OMDb has no poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        if self.poster.is_empty() || self.poster == NOT_AVAILABLE {
            None
        } else {
            Some(&self.poster)
        }
    }
}

/// Error payload OMDb returns for rejected requests (e.g. bad API key).
#[derive(Debug, Clone, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbErrorResponse {
    /// Always `"False"`.
    #[serde(rename = "Response")]
    pub response: String,
    /// Human-readable error message.
    #[serde(rename = "Error")]
    pub error: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_search_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_star_page1.json");

        // Act
        let page: SearchPage = serde_json::from_str(json).unwrap();

        // Assert
        assert!(page.is_match());
        assert_eq!(page.total(), 524);
        assert_eq!(page.hits.len(), 10);
        assert_eq!(page.hits[0].imdb_id, "tt0076759");
        assert_eq!(page.hits[0].kind, "movie");
    }

    #[test]
    fn test_parse_no_match_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_no_match.json");

        // Act
        let page: SearchPage = serde_json::from_str(json).unwrap();

        // Assert
        assert!(!page.is_match());
        assert!(page.hits.is_empty());
        assert_eq!(page.total(), 0);
        assert_eq!(page.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_parse_detail_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/detail_tt0076759.json");

        // Act
        let detail: TitleDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(detail.imdb_id, "tt0076759");
        assert_eq!(detail.title, "Star Wars: Episode IV - A New Hope");
        assert_eq!(detail.rating(), Some(8.6));
        assert!(detail.box_office.is_some());
        assert!(detail.poster_url().is_some());
    }

    #[test]
    fn test_rating_not_available_is_none() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/detail_rating_na.json");

        // Act
        let detail: TitleDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(detail.imdb_rating, NOT_AVAILABLE);
        assert_eq!(detail.rating(), None);
        assert_eq!(detail.poster_url(), None);
        assert!(detail.box_office.is_none());
    }

    #[test]
    fn test_total_tolerates_garbage() {
        // Arrange
        let page = SearchPage {
            response: String::from("True"),
            hits: Vec::new(),
            total_results: Some(String::from("not-a-number")),
            error: None,
        };

        // Assert
        assert_eq!(page.total(), 0);
    }
}
