//! OMDb API request parameter types.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// Title kind filter for list searches (`type=` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    /// Feature films.
    Movie,
    /// TV series.
    Series,
    /// Individual episodes.
    Episode,
}

impl TitleKind {
    /// Returns the query-string value for this kind.
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }

    /// Cycles to the next kind filter state (`None` -> movie -> series ->
    /// episode -> `None`). Used by the TUI type control.
    #[must_use]
    pub const fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Movie),
            Some(Self::Movie) => Some(Self::Series),
            Some(Self::Series) => Some(Self::Episode),
            Some(Self::Episode) => None,
        }
    }
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl FromStr for TitleKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            other => bail!("unknown title kind: {other} (expected movie, series, or episode)"),
        }
    }
}

/// Plot length for detail fetches (`plot=` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plot {
    /// Abbreviated plot.
    #[default]
    Short,
    /// Full plot text.
    Full,
}

impl Plot {
    /// Returns the query-string value for this plot length.
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

/// Request parameters for a list search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search text (`s=` parameter).
    pub query: String,
    /// Release year filter (`y=` parameter).
    pub year: Option<u16>,
    /// Title kind filter (`type=` parameter).
    pub kind: Option<TitleKind>,
    /// Page number, 1-based (`page=` parameter).
    pub page: u32,
}

impl SearchParams {
    /// Creates parameters for the first page with no filters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            year: None,
            kind: None,
            page: 1,
        }
    }

    /// Sets the release year filter.
    #[must_use]
    pub const fn year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the title kind filter.
    #[must_use]
    pub const fn kind(mut self, kind: TitleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}
