//! API client library for kinodex.
//!
//! Provides a typed client for the OMDb API (<https://www.omdbapi.com/>).

/// OMDb API client.
pub mod omdb;
