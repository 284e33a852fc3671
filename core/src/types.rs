//! Domain DTOs for the movie catalog API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! `Entry` is lenient on input: the remote service may omit optional fields or
//! send `null` for them, and `genres`/`cast` collapse to empty sequences in both
//! cases. `NewEntry` is strict on output: anything absent is left out of the
//! JSON body entirely rather than sent as `null` or `[]`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the remote service. Never parsed or generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single movie as reported by the remote collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cast: Vec<String>,
}

impl Entry {
    /// Whether the rating sits inside the 0-10 scale the catalog labels imply.
    ///
    /// Display helper only. Ratings outside the range are still accepted and
    /// shown; the remote service decides what is valid.
    pub fn rating_in_range(&self) -> bool {
        self.rating.is_none_or(|r| (0.0..=10.0).contains(&r))
    }
}

/// Request payload for creating a new entry. Produced by
/// [`EntryForm::to_new_entry`](crate::form::EntryForm::to_new_entry).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
}

/// Free-text search and genre filter for list requests.
///
/// An empty (or blank) value means "unset". Values are otherwise passed to the
/// remote service exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub query: String,
    pub genre: String,
}

impl Filters {
    pub fn new(query: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            genre: genre.into(),
        }
    }

    /// True when neither value would be attached to a list request.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.query) && is_blank(&self.genre)
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
