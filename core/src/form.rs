//! Create-form coercion.
//!
//! The form holds raw text exactly as typed. `to_new_entry` turns it into the
//! create payload: the title is trimmed and required, numbers are parsed only
//! when something was typed, comma lists are split and cleaned, and free-text
//! fields are sent only when non-empty. Anything that ends up absent is left
//! out of the payload rather than sent as `null`, zero or `[]`.

use crate::error::FormError;
use crate::types::NewEntry;

/// Raw text of the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub title: String,
    pub year: String,
    /// Comma separated.
    pub genres: String,
    pub rating: String,
    pub poster_url: String,
    pub description: String,
    pub director: String,
    /// Comma separated.
    pub cast: String,
}

impl EntryForm {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Reset every field to empty, as after a successful submit.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_new_entry(&self) -> Result<NewEntry, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let rating = parse_number::<f64>("rating", &self.rating)?;
        if let Some(r) = rating.filter(|r| !r.is_finite()) {
            return Err(FormError::InvalidNumber {
                field: "rating",
                value: r.to_string(),
            });
        }

        Ok(NewEntry {
            title: title.to_string(),
            year: parse_number("year", &self.year)?,
            genres: split_list(&self.genres),
            rating,
            poster_url: non_empty(&self.poster_url),
            description: non_empty(&self.description),
            director: non_empty(&self.director),
            cast: split_list(&self.cast),
        })
    }
}

fn parse_number<N: std::str::FromStr>(field: &'static str, raw: &str) -> Result<Option<N>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| FormError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}
