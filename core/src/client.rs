//! Stateless HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! host executes the actual HTTP round-trip.
//!
//! The list builder is the query builder: a filter value is attached only when
//! it has non-blank content, and then verbatim. Form fields are trimmed by
//! `EntryForm`; filter text never is.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{is_blank, Entry, EntryId, Filters, NewEntry};

const COLLECTION_PATH: &str = "/api/movies";

/// Synchronous, stateless client for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_entries(&self, filters: &Filters) -> HttpRequest {
        let mut query = Vec::new();
        if !is_blank(&filters.query) {
            query.push(("q".to_string(), filters.query.clone()));
        }
        if !is_blank(&filters.genre) {
            query.push(("genre".to_string(), filters.genre.clone()));
        }
        HttpRequest {
            method: HttpMethod::Get,
            url: self.collection_url(),
            query,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_entry(&self, input: &NewEntry) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.collection_url(),
            query: Vec::new(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_entry(&self, id: &EntryId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/{}", self.collection_url(), urlencoding::encode(id.as_str())),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_entries(&self, response: HttpResponse) -> Result<Vec<Entry>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Any 2xx counts as created. The stored entry is returned when the
    /// service echoes it back; callers re-list rather than rely on it.
    pub fn parse_create_entry(&self, response: HttpResponse) -> Result<Option<Entry>, ApiError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body).ok())
    }

    pub fn parse_delete_entry(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn collection_url(&self) -> String {
        format!("{}{COLLECTION_PATH}", self.base_url)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CatalogClient {
        CatalogClient::new("http://localhost:8000")
    }

    #[test]
    fn build_list_without_filters_has_no_params() {
        let req = client().build_list_entries(&Filters::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/movies");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_omits_blank_filters() {
        let req = client().build_list_entries(&Filters::new("   ", ""));
        assert!(req.query.is_empty());
    }

    #[test]
    fn build_list_passes_values_verbatim() {
        let req = client().build_list_entries(&Filters::new(" the matrix ", "Sci-Fi"));
        assert_eq!(
            req.query,
            vec![
                ("q".to_string(), " the matrix ".to_string()),
                ("genre".to_string(), "Sci-Fi".to_string()),
            ]
        );
    }

    #[test]
    fn build_list_with_only_genre() {
        let req = client().build_list_entries(&Filters::new("", "Drama"));
        assert_eq!(req.query_param("q"), None);
        assert_eq!(req.query_param("genre"), Some("Drama"));
    }

    #[test]
    fn build_create_entry_produces_json_post() {
        let input = NewEntry {
            title: "Arrival".to_string(),
            year: Some(2016),
            rating: Some(7.9),
            ..NewEntry::default()
        };
        let req = client().build_create_entry(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/movies");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "title": "Arrival", "year": 2016, "rating": 7.9 })
        );
    }

    #[test]
    fn build_delete_entry_targets_item_path() {
        let req = client().build_delete_entry(&EntryId::new("665f1c2a"));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8000/api/movies/665f1c2a");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_delete_entry_encodes_the_id() {
        let req = client().build_delete_entry(&EntryId::new("a/b c"));
        assert_eq!(req.url, "http://localhost:8000/api/movies/a%2Fb%20c");
    }

    #[test]
    fn parse_list_entries_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":"1","title":"Arrival","year":2016,"genres":["Sci-Fi"],"rating":7.9}]"#,
        );
        let entries = client().parse_list_entries(response).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Arrival");
        assert_eq!(entries[0].year, Some(2016));
        assert_eq!(entries[0].genres, vec!["Sci-Fi"]);
    }

    #[test]
    fn parse_list_entries_server_error() {
        let err = client()
            .parse_list_entries(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_list_entries_bad_json() {
        let err = client()
            .parse_list_entries(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_list_entries_object_is_not_a_list() {
        let err = client()
            .parse_list_entries(HttpResponse::new(200, r#"{"id":"1","title":"x"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_create_entry_accepts_any_2xx() {
        let created = client()
            .parse_create_entry(HttpResponse::new(201, r#"{"id":"9","title":"Arrival"}"#))
            .unwrap();
        assert_eq!(created.map(|e| e.id), Some(EntryId::new("9")));

        let created = client().parse_create_entry(HttpResponse::new(200, "")).unwrap();
        assert!(created.is_none());
    }

    #[test]
    fn parse_create_entry_wrong_status() {
        let err = client()
            .parse_create_entry(HttpResponse::new(422, "title required"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 422, .. }));
    }

    #[test]
    fn parse_delete_entry_success_without_body() {
        assert!(client().parse_delete_entry(HttpResponse::new(204, "")).is_ok());
        assert!(client().parse_delete_entry(HttpResponse::new(200, "")).is_ok());
    }

    #[test]
    fn parse_delete_entry_not_found() {
        let err = client()
            .parse_delete_entry(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = CatalogClient::new("http://localhost:8000/");
        let req = client.build_list_entries(&Filters::default());
        assert_eq!(req.url, "http://localhost:8000/api/movies");
    }
}
