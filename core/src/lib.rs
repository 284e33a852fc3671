//! Sans-IO core of the movie catalog client.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), coerces the create form into a
//! payload, and keeps the view state the UI renders from.
//!
//! # Design
//! - `CatalogClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `ViewState` is the only mutable piece. It sequences list requests so a
//!   slow, superseded response can never overwrite a newer one.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod state;
pub mod types;

pub use client::CatalogClient;
pub use error::{ApiError, FormError};
pub use form::EntryForm;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{RefreshTicket, Status, ViewState};
pub use types::{Entry, EntryId, Filters, NewEntry};
