//! Async host for `catalog-core`.
//!
//! # Overview
//! Runs the core's requests over the network and owns the live `Catalog`
//! component: the view state a UI renders from, the active filters, and the
//! create/delete operations that keep both in step with the remote collection.
//!
//! # Design
//! - `Transport` is the seam between the component and the network, so tests
//!   can script responses and hold them back to reorder them.
//! - Configuration is layered with figment: defaults, optional TOML file,
//!   then `CATALOG_*` environment variables.

pub mod catalog;
pub mod config;
pub mod transport;

pub use catalog::{Catalog, Confirm, CreateError, RemoveOutcome, DELETE_PROMPT};
pub use config::{CatalogConfig, ConfigError};
pub use transport::{ReqwestTransport, Transport};
