//! Versioned document persistence for the marketplace.
//!
//! Every entity is stored as a JSON document in a named collection, carrying
//! a [`Version`] counter. Writes are compare-and-swap: the caller submits the
//! version it read, and the store rejects the write with
//! [`StoreError::VersionConflict`] when the stored version has advanced.
//!
//! Two backends implement the same [`DocumentStore`] trait:
//! - [`InMemoryStore`] for tests and local development
//! - [`PostgresStore`] backed by a JSONB documents table

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::Version;
pub use document::Document;
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::DocumentStore;
