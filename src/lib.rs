//! Semantic search over a catalogue of books and authors.
//!
//! Query text is encoded into a vector, matched against precomputed title or
//! author vectors in SurrealDB, and rendered as an HTML result list with
//! per-record detail pages.

pub mod config;
pub mod dispatcher;
pub mod encoder;
pub mod error;
pub mod models;
pub mod projector;
pub mod query;
pub mod seed;
pub mod server;
pub mod store;
pub mod views;

#[cfg(test)]
mod testing;

pub use error::{ CatalogError, Result };
