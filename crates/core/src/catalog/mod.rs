//! Metadata lookup against an external catalog service.
//!
//! This module provides a `CatalogSource` trait for resolving a content id
//! to canonical title metadata, a Cinemeta-compatible client, and the
//! cached `MetadataResolver` the pipeline uses.

mod cinemeta;
mod resolver;
mod types;

pub use cinemeta::CinemetaClient;
pub use resolver::MetadataResolver;
pub use types::{CatalogError, CatalogSource, Metadata};
