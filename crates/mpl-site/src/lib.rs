// ABOUTME: Site content for multipass-labs: store, REST handlers, pages.
// ABOUTME: Everything here is transport-agnostic; the binary owns HTTP.

pub mod api;
pub mod pages;
pub mod seed;
pub mod store;

pub use api::ApiResponse;
pub use store::{ContentStore, GalleryItem, GalleryQuery, MemoryStore, Post, PostQuery};
