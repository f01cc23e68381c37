//! Data models for Bookshelf

pub mod book;
pub mod pagination;
pub mod validation;

// Re-export commonly used types
pub use book::{Book, BookPage, BookPatch, BookPayload, BookQuery, NewBook};
pub use pagination::{PageRequest, Paginated};
