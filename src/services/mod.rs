//! Business logic services

pub mod books;

use crate::{config::PaginationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            books: books::BookService::new(repository, pagination),
        }
    }
}
