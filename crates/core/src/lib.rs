//! Black Hole core types and utilities

pub mod error;
pub mod storage;
pub mod types;
pub mod validation;

pub use error::{StorageError, ValidationError, ValidationErrors};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageBackend, StorageKeys};
pub use types::{
    AdminStats, Chapter, ChapterDetails, Comment, Favorite, Manga, MangaDetails, MangaStatus,
    Pagination, ReadingProgress, Review, SortBy, User, UserId,
};
pub use validation::Validate;
