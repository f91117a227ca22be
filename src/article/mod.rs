//! Articles materialized from feed entries.

pub mod repository;
pub mod types;

pub use repository::ArticleRepository;
pub use types::{Article, NewArticle};
