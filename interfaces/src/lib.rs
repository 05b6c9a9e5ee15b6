pub mod defs;
pub mod memory;
pub mod sqlite;

pub use defs::{Article, ArticleSource, ArticleSourceRef, KeyValueStore, Role};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
