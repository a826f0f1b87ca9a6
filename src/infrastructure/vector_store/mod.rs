//! Vector index persistence

mod file_store;

pub use file_store::{FileVectorStore, INDEX_FILE};
