pub mod snippet;
pub mod storage;

pub use snippet::{Snippet, SnippetFile, file_extension, parse_tags, same_tags};
pub use storage::{JsonSnippetStore, StorageManager};
