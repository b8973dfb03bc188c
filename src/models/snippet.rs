use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One named content blob inside a snippet.
///
/// `key` is generated on the client when the file is created and never
/// changes afterwards, so it identifies the file across reorders and renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetFile {
    pub key: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl SnippetFile {
    /// Creates an empty file with a fresh key
    pub fn new() -> Self {
        Self::with_content(String::new(), String::new())
    }

    pub fn with_content(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Uuid::new_v4(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Name shown in file tabs, falls back to "untitled"
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "untitled"
        } else {
            &self.name
        }
    }

    /// Extension used for syntax lookup: everything after the last dot
    pub fn extension(&self) -> &str {
        file_extension(&self.name)
    }
}

impl Default for SnippetFile {
    fn default() -> Self {
        Self::new()
    }
}

pub fn file_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub files: Vec<SnippetFile>,
    pub create_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
    #[serde(default)]
    pub copy_count: u32,
}

impl Snippet {
    /// A new snippet always starts with one empty file
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            files: vec![SnippetFile::new()],
            create_at: now,
            update_at: now,
            copy_count: 0,
        }
    }

    pub fn with_files(name: impl Into<String>, files: Vec<SnippetFile>) -> Self {
        let mut snippet = Self::new(name);
        if !files.is_empty() {
            snippet.files = files;
        }
        snippet
    }

    /// Tags with blank entries removed, in stored order
    pub fn visible_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !tag.trim().is_empty())
            .collect()
    }
}

/// Compares two tag lists as multisets: order is ignored, duplicates count.
pub fn same_tags(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<&str> = a.iter().map(String::as_str).collect();
    let mut right: Vec<&str> = b.iter().map(String::as_str).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Splits free-form tag input. Accepts commas or whitespace and strips a
/// leading `#`.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|tag| tag.trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
