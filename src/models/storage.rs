use crate::detail::SnippetStore;
use crate::models::{Snippet, SnippetFile};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetDatabase {
    pub snippets: Vec<Snippet>,
}

/// Storage Manager for disk operations
#[derive(Debug)]
pub struct StorageManager {
    database_file: PathBuf,
}

impl StorageManager {
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Failed to get data directory")?
            .join("snipdeck");

        Self::with_data_dir(data_dir)
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        Ok(Self {
            database_file: data_dir.join("database.json"),
        })
    }

    pub fn load_database(&self) -> Result<SnippetDatabase> {
        if !self.database_file.exists() {
            return Ok(SnippetDatabase::default());
        }

        let content =
            fs::read_to_string(&self.database_file).context("Failed to read database file")?;

        serde_json::from_str(&content).context("Failed to parse database JSON")
    }

    pub fn save_database(&self, db: &SnippetDatabase) -> Result<()> {
        let content = serde_json::to_string_pretty(db).context("Failed to serialize database")?;

        fs::write(&self.database_file, content).context("Failed to write database file")
    }
}

/// Snippet store persisted as a single JSON document.
///
/// Every mutation is written through to disk before returning.
#[derive(Debug)]
pub struct JsonSnippetStore {
    storage: StorageManager,
    db: SnippetDatabase,
    selected: Option<Uuid>,
}

impl JsonSnippetStore {
    pub fn open(storage: StorageManager) -> Result<Self> {
        let db = storage.load_database()?;
        let selected = db.snippets.first().map(|s| s.id);

        Ok(Self {
            storage,
            db,
            selected,
        })
    }

    /// Seeds a sample snippet so a fresh install has something to show
    pub fn seed_if_empty(&mut self) -> Result<()> {
        if !self.db.snippets.is_empty() {
            return Ok(());
        }

        let mut snippet = Snippet::with_files(
            "Hello snipdeck",
            vec![
                SnippetFile::with_content("main.rs", "fn main() {\n    println!(\"hello\");\n}\n"),
                SnippetFile::with_content("README.md", "# Hello\n\nPress `e` to edit.\n"),
            ],
        );
        snippet.description = String::from("A starter snippet with two files");
        snippet.tags = vec![String::from("rust"), String::from("demo")];

        self.selected = Some(snippet.id);
        self.db.snippets.push(snippet);
        self.persist()
    }

    pub fn find(&self, name_or_id: &str) -> Option<&Snippet> {
        if let Ok(id) = Uuid::parse_str(name_or_id) {
            return self.db.snippets.iter().find(|s| s.id == id);
        }
        let needle = name_or_id.to_lowercase();
        self.db
            .snippets
            .iter()
            .find(|s| s.name.to_lowercase() == needle)
            .or_else(|| {
                self.db
                    .snippets
                    .iter()
                    .find(|s| s.name.to_lowercase().contains(&needle))
            })
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    fn persist(&self) -> Result<()> {
        self.storage.save_database(&self.db)
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.db
            .snippets
            .iter()
            .position(|s| s.id == id)
            .with_context(|| format!("Snippet {id} not found"))
    }
}

impl SnippetStore for JsonSnippetStore {
    fn snippets(&self) -> &[Snippet] {
        &self.db.snippets
    }

    fn selected_snippet(&self) -> Option<&Snippet> {
        let id = self.selected?;
        self.db.snippets.iter().find(|s| s.id == id)
    }

    fn select_snippet(&mut self, id: Option<Uuid>) {
        self.selected = id;
    }

    fn update_snippet(&mut self, mut snippet: Snippet) -> Result<()> {
        let index = self.position(snippet.id)?;
        snippet.update_at = Utc::now();
        self.db.snippets[index] = snippet;
        self.persist()
    }

    fn delete_snippet(&mut self, snippet: &Snippet) -> Result<()> {
        let index = self.position(snippet.id)?;
        self.db.snippets.remove(index);
        self.persist()
    }

    fn increase_copy_time(&mut self, snippet: &Snippet) -> Result<()> {
        let index = self.position(snippet.id)?;
        self.db.snippets[index].copy_count += 1;
        self.persist()
    }
}
