//! Loads books and authors from JSON files, encoding each one on the way in.

use serde::Deserialize;
use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::Arc;
use tracing::{ info, warn };
use walkdir::WalkDir;

use crate::encoder::{ encode_blocking, TextEncoder };
use crate::error::Result;
use crate::models::{ AuthorEntry, BookEntry, NewAuthor, NewBook };
use crate::store::SurrealCatalog;

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    books: Vec<BookEntry>,
    #[serde(default)]
    authors: Vec<AuthorEntry>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub books: usize,
    pub authors: usize,
    pub skipped_files: Vec<PathBuf>,
}

/// Records are written under keys derived from their content, so seeding the
/// same files again replaces records instead of duplicating them.
pub struct Seeder<'a> {
    encoder: Arc<dyn TextEncoder>,
    catalog: &'a SurrealCatalog,
}

impl<'a> Seeder<'a> {
    pub fn new(encoder: Arc<dyn TextEncoder>, catalog: &'a SurrealCatalog) -> Self {
        Self { encoder, catalog }
    }

    pub async fn seed_directory(&self, dir_path: &Path) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for entry in WalkDir::new(dir_path).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
            if !entry.file_type().is_file() || !is_json {
                continue;
            }

            let file = match read_catalog_file(path) {
                Ok(file) => file,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.skipped_files.push(path.to_path_buf());
                    continue;
                }
            };

            let (books, authors) = self.seed_file(file).await?;
            info!(file = %path.display(), books, authors, "Seeded catalogue file");
            report.books += books;
            report.authors += authors;
        }

        Ok(report)
    }

    async fn seed_file(&self, file: CatalogFile) -> Result<(usize, usize)> {
        let (mut books, mut authors) = (0, 0);

        for book in file.books {
            let title_vector = encode_blocking(&self.encoder, book.title.clone()).await?;
            self.catalog.upsert_book(NewBook::new(book, title_vector)).await?;
            books += 1;
        }
        for author in file.authors {
            let author_vector = encode_blocking(&self.encoder, author.name.clone()).await?;
            self.catalog.upsert_author(NewAuthor::new(author, author_vector)).await?;
            authors += 1;
        }

        Ok((books, authors))
    }
}

fn read_catalog_file(path: &Path) -> Result<CatalogFile> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::models::SearchType;
    use crate::testing::StubEncoder;
    use tempfile::TempDir;

    async fn setup_catalog() -> SurrealCatalog {
        SurrealCatalog::in_memory("test", "catalog", 4).await.expect("Failed to create catalog")
    }

    #[tokio::test]
    async fn test_seed_directory() -> Result<()> {
        let catalog = setup_catalog().await;
        let encoder = StubEncoder::new(4);
        let test_dir = TempDir::new()?;

        let files = [
            (
                "books.json",
                r#"{"books": [
                    {"title": "Solaris", "author": "Stanislaw Lem", "published_year": 1961},
                    {"title": "The Dispossessed", "description": "An ambiguous utopia."}
                ]}"#,
            ),
            ("nested/authors.json", r#"{"authors": [{"name": "Stanislaw Lem", "about": ""}]}"#),
            ("broken.json", "{ not json"),
            ("notes.txt", "ignored"),
        ];
        for (path, content) in files {
            let full_path = test_dir.path().join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full_path, content)?;
        }

        let report = Seeder::new(Arc::new(encoder), &catalog).seed_directory(test_dir.path()).await?;

        assert_eq!(report.books, 2);
        assert_eq!(report.authors, 1);
        assert_eq!(report.skipped_files, vec![test_dir.path().join("broken.json")]);
        assert_eq!(catalog.count(SearchType::BookTitle).await?, 2);
        assert_eq!(catalog.count(SearchType::Author).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_encoding_failure_aborts_seed() -> Result<()> {
        let catalog = setup_catalog().await;
        let encoder = StubEncoder::failing(4);
        let test_dir = TempDir::new()?;
        fs::write(test_dir.path().join("books.json"), r#"{"books": [{"title": "Kindred"}]}"#)?;

        let result = Seeder::new(Arc::new(encoder), &catalog).seed_directory(test_dir.path()).await;
        assert!(matches!(result, Err(CatalogError::Encoding(_))));
        assert_eq!(catalog.count(SearchType::BookTitle).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_reseeding_replaces_records() -> Result<()> {
        let catalog = setup_catalog().await;
        let encoder: Arc<dyn TextEncoder> = Arc::new(StubEncoder::new(4));
        let test_dir = TempDir::new()?;
        fs::write(
            test_dir.path().join("catalog.json"),
            r#"{"books": [{"title": "Kindred", "author": "Octavia E. Butler"}],
                "authors": [{"name": "Octavia E. Butler"}]}"#
        )?;

        let seeder = Seeder::new(encoder, &catalog);
        let first = seeder.seed_directory(test_dir.path()).await?;
        let second = seeder.seed_directory(test_dir.path()).await?;

        assert_eq!(first, second);
        assert_eq!(catalog.count(SearchType::BookTitle).await?, 1);
        assert_eq!(catalog.count(SearchType::Author).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_seeding_encodes_on_blocking_pool() -> Result<()> {
        let catalog = setup_catalog().await;
        let test_dir = TempDir::new()?;
        fs::write(test_dir.path().join("books.json"), r#"{"books": [{"title": "Dawn"}]}"#)?;

        let encoder = Arc::new(StubEncoder::blocking_pool_only(4));
        let report = Seeder::new(encoder, &catalog).seed_directory(test_dir.path()).await?;

        assert_eq!(report.books, 1);
        assert_eq!(catalog.count(SearchType::BookTitle).await?, 1);

        Ok(())
    }
}
