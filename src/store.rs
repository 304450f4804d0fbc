//! Book and author collections backed by embedded SurrealDB.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use surrealdb::engine::local::{ Db, Mem, RocksDb };
use surrealdb::Surreal;
use tracing::{ debug, info, instrument };

use crate::error::{ CatalogError, Result };
use crate::models::{
    AuthorMatch,
    AuthorRecord,
    BookMatch,
    BookRecord,
    NewAuthor,
    NewBook,
    SearchHits,
    SearchType,
};
use crate::query::{ QuerySpec, VectorTarget, AUTHOR_TARGET, BOOK_TARGET };

const MAX_KEY_LEN: usize = 64;

/// Read access to the catalogue: similarity search plus lookup by record key.
///
/// Lookups return `Ok(None)` when the key is well formed but no record exists.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn vector_search(&self, query: &QuerySpec) -> Result<SearchHits>;

    async fn find_book(&self, key: &str) -> Result<Option<BookRecord>>;

    async fn find_author(&self, key: &str) -> Result<Option<AuthorRecord>>;
}

pub struct SurrealCatalog {
    db: Surreal<Db>,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: usize,
}

impl SurrealCatalog {
    /// Opens (or creates) an on-disk catalogue and defines its schema.
    pub async fn open(path: &Path, namespace: &str, database: &str, dimension: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Surreal::new::<RocksDb>(&*path.to_string_lossy()).await?;
        info!(path = %path.display(), "Opened catalogue database");
        Self::init(db, namespace, database, dimension).await
    }

    /// An empty catalogue that lives only as long as the process.
    pub async fn in_memory(namespace: &str, database: &str, dimension: usize) -> Result<Self> {
        let db = Surreal::new::<Mem>(()).await?;
        Self::init(db, namespace, database, dimension).await
    }

    async fn init(db: Surreal<Db>, namespace: &str, database: &str, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(CatalogError::Config("vector dimension must be positive".to_string()));
        }
        db.use_ns(namespace).use_db(database).await?;

        let catalog = Self { db };
        catalog.define_schema(dimension).await?;
        Ok(catalog)
    }

    async fn define_schema(&self, dimension: usize) -> Result<()> {
        let schema = format!(
            "
            DEFINE TABLE {book} SCHEMAFULL;
            DEFINE FIELD title ON {book} TYPE string;
            DEFINE FIELD author ON {book} TYPE option<string>;
            DEFINE FIELD description ON {book} TYPE option<string>;
            DEFINE FIELD published_year ON {book} TYPE option<int>;
            DEFINE FIELD {book_path} ON {book} TYPE array<float>;
            DEFINE INDEX {book_index} ON {book} FIELDS {book_path} MTREE DIMENSION {dimension} DIST COSINE;

            DEFINE TABLE {author} SCHEMAFULL;
            DEFINE FIELD name ON {author} TYPE string;
            DEFINE FIELD about ON {author} TYPE option<string>;
            DEFINE FIELD born ON {author} TYPE option<string>;
            DEFINE FIELD {author_path} ON {author} TYPE array<float>;
            DEFINE INDEX {author_index} ON {author} FIELDS {author_path} MTREE DIMENSION {dimension} DIST COSINE;
            ",
            book = BOOK_TARGET.collection,
            book_path = BOOK_TARGET.path,
            book_index = BOOK_TARGET.index,
            author = AUTHOR_TARGET.collection,
            author_path = AUTHOR_TARGET.path,
            author_index = AUTHOR_TARGET.index
        );
        self.db.query(schema).await?.check()?;
        debug!(dimension, "Defined catalogue schema");
        Ok(())
    }

    /// Writes a book under its derived key, replacing any earlier version.
    #[instrument(skip(self, book), fields(title = %book.title))]
    pub async fn upsert_book(&self, book: NewBook) -> Result<BookRecord> {
        let key = book.key();
        let stored: Option<BookRecord> = self.db
            .update((BOOK_TARGET.collection, key))
            .content(book).await?;

        stored.ok_or_else(|| CatalogError::Storage("book written but no record returned".to_string()))
    }

    /// Writes an author under its derived key, replacing any earlier version.
    #[instrument(skip(self, author), fields(name = %author.name))]
    pub async fn upsert_author(&self, author: NewAuthor) -> Result<AuthorRecord> {
        let key = author.key();
        let stored: Option<AuthorRecord> = self.db
            .update((AUTHOR_TARGET.collection, key))
            .content(author).await?;

        stored.ok_or_else(|| CatalogError::Storage("author written but no record returned".to_string()))
    }

    pub async fn count(&self, search_type: SearchType) -> Result<usize> {
        let collection = VectorTarget::for_search(search_type).collection;
        let counts: Vec<CountResult> = self.db
            .query(format!("SELECT count() AS count FROM {collection} GROUP ALL")).await?
            .take(0)?;
        Ok(counts.first().map_or(0, |c| c.count))
    }
}

#[async_trait]
impl CatalogStore for SurrealCatalog {
    #[instrument(skip(self, query), fields(collection = query.target.collection))]
    async fn vector_search(&self, query: &QuerySpec) -> Result<SearchHits> {
        let mut response = self.db
            .query(query.to_surql())
            .bind(("vector", query.vector.clone())).await?;

        let hits = match query.search_type {
            SearchType::BookTitle => {
                let books: Vec<BookMatch> = response.take(0)?;
                SearchHits::Books(books)
            }
            SearchType::Author => {
                let authors: Vec<AuthorMatch> = response.take(0)?;
                SearchHits::Authors(authors)
            }
        };
        debug!(hits = hits.len(), "Vector search complete");

        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn find_book(&self, key: &str) -> Result<Option<BookRecord>> {
        let key = validate_key(key)?;
        let book: Option<BookRecord> = self.db.select((BOOK_TARGET.collection, key.to_string())).await?;
        Ok(book)
    }

    #[instrument(skip(self))]
    async fn find_author(&self, key: &str) -> Result<Option<AuthorRecord>> {
        let key = validate_key(key)?;
        let author: Option<AuthorRecord> = self.db.select((
            AUTHOR_TARGET.collection,
            key.to_string(),
        )).await?;
        Ok(author)
    }
}

/// Record keys are plain identifiers: ASCII letters, digits and underscores.
pub fn validate_key(key: &str) -> Result<&str> {
    let well_formed =
        !key.is_empty() &&
        key.len() <= MAX_KEY_LEN &&
        key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if well_formed {
        Ok(key)
    } else {
        Err(CatalogError::MalformedId(format!("'{}' is not a valid record identifier", key)))
    }
}
