use serde::{Deserialize, Serialize};
use surrealdb::opt::RecordId;

pub type Embedding = Vec<f32>;

/// Which collection a similarity query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchType {
    BookTitle,
    Author,
}

impl SearchType {
    /// Parses the `search_type` form value. Unknown values yield `None`.
    pub fn from_form(value: &str) -> Option<Self> {
        match value {
            "book_title" => Some(Self::BookTitle),
            "author" => Some(Self::Author),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookTitle => "book_title",
            Self::Author => "author",
        }
    }

    /// Label shown next to results.
    pub fn label(self) -> &'static str {
        match self {
            Self::BookTitle => "Book",
            Self::Author => "Author",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub search_type: SearchType,
    pub text: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookRecord {
    pub id: RecordId,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthorRecord {
    pub id: RecordId,
    pub name: String,
    pub about: Option<String>,
    pub born: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookMatch {
    pub id: RecordId,
    pub title: String,
    pub author: Option<String>,
    pub score: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthorMatch {
    pub id: RecordId,
    pub name: String,
    pub score: f32,
}

/// Ranked matches from exactly one collection, in store order.
#[derive(Debug, Clone)]
pub enum SearchHits {
    Books(Vec<BookMatch>),
    Authors(Vec<AuthorMatch>),
}

impl SearchHits {
    pub fn search_type(&self) -> SearchType {
        match self {
            Self::Books(_) => SearchType::BookTitle,
            Self::Authors(_) => SearchType::Author,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Books(hits) => hits.len(),
            Self::Authors(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A book as found in seed files.
#[derive(Debug, Deserialize, Clone)]
pub struct BookEntry {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_year: Option<i64>,
}

/// An author as found in seed files.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthorEntry {
    pub name: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub born: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewBook {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,
    pub title_vector: Embedding,
}

impl NewBook {
    /// Stable record key derived from title and author.
    pub fn key(&self) -> String {
        slug_key(&[Some(self.title.as_str()), self.author.as_deref()])
    }

    pub fn new(entry: BookEntry, title_vector: Embedding) -> Self {
        Self {
            title: entry.title,
            author: entry.author,
            description: entry.description,
            published_year: entry.published_year,
            title_vector,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct NewAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born: Option<String>,
    pub author_vector: Embedding,
}

impl NewAuthor {
    /// Stable record key derived from the author's name.
    pub fn key(&self) -> String {
        slug_key(&[Some(self.name.as_str())])
    }

    pub fn new(entry: AuthorEntry, author_vector: Embedding) -> Self {
        Self {
            name: entry.name,
            about: entry.about,
            born: entry.born,
            author_vector,
        }
    }
}

const MAX_SLUG_LEN: usize = 64;

/// Lowercase ASCII alphanumerics joined by single underscores. Other
/// alphanumeric characters are written as their hex code point.
fn slug_key(parts: &[Option<&str>]) -> String {
    let mut slug = String::new();
    for c in parts.iter().flatten().flat_map(|part| part.chars().chain(['_'])) {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if c.is_alphanumeric() {
            slug.push_str(&format!("{:x}", c as u32));
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() { "untitled".to_string() } else { slug.to_string() }
}

/// The key part of a record id, as used in detail URLs.
pub fn record_key(id: &RecordId) -> String {
    id.id.to_raw()
}
