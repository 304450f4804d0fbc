//! Shapes store records into view models.
//!
//! Projection never reorders hits or touches identifiers; it only turns records
//! into display-ready values.

use crate::models::{ record_key, AuthorRecord, BookRecord, SearchHits };

#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub href: String,
    pub heading: String,
    pub subheading: Option<String>,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookView {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorView {
    pub id: String,
    pub name: String,
    /// Always present; a missing biography becomes the empty string.
    pub about: String,
    pub born: Option<String>,
}

pub fn project_hits(hits: SearchHits) -> Vec<ResultItem> {
    match hits {
        SearchHits::Books(books) =>
            books
                .into_iter()
                .map(|book| ResultItem {
                    href: format!("/book/{}", record_key(&book.id)),
                    heading: book.title,
                    subheading: book.author,
                    score: book.score,
                })
                .collect(),
        SearchHits::Authors(authors) =>
            authors
                .into_iter()
                .map(|author| ResultItem {
                    href: format!("/author/{}", record_key(&author.id)),
                    heading: author.name,
                    subheading: None,
                    score: author.score,
                })
                .collect(),
    }
}

pub fn project_book(record: BookRecord) -> BookView {
    BookView {
        id: record_key(&record.id),
        title: record.title,
        author: record.author,
        description: record.description,
        published_year: record.published_year,
    }
}

pub fn project_author(record: AuthorRecord) -> AuthorView {
    AuthorView {
        id: record_key(&record.id),
        name: record.name,
        about: record.about.unwrap_or_default(),
        born: record.born,
    }
}
