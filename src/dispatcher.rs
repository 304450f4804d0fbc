//! Request handling: search form, vector search, and detail pages.
//!
//! Every request is independent. The dispatcher only holds the encoder and the
//! store, both shared read-only across requests.

use axum::http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{ debug, error, info, instrument, warn };

use crate::encoder::{ encode_blocking, TextEncoder };
use crate::error::{ CatalogError, Result };
use crate::models::{ Query, SearchHits, SearchType };
use crate::projector::{ project_author, project_book, project_hits, AuthorView, BookView };
use crate::query::build_query;
use crate::store::CatalogStore;
use crate::views::SearchPage;

/// Raw search form. Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_type: String,
    #[serde(default)]
    pub query: String,
}

impl SearchForm {
    /// `None` when the search type is unknown or the query is blank.
    pub fn to_query(&self) -> Option<Query> {
        let search_type = SearchType::from_form(self.search_type.trim())?;
        let text = self.query.trim();
        if text.is_empty() {
            return None;
        }
        Some(Query {
            search_type,
            text: text.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Search(SearchPage),
    Book(BookView),
    Author(AuthorView),
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub page: Page,
}

impl Reply {
    fn ok(page: Page) -> Self {
        Self { status: StatusCode::OK, page }
    }

    fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            page: Page::Message(message.to_string()),
        }
    }

    fn server_error(err: &CatalogError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            page: Page::Message(err.to_string()),
        }
    }
}

pub struct Dispatcher {
    encoder: Arc<dyn TextEncoder>,
    store: Arc<dyn CatalogStore>,
}

impl Dispatcher {
    pub fn new(encoder: Arc<dyn TextEncoder>, store: Arc<dyn CatalogStore>) -> Self {
        Self { encoder, store }
    }

    /// The empty search form.
    pub fn home(&self) -> Reply {
        Reply::ok(Page::Search(SearchPage::default()))
    }

    #[instrument(skip(self, form), fields(search_type = %form.search_type))]
    pub async fn search(&self, form: SearchForm) -> Reply {
        let Some(query) = form.to_query() else {
            debug!("Unrecognised search type or blank query, showing empty form");
            return self.home();
        };

        match self.run_query(&query).await {
            Ok(hits) => {
                info!(hits = hits.len(), "Search complete");
                Reply::ok(
                    Page::Search(SearchPage {
                        search_type: Some(query.search_type),
                        query: query.text,
                        results: Some(project_hits(hits)),
                    })
                )
            }
            Err(e) => {
                error!("Search failed: {}", e);
                Reply::server_error(&e)
            }
        }
    }

    /// Encodes the query text and runs the similarity search it implies.
    pub async fn run_query(&self, query: &Query) -> Result<SearchHits> {
        let vector = encode_blocking(&self.encoder, query.text.clone()).await?;
        let spec = build_query(vector, query.search_type);
        self.store.vector_search(&spec).await
    }

    #[instrument(skip(self))]
    pub async fn book_detail(&self, key: &str) -> Reply {
        match self.store.find_book(key).await {
            Ok(Some(book)) => Reply::ok(Page::Book(project_book(book))),
            Ok(None) => Reply::not_found("Book not found"),
            Err(e) => {
                warn!("Book lookup failed: {}", e);
                Reply::server_error(&e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn author_detail(&self, key: &str) -> Reply {
        match self.store.find_author(key).await {
            Ok(Some(author)) => Reply::ok(Page::Author(project_author(author))),
            Ok(None) => Reply::not_found("Author not found"),
            Err(e) => {
                warn!("Author lookup failed: {}", e);
                Reply::server_error(&e)
            }
        }
    }
}
