//! Similarity query construction.
//!
//! Maps a search type onto the collection, vector index and vector field it
//! searches, and renders the resulting [`QuerySpec`] as a SurrealQL KNN query.

use crate::models::{ Embedding, SearchType };

/// Approximate matches the index examines before ranking down to [`RESULT_LIMIT`].
pub const CANDIDATE_POOL: usize = 100;
pub const RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorTarget {
    pub collection: &'static str,
    pub index: &'static str,
    pub path: &'static str,
}

pub const BOOK_TARGET: VectorTarget = VectorTarget {
    collection: "book",
    index: "title_vector_index",
    path: "title_vector",
};

pub const AUTHOR_TARGET: VectorTarget = VectorTarget {
    collection: "author",
    index: "author_vector_index",
    path: "author_vector",
};

impl VectorTarget {
    pub fn for_search(search_type: SearchType) -> Self {
        match search_type {
            SearchType::BookTitle => BOOK_TARGET,
            SearchType::Author => AUTHOR_TARGET,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub search_type: SearchType,
    pub target: VectorTarget,
    pub vector: Embedding,
    pub num_candidates: usize,
    pub limit: usize,
}

pub fn build_query(vector: Embedding, search_type: SearchType) -> QuerySpec {
    QuerySpec {
        search_type,
        target: VectorTarget::for_search(search_type),
        vector,
        num_candidates: CANDIDATE_POOL,
        limit: RESULT_LIMIT,
    }
}

impl QuerySpec {
    /// SurrealQL for this query. The vector is bound as `$vector`.
    ///
    /// The M-tree KNN clause fetches the `num_candidates` nearest records, which
    /// are then ranked by cosine similarity and cut to `limit`.
    pub fn to_surql(&self) -> String {
        let display_fields = match self.search_type {
            SearchType::BookTitle => "id, title, author",
            SearchType::Author => "id, name",
        };
        let VectorTarget { collection, path, .. } = self.target;

        format!(
            "SELECT {display_fields}, vector::similarity::cosine({path}, $vector) AS score \
             FROM {collection} \
             WHERE {path} <|{candidates}|> $vector \
             ORDER BY score DESC \
             LIMIT {limit}",
            limit = self.limit,
            candidates = self.num_candidates
        )
    }
}
