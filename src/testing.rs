use std::collections::HashMap;

use crate::encoder::TextEncoder;
use crate::error::{ CatalogError, Result };
use crate::models::Embedding;

/// Deterministic encoder for tests. Known phrases map to fixed vectors; any
/// other text gets a vector derived from its bytes.
pub struct StubEncoder {
    dimension: usize,
    known: HashMap<String, Embedding>,
    failing: bool,
    blocking_pool_only: bool,
}

impl StubEncoder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            known: HashMap::new(),
            failing: false,
            blocking_pool_only: false,
        }
    }

    /// Panics when `encode` is called from an async worker instead of the
    /// blocking pool.
    pub fn blocking_pool_only(dimension: usize) -> Self {
        Self {
            blocking_pool_only: true,
            ..Self::new(dimension)
        }
    }

    pub fn failing(dimension: usize) -> Self {
        Self {
            failing: true,
            ..Self::new(dimension)
        }
    }

    pub fn with(mut self, text: &str, vector: Embedding) -> Self {
        assert_eq!(vector.len(), self.dimension);
        self.known.insert(text.to_string(), vector);
        self
    }
}

impl TextEncoder for StubEncoder {
    fn encode(&self, text: &str) -> Result<Embedding> {
        if self.blocking_pool_only {
            // block_on panics inside an async execution context.
            tokio::runtime::Handle::current().block_on(async {});
        }
        if self.failing {
            return Err(CatalogError::Encoding("stub encoder unavailable".to_string()));
        }
        if text.trim().is_empty() {
            return Err(CatalogError::Encoding("text to encode is empty".to_string()));
        }
        if let Some(vector) = self.known.get(text) {
            return Ok(vector.clone());
        }

        let mut vector = vec![1.0; self.dimension];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimension] += f32::from(byte) / 255.0;
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
