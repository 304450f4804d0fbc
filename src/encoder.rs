//! Text-to-vector encoding.

use fastembed::{ EmbeddingModel, InitOptions, TextEmbedding };
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{ debug, info };

use crate::error::{ CatalogError, Result };
use crate::models::Embedding;

/// Longer inputs are truncated to this many tokens.
pub const MAX_TOKENS: usize = 128;

pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Maps text onto a fixed-length vector.
///
/// Encoding is CPU-bound and synchronous; async callers should run it on the
/// blocking pool.
pub trait TextEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Embedding>;

    fn dimension(&self) -> usize;
}

/// Runs `encoder` on the blocking thread pool so inference never stalls the
/// async workers.
pub async fn encode_blocking(encoder: &Arc<dyn TextEncoder>, text: String) -> Result<Embedding> {
    let encoder = Arc::clone(encoder);
    tokio::task
        ::spawn_blocking(move || encoder.encode(&text)).await
        .map_err(|e| CatalogError::Encoding(format!("encoder task failed: {}", e)))?
}

pub struct FastEmbedEncoder {
    model: TextEmbedding,
    dimension: usize,
}

impl FastEmbedEncoder {
    pub fn new(model_id: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        let (model_name, model_code, dimension) = resolve_model(model_id)?;

        let mut options = InitOptions::new(model_name)
            .with_max_length(MAX_TOKENS)
            .with_show_download_progress(true);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options).map_err(|e| CatalogError::Model(e.to_string()))?;
        info!(model = %model_code, dimension, "Loaded text encoder");

        Ok(Self { model, dimension })
    }
}

impl TextEncoder for FastEmbedEncoder {
    fn encode(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(CatalogError::Encoding("text to encode is empty".to_string()));
        }

        let mut embeddings = self.model
            .embed(vec![text], None)
            .map_err(|e| CatalogError::Encoding(e.to_string()))?;
        let embedding = embeddings
            .pop()
            .ok_or_else(|| CatalogError::Encoding("model returned no embedding".to_string()))?;

        if embedding.len() != self.dimension {
            return Err(
                CatalogError::Encoding(
                    format!("expected {} dimensions, model returned {}", self.dimension, embedding.len())
                )
            );
        }
        debug!(chars = text.len(), "Encoded text");

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Finds a supported model by its full code (`org/name-onnx`), or by the bare
/// name with the publisher and `-onnx` suffix dropped. Matching ignores case.
fn resolve_model(model_id: &str) -> Result<(EmbeddingModel, String, usize)> {
    let wanted = model_id.trim().to_lowercase();

    TextEmbedding::list_supported_models()
        .into_iter()
        .find(|info| {
            let code = info.model_code.to_lowercase();
            let name = code.rsplit('/').next().unwrap_or(&code);
            code == wanted || name == wanted || name.trim_end_matches("-onnx") == wanted
        })
        .map(|info| (info.model, info.model_code, info.dim))
        .ok_or_else(|| CatalogError::Config(format!("unsupported embedding model: {}", model_id)))
}
