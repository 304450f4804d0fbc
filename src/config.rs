//! Command line and environment configuration.
//!
//! Every option can also come from a `BOOK_SEARCH_*` environment variable,
//! which in turn may be set in a `.env` file.

use clap::{ Args, Parser, Subcommand };
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::encoder::DEFAULT_MODEL;
use crate::error::{ CatalogError, Result };

#[derive(Parser, Debug)]
#[command(name = "book-search")]
#[command(about = "Semantic search over books and authors")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the search front-end over HTTP
    Serve {
        #[arg(long, env = "BOOK_SEARCH_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// Seed the catalogue from this directory before serving
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Encode and store every book and author found in a directory of JSON files
    Seed {
        dir: PathBuf,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Catalogue database directory
    #[arg(long, global = true, env = "BOOK_SEARCH_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Keep the catalogue in memory instead of on disk
    #[arg(long, global = true)]
    pub memory: bool,

    #[arg(long, global = true, env = "BOOK_SEARCH_NAMESPACE", default_value = "books")]
    pub namespace: String,

    #[arg(long, global = true, env = "BOOK_SEARCH_DATABASE", default_value = "catalog")]
    pub database: String,

    /// Embedding model, by fastembed model code or short name
    #[arg(long, global = true, env = "BOOK_SEARCH_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Where downloaded model weights are cached
    #[arg(long, global = true, env = "BOOK_SEARCH_MODEL_CACHE")]
    pub model_cache: Option<PathBuf>,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        for (option, value) in [("namespace", &self.namespace), ("database", &self.database)] {
            if value.trim().is_empty() {
                return Err(CatalogError::Config(format!("{} must not be empty", option)));
            }
        }
        if self.model.trim().is_empty() {
            return Err(CatalogError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }

    /// The configured database path, or `<data dir>/book-search/db`.
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("book-search").join("db"))
            .ok_or_else(|| {
                CatalogError::Config(
                    "no local data directory; pass --db-path or set BOOK_SEARCH_DB_PATH".to_string()
                )
            })
    }
}
