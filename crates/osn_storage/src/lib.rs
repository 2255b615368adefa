use osn_core::{ArticleStorage, Error, Result};
use std::path::Path;
use std::sync::Arc;

pub mod backends;
pub mod document;

pub use backends::*;

pub const AVAILABLE_BACKENDS: &[&str] = &["markdown", "memory"];

/// Build the storage backend named on the command line. `dir` is only used
/// by the markdown backend.
pub async fn create_storage(kind: &str, dir: &Path) -> Result<Arc<dyn ArticleStorage>> {
    match kind.to_lowercase().as_str() {
        "markdown" | "file" => Ok(Arc::new(MarkdownStorage::new(dir).await?)),
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        other => Err(Error::Config(format!(
            "Unknown storage backend '{}'. Available backends: {}",
            other,
            AVAILABLE_BACKENDS.join(", ")
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::create_storage;
}
