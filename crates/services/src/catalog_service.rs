use std::path::Path;
use std::sync::Arc;

use quiz_core::model::{Catalog, QuestionRecord};

use crate::error::CatalogServiceError;

/// Loads and validates question catalogs authored as JSON arrays.
pub struct CatalogService;

impl CatalogService {
    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Parse` for malformed JSON and
    /// `CatalogServiceError::Catalog` when a record violates catalog invariants.
    pub fn from_json_str(json: &str) -> Result<Arc<Catalog>, CatalogServiceError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
        let catalog = Catalog::from_records(records)?;
        tracing::debug!(questions = catalog.len(), "catalog loaded");
        Ok(Arc::new(catalog))
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Io` if the file cannot be read, plus any
    /// error from [`CatalogService::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Arc<Catalog>, CatalogServiceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogServiceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
