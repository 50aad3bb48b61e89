//! Error types for the decision cache

use thiserror::Error;

/// Result type alias for decision cache operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Ways reading or writing the decision cache file can fail
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The cache file or its temporary replacement could not be read, written
    /// or renamed into place
    #[error("Decision cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Decisions could not be encoded as JSON
    #[error("Decision cache encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad `data_dir`/`cache_file` settings
    #[error("Invalid decision cache settings: {0}")]
    Config(String),

    /// The file exists but is not a JSON object of name -> id or null
    #[error("Decision cache is not a valid name map: {0}")]
    Corruption(String),

    /// No cache file and `create_if_missing` is off
    #[error("Decision cache missing: {0}")]
    NotFound(String),
}

impl PersistenceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// A temporary file that could not replace the cache; the temporary file is
/// deleted when the error drops, the cache itself was never touched
impl From<tempfile::PersistError> for PersistenceError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_messages_name_the_cache() {
        let err = PersistenceError::not_found("decision cache ./data/name-map.json does not exist");
        assert_eq!(
            err.to_string(),
            "Decision cache missing: decision cache ./data/name-map.json does not exist"
        );

        let err = PersistenceError::corruption("name-map.json: expected value");
        assert!(err.to_string().starts_with("Decision cache is not a valid name map"));
    }

    #[test]
    fn test_failed_rename_keeps_io_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let temp = tempfile::NamedTempFile::new_in(temp_dir.path()).unwrap();

        // Renaming onto a directory path that does not exist fails
        let target = temp_dir.path().join("missing").join("name-map.json");
        let err: PersistenceError = temp.persist(&target).unwrap_err().into();

        match err {
            PersistenceError::Io(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
