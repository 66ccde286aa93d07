//! Error handling and result types for BTree operations.
//!
//! Not-found is an ordinary outcome for `search`/`delete` and is only raised
//! as an error by the `try_*` variants. Structural corruption is reported by
//! the validation helpers.

use thiserror::Error;
use tracing::warn;

/// Error type for B-tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BTreeError {
    /// Key not found in the tree.
    #[error("Key not found in tree")]
    KeyNotFound,
    /// Invalid construction parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Internal data structure integrity violation.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),
    /// Arena bookkeeping disagrees with the tree.
    #[error("Arena error: {0}")]
    ArenaError(String),
    /// Tree corruption detected.
    #[error("Corrupted tree: {0}")]
    CorruptedTree(String),
}

impl BTreeError {
    /// Create an InvalidConfiguration error for a rejected minimum degree
    pub fn invalid_degree(degree: usize, min_required: usize) -> Self {
        Self::InvalidConfiguration(format!(
            "Minimum degree {} is invalid (minimum required: {})",
            degree, min_required
        ))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create an ArenaError with context
    pub fn arena_error(operation: &str, details: &str) -> Self {
        Self::ArenaError(format!("{} failed: {}", operation, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    /// Check if this error only reports a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }
}

/// Internal result type for tree operations
pub(crate) type TreeResult<T> = Result<T, BTreeError>;

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BTreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, BTreeError>;

/// Result extension trait for improved error handling
pub trait BTreeResultExt<T> {
    /// Convert to a BTreeResult with additional context
    fn with_context(self, context: &str) -> BTreeResult<T>;

    /// Convert to a BTreeResult with operation context
    fn with_operation(self, operation: &str) -> BTreeResult<T>;

    /// Log error and continue with default value
    fn or_default_with_log(self) -> T
    where
        T: Default;
}

impl<T> BTreeResultExt<T> for Result<T, BTreeError> {
    fn with_context(self, context: &str) -> BTreeResult<T> {
        self.map_err(|e| match e {
            BTreeError::KeyNotFound => BTreeError::KeyNotFound,
            BTreeError::InvalidConfiguration(msg) => {
                BTreeError::InvalidConfiguration(format!("{}: {}", context, msg))
            }
            BTreeError::DataIntegrityError(msg) => BTreeError::data_integrity(context, &msg),
            BTreeError::ArenaError(msg) => BTreeError::arena_error(context, &msg),
            BTreeError::CorruptedTree(msg) => BTreeError::corrupted_tree(context, &msg),
        })
    }

    fn with_operation(self, operation: &str) -> BTreeResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }

    fn or_default_with_log(self) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "btree operation failed, using default");
                T::default()
            }
        }
    }
}
