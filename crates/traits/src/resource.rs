//! ResourceProvider trait for the binary assets a document needs.
//!
//! The renderer never touches the filesystem itself: font files and the logo image
//! arrive as bytes resolved by a provider.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads named assets (fonts, logo images) from some backing store.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its path/key.
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check if a resource exists.
    fn exists(&self, path: &str) -> bool;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Assets held in memory, keyed by path. Useful for embedded assets and tests.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `path`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path_string = path.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                path: path_string.clone(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(path_string, Arc::new(data));
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                path: path.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_load() {
        let provider = InMemoryResourceProvider::new();
        provider.add("logo.png", vec![0x89, b'P', b'N', b'G']).unwrap();

        let data = provider.load("logo.png").unwrap();
        assert_eq!(&data[1..], b"PNG");
        assert!(provider.exists("logo.png"));
    }

    #[test]
    fn test_missing_resource_is_not_found() {
        let provider = InMemoryResourceProvider::new();
        assert!(matches!(
            provider.load("fonts/Sarabun-Regular.ttf"),
            Err(ResourceError::NotFound(_))
        ));
        assert!(!provider.exists("fonts/Sarabun-Regular.ttf"));
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let provider = InMemoryResourceProvider::new();
        provider.add("logo.png", b"old".to_vec()).unwrap();
        provider.add("logo.png", b"new".to_vec()).unwrap();

        assert_eq!(&*provider.load("logo.png").unwrap(), b"new");
        assert_eq!(provider.len(), 1);
        assert!(!provider.is_empty());
    }

    #[test]
    fn test_resource_error_display() {
        let err = ResourceError::LoadFailed {
            path: "logo.png".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("logo.png"));
        assert!(err.to_string().contains("permission denied"));

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: ResourceError = io_err.into();
        assert!(matches!(err, ResourceError::Io(_)));
    }
}
