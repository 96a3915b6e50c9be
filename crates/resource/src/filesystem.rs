//! Filesystem-based resource provider.
//!
//! Assets are resolved relative to a base directory (usually the directory holding the
//! configuration file). Paths that would leave the base directory are refused.

use quotegrid_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Loads fonts and images from a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized base path for containment checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet; loads then fall back to component checks.
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves a relative asset path, or `None` if it escapes the base directory.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);
        match (full_path.canonicalize(), &self.canonical_base) {
            // Symlinks may still point outside the base.
            (Ok(canonical), Some(base)) if !canonical.starts_with(base) => None,
            (Ok(canonical), Some(_)) => Some(canonical),
            _ => Some(full_path),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (outside asset directory)", path)))?;

        log::debug!("Loading asset {}", full_path.display());
        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_loads_nested_font_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("fonts")).unwrap();
        fs::write(dir.path().join("fonts/Body.ttf"), b"\0\x01\0\0").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(provider.exists("fonts/Body.ttf"));
        assert_eq!(provider.load("fonts/Body.ttf").unwrap().len(), 4);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert!(matches!(provider.load("logo.png"), Err(ResourceError::NotFound(_))));
    }

    #[test]
    fn test_directories_do_not_exist_as_assets() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("fonts")).unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(!provider.exists("fonts"));
    }

    #[test]
    fn test_blocks_traversal_and_absolute_paths() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert!(provider.load("../../../etc/passwd").is_err());
        assert!(!provider.exists("fonts/../../secret"));
        assert!(provider.load("/etc/passwd").is_err());
    }
}
