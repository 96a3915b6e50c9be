//! Optional JSON configuration for the service and the CLI.
//!
//! ```json
//! {
//!   "font_dir": "fonts",
//!   "regular_font": "NotoSansThai-Regular.ttf",
//!   "bold_font": "NotoSansThai-Bold.ttf",
//!   "logo": "logo.png",
//!   "history_file": "history.csv",
//!   "overflow": "paginate"
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the configuration file.

use crate::error::QuotegridError;
use quotegrid_render_core::{GridLayout, Labels, OverflowPolicy, TARGET_ROWS};
use quotegrid_render_lopdf::{FixedGridRenderer, FontAssets};
use quotegrid_resource::{FileHistoryStore, FilesystemResourceProvider, InMemoryHistoryStore};
use quotegrid_traits::{HistoryStore, ResourceProvider, SharedResourceData};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn default_target_rows() -> usize {
    TARGET_ROWS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotegridConfig {
    /// Directory fonts are loaded from.
    pub font_dir: Option<PathBuf>,
    pub regular_font: Option<String>,
    pub bold_font: Option<String>,
    /// Installed font family to look up when no font file is configured.
    pub font_family: Option<String>,
    pub logo: Option<String>,
    pub history_file: Option<PathBuf>,
    pub overflow: OverflowPolicy,
    #[serde(default = "default_target_rows")]
    pub target_rows: usize,
    pub labels: Labels,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for QuotegridConfig {
    fn default() -> Self {
        Self {
            font_dir: None,
            regular_font: None,
            bold_font: None,
            font_family: None,
            logo: None,
            history_file: None,
            overflow: OverflowPolicy::default(),
            target_rows: TARGET_ROWS,
            labels: Labels::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl QuotegridConfig {
    pub fn from_json(json: &str) -> Result<Self, QuotegridError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QuotegridError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path.display(), e),
            )
        })?;
        let mut config = Self::from_json(&source)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.base_dir = parent.to_path_buf();
        }
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Sets the directory relative paths are resolved against.
    pub fn with_base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::default()
            .with_overflow(self.overflow)
            .with_target_rows(self.target_rows)
    }

    /// Font sources in priority order: configured files, then an installed family.
    ///
    /// Failures are not errors here; the renderer falls back to Helvetica and reports why.
    pub fn font_assets(&self) -> FontAssets {
        if let Some(regular) = &self.regular_font {
            let dir = self.font_dir.as_deref().unwrap_or(Path::new(""));
            let provider = FilesystemResourceProvider::new(self.resolve(dir));
            return FontAssets::from_provider(&provider, regular, self.bold_font.as_deref());
        }
        #[cfg(feature = "system-fonts")]
        if let Some(family) = &self.font_family {
            return FontAssets::from_system(family);
        }
        FontAssets::none()
    }

    pub fn renderer(&self) -> Result<FixedGridRenderer, QuotegridError> {
        Ok(FixedGridRenderer::builder()
            .with_layout(self.layout())
            .with_labels(self.labels.clone())
            .with_fonts(self.font_assets())
            .build()?)
    }

    /// Loads the configured logo. A configured logo that cannot be read is an error.
    pub fn load_logo(&self) -> Result<Option<SharedResourceData>, QuotegridError> {
        match &self.logo {
            Some(logo) => {
                let provider = FilesystemResourceProvider::new(&self.base_dir);
                Ok(Some(provider.load(logo)?))
            }
            None => Ok(None),
        }
    }

    /// The flat-file history when one is configured, otherwise a history that lives
    /// only as long as the process.
    pub fn history_store(&self) -> Arc<dyn HistoryStore> {
        match &self.history_file {
            Some(path) => Arc::new(FileHistoryStore::new(self.resolve(path))),
            None => Arc::new(InMemoryHistoryStore::new()),
        }
    }
}
