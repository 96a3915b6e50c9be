//! Filesystem-backed collaborators for the quotegrid engine.
//!
//! ## Available Implementations
//!
//! - [`FilesystemResourceProvider`]: fonts and logo images from a base directory
//! - [`FileHistoryStore`]: issued-number history kept as a flat tabular text file
//!
//! The in-memory variants from `quotegrid-traits` are re-exported for convenience.

mod filesystem;
mod history_file;

pub use filesystem::FilesystemResourceProvider;
pub use history_file::FileHistoryStore;

pub use quotegrid_traits::{InMemoryHistoryStore, InMemoryResourceProvider};
