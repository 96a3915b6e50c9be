pub mod history;
pub mod resource;

pub use history::{HistoryError, HistoryRecord, HistoryStore, InMemoryHistoryStore};
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
