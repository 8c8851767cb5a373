// Shared modules used by the library and the CLI

pub mod catalog;
pub mod config;
pub mod presentation;
pub mod storage;
pub mod store;
pub mod theme;

// Re-export commonly used types
pub use catalog::{Category, ToolEntry};
pub use config::{ConfigError, ThemeConfig};
pub use presentation::{Marker, PresentationRoot, RootNode};
pub use storage::{DisabledStore, DurableStore, JsonFileStore, MemoryStore, StorageError};
pub use store::{Subscription, SubscriptionId, ThemeHandle, ThemeStore};
pub use theme::{ThemeMode, ThemeState};
