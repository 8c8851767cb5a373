// toolshelf library - theme preference store and tool catalog

// Shared modules (used by the CLI and by any embedding view layer)
pub mod shared;

pub use shared::{
    Category, DurableStore, PresentationRoot, RootNode, ThemeConfig, ThemeHandle, ThemeMode,
    ThemeState, ThemeStore, ToolEntry,
};
