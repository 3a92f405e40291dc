// Configuration and local storage

pub mod palette;
pub mod settings;
pub mod storage;

pub use palette::{DataSource, PaletteState, PinnedSidebar, SidebarGroup, SidebarItem};
pub use settings::Settings;
pub use storage::{Store, StorageError};
