pub mod events;
pub mod images;
pub mod pages;
pub mod picker;
pub mod videos;

pub use events::{CloseReason, CommitSource, EventCollector, PickerEvent};
pub use images::{BlockKind, GalleryType, ImageBlock, ImageBoard, ImageEntry, ImageError};
pub use pages::{ColorField, DropTarget, Page, PageData, PageError, PageField, PageStore, PageType};
pub use picker::{Bounds, PickerLayout, PickerManager, PickerStatus, Point};
pub use videos::{LookupTicket, OEmbed, TsvRow, VideoError, VideoLibrary, VideoRecord};
