//! Image staging area and shortcode blocks.
//!
//! URLs are loaded into a staging list, then grouped into image blocks (one
//! image) or gallery blocks (any number, kept in order). Deleting a block
//! returns its images to staging with their metadata.

use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use sitetools_core::lenient::lenient_vec;

pub const DEFAULT_WIDTH: &str = "1440";

fn default_width() -> String {
    DEFAULT_WIDTH.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub url: String,
    #[serde(default, alias = "alt")]
    pub description: String,
    #[serde(default = "default_width")]
    pub width: String,
    #[serde(default)]
    pub classes: String,
    #[serde(default)]
    pub is_full_width: bool,
    #[serde(default)]
    pub show_caption: bool,
}

impl ImageEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: String::new(),
            width: default_width(),
            classes: String::new(),
            is_full_width: false,
            show_caption: false,
        }
    }

    /// Last path segment, used as a caption in listings.
    pub fn filename(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GalleryType {
    #[default]
    TwoColumn,
    ThreeColumn,
    Vertical,
    Tarot,
}

impl GalleryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryType::TwoColumn => "two-column",
            GalleryType::ThreeColumn => "three-column",
            GalleryType::Vertical => "vertical",
            GalleryType::Tarot => "tarot",
        }
    }
}

impl fmt::Display for GalleryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GalleryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-column" => Ok(GalleryType::TwoColumn),
            "three-column" => Ok(GalleryType::ThreeColumn),
            "vertical" => Ok(GalleryType::Vertical),
            "tarot" => Ok(GalleryType::Tarot),
            other => Err(format!(
                "unknown gallery type '{}' (expected two-column, three-column, vertical or tarot)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    Image,
    Gallery {
        #[serde(default, rename = "galleryType")]
        gallery_type: GalleryType,
    },
}

impl BlockKind {
    pub fn gallery() -> Self {
        BlockKind::Gallery { gallery_type: GalleryType::default() }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Image => "Image Block",
            BlockKind::Gallery { .. } => "Gallery Block",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub id: String,
    #[serde(flatten)]
    pub kind: BlockKind,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub images: Vec<ImageEntry>,
}

impl ImageBlock {
    fn is_full(&self) -> bool {
        self.kind == BlockKind::Image && !self.images.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    NoUrls,
    /// Image blocks take exactly one image; galleries at least one.
    SelectionSize { kind: &'static str, got: usize },
    ThumbnailIndex(usize),
    BlockNotFound(String),
    ImageIndex { block: String, index: usize },
    /// The image block already holds its image.
    BlockFull(String),
    NotAGallery(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::NoUrls => write!(f, "enter at least one image URL"),
            ImageError::SelectionSize { kind, got } => match *kind {
                "image" => write!(f, "an image block needs exactly one selected image, got {}", got),
                _ => write!(f, "a {} block needs at least one selected image", kind),
            },
            ImageError::ThumbnailIndex(i) => write!(f, "no staged image at index {}", i),
            ImageError::BlockNotFound(id) => write!(f, "block not found: {}", id),
            ImageError::ImageIndex { block, index } => write!(f, "block {} has no image at index {}", block, index),
            ImageError::BlockFull(id) => write!(f, "image block {} already has an image", id),
            ImageError::NotAGallery(id) => write!(f, "block {} is not a gallery", id),
        }
    }
}

impl std::error::Error for ImageError {}

/// Staged images may be stored as bare URLs.
fn deserialize_thumbnails<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ImageEntry>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Url(String),
        Entry(ImageEntry),
        Unreadable(IgnoredAny),
    }

    let stored = Option::<Vec<Stored>>::deserialize(deserializer)?;
    Ok(stored
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| match s {
            Stored::Url(url) => Some(ImageEntry::new(url)),
            Stored::Entry(entry) => Some(entry),
            Stored::Unreadable(_) => {
                log::warn!("ignoring unreadable staged image");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBoard {
    #[serde(default)]
    block_id_counter: u64,
    #[serde(default, deserialize_with = "deserialize_thumbnails")]
    thumbnails: Vec<ImageEntry>,
    #[serde(default, deserialize_with = "lenient_vec")]
    blocks: Vec<ImageBlock>,
}

impl ImageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> &[ImageEntry] {
        &self.thumbnails
    }

    pub fn blocks(&self) -> &[ImageBlock] {
        &self.blocks
    }

    /// Images in staging plus images in blocks.
    pub fn total_images(&self) -> usize {
        self.thumbnails.len() + self.blocks.iter().map(|b| b.images.len()).sum::<usize>()
    }

    pub fn block(&self, id: &str) -> Result<&ImageBlock, ImageError> {
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| ImageError::BlockNotFound(id.to_string()))
    }

    fn block_mut(&mut self, id: &str) -> Result<&mut ImageBlock, ImageError> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ImageError::BlockNotFound(id.to_string()))
    }

    fn next_block_id(&mut self) -> String {
        let id = format!("block-{}", self.block_id_counter);
        self.block_id_counter += 1;
        id
    }

    /// Stage one image per non-blank line.
    pub fn load_urls(&mut self, text: &str) -> Result<usize, ImageError> {
        let urls: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if urls.is_empty() {
            return Err(ImageError::NoUrls);
        }
        self.thumbnails.extend(urls.iter().map(|u| ImageEntry::new(*u)));
        Ok(urls.len())
    }

    pub fn remove_thumbnail(&mut self, index: usize) -> Result<ImageEntry, ImageError> {
        if index >= self.thumbnails.len() {
            return Err(ImageError::ThumbnailIndex(index));
        }
        Ok(self.thumbnails.remove(index))
    }

    /// Move selected staged images into a new block, in staging order.
    pub fn block_from_selection(&mut self, kind: BlockKind, selection: &[usize]) -> Result<&ImageBlock, ImageError> {
        let mut indices = selection.to_vec();
        indices.sort_unstable();
        indices.dedup();

        let (label, ok) = match kind {
            BlockKind::Image => ("image", indices.len() == 1),
            BlockKind::Gallery { .. } => ("gallery", !indices.is_empty()),
        };
        if !ok {
            return Err(ImageError::SelectionSize { kind: label, got: indices.len() });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.thumbnails.len()) {
            return Err(ImageError::ThumbnailIndex(bad));
        }

        let mut images = Vec::with_capacity(indices.len());
        for &i in indices.iter().rev() {
            images.push(self.thumbnails.remove(i));
        }
        images.reverse();

        let id = self.next_block_id();
        self.blocks.push(ImageBlock { id, kind, images });
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Add an empty block.
    pub fn create_block(&mut self, kind: BlockKind) -> &ImageBlock {
        let id = self.next_block_id();
        self.blocks.push(ImageBlock { id, kind, images: Vec::new() });
        &self.blocks[self.blocks.len() - 1]
    }

    /// Remove a block, returning its images to staging. Returns how many
    /// images went back.
    pub fn delete_block(&mut self, id: &str) -> Result<usize, ImageError> {
        let index = self
            .blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ImageError::BlockNotFound(id.to_string()))?;
        let block = self.blocks.remove(index);
        let count = block.images.len();
        self.thumbnails.extend(block.images);
        Ok(count)
    }

    pub fn set_gallery_type(&mut self, id: &str, gallery_type: GalleryType) -> Result<(), ImageError> {
        let block = self.block_mut(id)?;
        match &mut block.kind {
            BlockKind::Gallery { gallery_type: current } => {
                *current = gallery_type;
                Ok(())
            }
            BlockKind::Image => Err(ImageError::NotAGallery(id.to_string())),
        }
    }

    /// Move a staged image into a block at `position` (end when `None`).
    pub fn move_to_block(&mut self, thumbnail: usize, id: &str, position: Option<usize>) -> Result<(), ImageError> {
        if thumbnail >= self.thumbnails.len() {
            return Err(ImageError::ThumbnailIndex(thumbnail));
        }
        let block = self.block_mut(id)?;
        if block.is_full() {
            return Err(ImageError::BlockFull(id.to_string()));
        }
        let at = position.unwrap_or(block.images.len()).min(block.images.len());
        let entry = self.thumbnails.remove(thumbnail);
        // Re-borrow after touching the staging list.
        let block = self.block_mut(id)?;
        block.images.insert(at, entry);
        Ok(())
    }

    /// Move an image out of a block, back to the end of staging.
    pub fn send_to_staging(&mut self, id: &str, index: usize) -> Result<(), ImageError> {
        let block = self.block_mut(id)?;
        if index >= block.images.len() {
            return Err(ImageError::ImageIndex { block: id.to_string(), index });
        }
        let entry = block.images.remove(index);
        self.thumbnails.push(entry);
        Ok(())
    }

    /// Reorder images inside a block (splice semantics).
    pub fn move_within_block(&mut self, id: &str, from: usize, to: usize) -> Result<(), ImageError> {
        let block = self.block_mut(id)?;
        let len = block.images.len();
        for index in [from, to] {
            if index >= len {
                return Err(ImageError::ImageIndex { block: id.to_string(), index });
            }
        }
        let entry = block.images.remove(from);
        block.images.insert(to, entry);
        Ok(())
    }

    /// Edit metadata of an image inside a block.
    pub fn image_mut(&mut self, id: &str, index: usize) -> Result<&mut ImageEntry, ImageError> {
        let block = self.block_mut(id)?;
        block
            .images
            .get_mut(index)
            .ok_or_else(|| ImageError::ImageIndex { block: id.to_string(), index })
    }

    /// Edit metadata of a staged image.
    pub fn thumbnail_mut(&mut self, index: usize) -> Result<&mut ImageEntry, ImageError> {
        self.thumbnails.get_mut(index).ok_or(ImageError::ThumbnailIndex(index))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
