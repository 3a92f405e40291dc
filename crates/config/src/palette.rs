//! Palette store: the loaded site palette, temporary gradients, pins and
//! saved styles, all kept in the shared `websitetools-colors` document.
//!
//! Two writers share that document. The palette writer owns everything but
//! `savedStyles`, which it copies from what is already stored. The sidebar
//! writer only touches pins and saved styles.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sitetools_core::lenient::lenient_vec;
use sitetools_core::{SavedStyle, TransferPacket};
use sitetools_io::palette::{
    parse_color_data, CatalogColor, CatalogGradient, ItemId, ItemKind, PaletteCatalog, PaletteGroup,
    TempGradient,
};

use crate::storage::{StorageError, Store, COLORS_KEY};

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Url,
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaletteState {
    #[serde(deserialize_with = "lenient_vec")]
    pub temp_gradients: Vec<TempGradient>,
    #[serde(deserialize_with = "lenient_vec")]
    pub pinned_color_ids: Vec<ItemId>,
    #[serde(deserialize_with = "lenient_vec")]
    pub pinned_gradient_ids: Vec<ItemId>,
    pub colors_data: Option<Value>,
    pub data_source: Option<DataSource>,
    /// Epoch milliseconds of the last load.
    pub loaded_timestamp: Option<i64>,
    /// Where a URL palette came from, so a refresh hits the same place.
    pub source_url: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub saved_styles: Vec<SavedStyle>,
}

impl PaletteState {
    pub fn load(store: &Store) -> Self {
        store.load_or_default(COLORS_KEY)
    }

    /// Palette writer. Keeps the saved styles already on disk.
    pub fn save(&self, store: &Store) -> Result<(), StorageError> {
        let mut doc = stored_document(store);
        let saved = doc.remove("savedStyles").unwrap_or_else(|| Value::Array(Vec::new()));

        if let Value::Object(fields) = encode(self)? {
            doc.extend(fields);
        }
        doc.insert("savedStyles".to_string(), saved);
        store.set(COLORS_KEY, &doc)
    }

    /// Sidebar writer. Merges pins and saved styles into the stored document.
    pub fn save_sidebar(&self, store: &Store) -> Result<(), StorageError> {
        let mut doc = stored_document(store);
        if let Value::Object(mut fields) = encode(self)? {
            for key in ["pinnedColorIds", "pinnedGradientIds", "savedStyles"] {
                if let Some(value) = fields.remove(key) {
                    doc.insert(key.to_string(), value);
                }
            }
        }
        store.set(COLORS_KEY, &doc)
    }

    pub fn groups(&self) -> Vec<PaletteGroup> {
        self.colors_data.as_ref().map(parse_color_data).unwrap_or_default()
    }

    pub fn catalog(&self) -> PaletteCatalog {
        PaletteCatalog::from_document(self.colors_data.as_ref(), &self.temp_gradients)
    }

    /// Replace the palette document.
    pub fn set_loaded(&mut self, data: Value, source: DataSource, now_ms: i64) {
        self.colors_data = Some(data);
        self.data_source = Some(source);
        self.loaded_timestamp = Some(now_ms);
        self.source_url = None;
    }

    pub fn set_loaded_url(&mut self, data: Value, url: &str, now_ms: i64) {
        self.set_loaded(data, DataSource::Url, now_ms);
        self.source_url = Some(url.to_string());
    }

    /// The URL a refresh should re-fetch, if the palette came from one.
    pub fn refresh_url(&self) -> Option<&str> {
        if self.data_source != Some(DataSource::Url) {
            return None;
        }
        self.source_url.as_deref()
    }

    /// Re-stamp a file-loaded palette. Returns false when there is nothing to
    /// refresh locally (URL palettes are re-fetched instead).
    pub fn refresh_file(&mut self, now_ms: i64) -> bool {
        if self.data_source != Some(DataSource::File) || self.colors_data.is_none() {
            return false;
        }
        self.loaded_timestamp = Some(now_ms);
        true
    }

    /// Drop the palette, temporary gradients and pins. Saved styles stay.
    pub fn clear_all(&mut self) {
        self.colors_data = None;
        self.temp_gradients.clear();
        self.pinned_color_ids.clear();
        self.pinned_gradient_ids.clear();
        self.data_source = None;
        self.loaded_timestamp = None;
        self.source_url = None;
    }

    /// Clear every pin and saved style.
    pub fn clear_pins(&mut self) {
        self.pinned_color_ids.clear();
        self.pinned_gradient_ids.clear();
        self.saved_styles.clear();
    }

    pub fn add_temp_gradient(&mut self, gradient: TempGradient) -> ItemId {
        self.temp_gradients.push(gradient);
        ItemId::Temp { index: self.temp_gradients.len() - 1 }
    }

    fn pins(&self, kind: ItemKind) -> &Vec<ItemId> {
        match kind {
            ItemKind::Color => &self.pinned_color_ids,
            ItemKind::Gradient => &self.pinned_gradient_ids,
        }
    }

    fn pins_mut(&mut self, kind: ItemKind) -> &mut Vec<ItemId> {
        match kind {
            ItemKind::Color => &mut self.pinned_color_ids,
            ItemKind::Gradient => &mut self.pinned_gradient_ids,
        }
    }

    pub fn is_pinned(&self, id: &ItemId) -> bool {
        self.pins(id.kind()).contains(id)
    }

    /// Flip pin membership. Returns true if the item is now pinned.
    pub fn toggle_pin(&mut self, id: ItemId) -> bool {
        if self.unpin(&id) {
            false
        } else {
            self.pins_mut(id.kind()).push(id);
            true
        }
    }

    pub fn unpin(&mut self, id: &ItemId) -> bool {
        let pins = self.pins_mut(id.kind());
        match pins.iter().position(|p| p == id) {
            Some(index) => {
                pins.remove(index);
                true
            }
            None => false,
        }
    }

    /// Pin the item a packet was dragged from. Packets without a readable
    /// source id, and items already pinned, are ignored.
    pub fn pin_packet(&mut self, packet: &TransferPacket) -> Option<ItemId> {
        let id: ItemId = packet.source_id()?.parse().ok()?;
        let kind_matches = matches!(
            (packet, id.kind()),
            (TransferPacket::Color { .. }, ItemKind::Color)
                | (TransferPacket::GradientStops { .. }, ItemKind::Gradient)
        );
        if !kind_matches || self.is_pinned(&id) {
            return None;
        }
        self.pins_mut(id.kind()).push(id);
        Some(id)
    }

    pub fn add_saved_style(&mut self, style: SavedStyle) {
        self.saved_styles.push(style);
    }

    pub fn delete_saved_style(&mut self, id: &str) -> bool {
        let before = self.saved_styles.len();
        self.saved_styles.retain(|s| s.id != id);
        self.saved_styles.len() != before
    }

    /// Status line in local time.
    pub fn status_line(&self) -> String {
        self.status_line_in(&Local)
    }

    pub fn status_line_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let Some(when) = self.loaded_timestamp.and_then(DateTime::<Utc>::from_timestamp_millis) else {
            return "No colors loaded".to_string();
        };
        let source = match self.data_source {
            Some(DataSource::Url) => "Loaded from URL",
            _ => "Loaded from file",
        };
        let when = when.with_timezone(tz);
        format!("{} on {}", source, when.format("%b %-d, %Y, %-I:%M %p"))
    }
}

fn encode(state: &PaletteState) -> Result<Value, StorageError> {
    serde_json::to_value(state).map_err(|e| StorageError::Encode {
        key: COLORS_KEY.to_string(),
        message: e.to_string(),
    })
}

fn stored_document(store: &Store) -> Map<String, Value> {
    match store.load_or_default::<Value>(COLORS_KEY) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SidebarItem {
    Color(CatalogColor),
    Gradient(CatalogGradient),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarGroup {
    pub title: String,
    pub items: Vec<SidebarItem>,
}

/// What the pinned-colors sidebar shows: pinned items grouped by the title
/// of the palette group they came from, then saved styles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinnedSidebar {
    pub groups: Vec<SidebarGroup>,
    pub saved_styles: Vec<SavedStyle>,
}

impl PinnedSidebar {
    pub fn build(state: &PaletteState) -> Self {
        let catalog = state.catalog();
        let colors = catalog.pinned_colors(&state.pinned_color_ids).into_iter().cloned().map(SidebarItem::Color);
        let gradients = catalog
            .pinned_gradients(&state.pinned_gradient_ids)
            .into_iter()
            .cloned()
            .map(SidebarItem::Gradient);

        let mut groups: Vec<SidebarGroup> = Vec::new();
        for item in colors.chain(gradients) {
            let title = match &item {
                SidebarItem::Color(c) => &c.group_title,
                SidebarItem::Gradient(g) => &g.group_title,
            };
            let title = if title.is_empty() { UNCATEGORIZED } else { title.as_str() };

            match groups.iter_mut().find(|g| g.title == title) {
                Some(group) => group.items.push(item),
                None => groups.push(SidebarGroup { title: title.to_string(), items: vec![item] }),
            }
        }

        Self { groups, saved_styles: state.saved_styles.clone() }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.saved_styles.is_empty()
    }
}
