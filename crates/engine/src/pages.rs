//! Frontmatter pages: templates, field edits, tags and custom styles.
//!
//! Pages are kept newest first. Each page gets a border color from a fixed
//! rotation so adjacent cards stay distinguishable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use sitetools_core::{
    Color, CustomStyle, DropPlacement, GradientError, GradientStops, SavedStyle, StyleKind,
    TransferPacket,
};

/// Card border colors, assigned round-robin.
pub const BORDER_COLORS: [&str; 5] = [
    "var(--color-accent)",
    "var(--color-blue)",
    "var(--color-red-light)",
    "var(--color-green)",
    "var(--color-success)",
];

/// Suggested tags for artwork pages.
pub const PROJECT_TAGS: [&str; 9] = [
    "performance",
    "video art",
    "music video",
    "collaboration",
    "print",
    "installation",
    "music",
    "drawing",
    "sculpture",
];

pub const DEFAULT_NOTECARD_TEXT: Color = Color::from_rgb(0xf2, 0xf2, 0xf2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Blog,
    Artwork,
    Notes,
}

impl PageType {
    pub fn label(&self) -> &'static str {
        match self {
            PageType::Blog => "Blog Post",
            PageType::Artwork => "Artwork",
            PageType::Notes => "Notes Page",
        }
    }

    /// Default background style for types that carry one.
    pub fn default_style(&self) -> Option<CustomStyle> {
        let hex = |r, g, b| Color::from_rgb(r, g, b);
        match self {
            PageType::Blog => None,
            PageType::Artwork => Some(CustomStyle::new(
                hex(0xcf, 0xce, 0xcc),
                GradientStops::from_array([hex(0xd5, 0xdc, 0xdf), hex(0xdd, 0xdd, 0xdd), hex(0xd0, 0xda, 0xda)]),
            )),
            PageType::Notes => Some(CustomStyle::new(
                hex(0xd8, 0xdd, 0xea),
                GradientStops::from_array([hex(0xc7, 0xd2, 0xf0), hex(0xe0, 0xd4, 0xef), hex(0xf2, 0xd6, 0xd6)]),
            )),
        }
    }

    /// Fresh page data for this type.
    pub fn template(&self, now: DateTime<Utc>) -> PageData {
        let mut data = PageData::default();
        match self {
            PageType::Blog => {
                data.date = Some(now.format("%Y-%m-%d").to_string());
            }
            PageType::Artwork => {
                data.project_year = Some(now.year().to_string());
                data.custom_style = self.default_style();
            }
            PageType::Notes => {
                data.custom_style = self.default_style();
                data.notecard_text_color = Some(DEFAULT_NOTECARD_TEXT);
            }
        }
        data
    }

    pub fn supports(&self, field: PageField) -> bool {
        use PageField::*;
        match self {
            PageType::Blog => matches!(field, Title | Thumbnail | ThumbnailAlt | Date),
            PageType::Artwork => !matches!(field, Date | NotecardDark),
            PageType::Notes => !matches!(field, Date | ThumbnailAlt | ProjectYear),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PageType::Blog => "blog",
            PageType::Artwork => "artwork",
            PageType::Notes => "notes",
        };
        f.write_str(s)
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blog" => Ok(PageType::Blog),
            "artwork" => Ok(PageType::Artwork),
            "notes" => Ok(PageType::Notes),
            other => Err(format!("unknown page type '{}' (expected blog, artwork or notes)", other)),
        }
    }
}

/// Page fields, shared by all page types. Which ones are meaningful depends
/// on the type (see `PageType::supports`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageData {
    pub title: String,
    pub thumbnail: String,
    pub thumbnail_alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_year: Option<String>,
    pub description: String,
    pub lightbox: bool,
    pub dark: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_style: Option<CustomStyle>,
    pub notecard_dark: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notecard_text_color: Option<Color>,
}

impl PageData {
    /// The custom style, only when present and enabled.
    pub fn active_style(&self) -> Option<&CustomStyle> {
        self.custom_style.as_ref().filter(|s| s.enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub data: PageData,
    #[serde(default)]
    pub color_index: usize,
}

impl Page {
    pub fn border_color(&self) -> &'static str {
        BORDER_COLORS[self.color_index % BORDER_COLORS.len()]
    }
}

/// Editable scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageField {
    Title,
    Thumbnail,
    ThumbnailAlt,
    Date,
    ProjectYear,
    Description,
    Lightbox,
    Dark,
    NotecardDark,
    BgImage,
    BgImageOpacity,
}

impl PageField {
    pub fn name(&self) -> &'static str {
        match self {
            PageField::Title => "title",
            PageField::Thumbnail => "thumbnail",
            PageField::ThumbnailAlt => "thumbnailAlt",
            PageField::Date => "date",
            PageField::ProjectYear => "projectYear",
            PageField::Description => "description",
            PageField::Lightbox => "lightbox",
            PageField::Dark => "dark",
            PageField::NotecardDark => "notecardDark",
            PageField::BgImage => "customStyle.bgImage",
            PageField::BgImageOpacity => "customStyle.bgImageOpacity",
        }
    }

    /// Parse a raw value into the kind this field holds.
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue, PageError> {
        let invalid = || PageError::InvalidValue { field: self.name(), value: raw.to_string() };
        match self {
            PageField::Lightbox | PageField::Dark | PageField::NotecardDark => {
                match raw.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => Ok(FieldValue::Flag(true)),
                    "false" | "no" | "off" | "0" => Ok(FieldValue::Flag(false)),
                    _ => Err(invalid()),
                }
            }
            PageField::BgImageOpacity => raw.trim().parse::<f64>().map(FieldValue::Number).map_err(|_| invalid()),
            _ => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl FromStr for PageField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "title" => PageField::Title,
            "thumbnail" => PageField::Thumbnail,
            "thumbnailAlt" | "thumbnail-alt" => PageField::ThumbnailAlt,
            "date" => PageField::Date,
            "projectYear" | "project-year" => PageField::ProjectYear,
            "description" => PageField::Description,
            "lightbox" => PageField::Lightbox,
            "dark" => PageField::Dark,
            "notecardDark" | "notecard-dark" => PageField::NotecardDark,
            "customStyle.bgImage" | "bgImage" | "bg-image" => PageField::BgImage,
            "customStyle.bgImageOpacity" | "bgImageOpacity" | "bg-image-opacity" => PageField::BgImageOpacity,
            other => return Err(format!("unknown field '{}'", other)),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Number(f64),
}

/// Color-valued fields a picker or a dropped color can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorField {
    SolidColor,
    GradientStop(usize),
    NotecardTextColor,
}

impl fmt::Display for ColorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorField::SolidColor => write!(f, "solidColor-none"),
            ColorField::GradientStop(i) => write!(f, "gradientStop-{}", i),
            ColorField::NotecardTextColor => write!(f, "notecardTextColor-none"),
        }
    }
}

impl FromStr for ColorField {
    type Err = String;

    /// `solid`, `notecard`, or `stop-N`. The swatch ids from `Display` are
    /// accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" | "solidColor" | "solidColor-none" => Ok(ColorField::SolidColor),
            "notecard" | "notecardTextColor" | "notecardTextColor-none" => Ok(ColorField::NotecardTextColor),
            _ => s
                .strip_prefix("stop-")
                .or_else(|| s.strip_prefix("gradientStop-"))
                .and_then(|i| i.parse().ok())
                .map(ColorField::GradientStop)
                .ok_or_else(|| format!("unknown color field '{}' (expected solid, notecard or stop-N)", s)),
        }
    }
}

/// A color field on a specific page. This is what the picker edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorFieldRef {
    pub page_id: String,
    pub field: ColorField,
}

impl fmt::Display for ColorFieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "picker-{}-{}", self.page_id, self.field)
    }
}

/// Where a transfer packet was dropped on a page card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// A single color swatch (solid color, gradient stop, notecard text).
    Color(ColorField),
    /// The solid, gradient or image preview of the custom style.
    StylePreview,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    NotFound(String),
    FieldNotSupported { field: &'static str, page_type: PageType },
    InvalidValue { field: &'static str, value: String },
    /// The page has no enabled custom style.
    NoCustomStyle(String),
    EmptyStyleName,
    TagIndex(usize),
    DropRejected(&'static str),
    Gradient(GradientError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NotFound(id) => write!(f, "page not found: {}", id),
            PageError::FieldNotSupported { field, page_type } => {
                write!(f, "field '{}' does not apply to {} pages", field, page_type)
            }
            PageError::InvalidValue { field, value } => {
                write!(f, "invalid value for '{}': {}", field, value)
            }
            PageError::NoCustomStyle(id) => write!(f, "page {} has no custom style enabled", id),
            PageError::EmptyStyleName => write!(f, "a saved style needs a name"),
            PageError::TagIndex(i) => write!(f, "no tag at index {}", i),
            PageError::DropRejected(why) => write!(f, "drop rejected: {}", why),
            PageError::Gradient(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PageError {}

impl From<GradientError> for PageError {
    fn from(e: GradientError) -> Self {
        PageError::Gradient(e)
    }
}

/// All pages, newest first.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
    next_color: usize,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored pages; the color rotation continues after the
    /// highest index in use.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let next_color = pages
            .iter()
            .map(|p| p.color_index)
            .max()
            .map(|max| (max + 1) % BORDER_COLORS.len())
            .unwrap_or(0);
        Self { pages, next_color }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Page, PageError> {
        self.pages
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PageError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Page, PageError> {
        self.pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PageError::NotFound(id.to_string()))
    }

    /// Create a page from its template and put it first.
    pub fn create(&mut self, page_type: PageType, now: DateTime<Utc>) -> &Page {
        let mut stamp = now.timestamp_millis();
        while self.pages.iter().any(|p| p.id == stamp.to_string()) {
            stamp += 1;
        }

        let page = Page {
            id: stamp.to_string(),
            page_type,
            data: page_type.template(now),
            color_index: self.next_color,
        };
        self.next_color = (self.next_color + 1) % BORDER_COLORS.len();
        log::debug!("created {} page {}", page_type, page.id);

        self.pages.insert(0, page);
        &self.pages[0]
    }

    pub fn delete(&mut self, id: &str) -> Result<Page, PageError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PageError::NotFound(id.to_string()))?;
        Ok(self.pages.remove(index))
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.next_color = 0;
    }

    pub fn set_field(&mut self, id: &str, field: PageField, value: FieldValue) -> Result<(), PageError> {
        let page = self.get_mut(id)?;
        let page_type = page.page_type;
        if !page_type.supports(field) {
            return Err(PageError::FieldNotSupported { field: field.name(), page_type });
        }
        let invalid = |value: &FieldValue| PageError::InvalidValue {
            field: field.name(),
            value: format!("{:?}", value),
        };
        let data = &mut page.data;

        match (field, value) {
            (PageField::Title, FieldValue::Text(v)) => data.title = v,
            (PageField::Thumbnail, FieldValue::Text(v)) => data.thumbnail = v,
            (PageField::ThumbnailAlt, FieldValue::Text(v)) => data.thumbnail_alt = v,
            (PageField::Date, FieldValue::Text(v)) => data.date = Some(v),
            (PageField::ProjectYear, FieldValue::Text(v)) => data.project_year = Some(v),
            (PageField::Description, FieldValue::Text(v)) => data.description = v,
            (PageField::Lightbox, FieldValue::Flag(v)) => data.lightbox = v,
            (PageField::Dark, FieldValue::Flag(v)) => {
                data.dark = v;
                // Dark notes pages default to a dark notecard.
                if v && page_type == PageType::Notes && !data.notecard_dark {
                    data.notecard_dark = true;
                    data.notecard_text_color.get_or_insert(DEFAULT_NOTECARD_TEXT);
                }
            }
            (PageField::NotecardDark, FieldValue::Flag(v)) => {
                data.notecard_dark = v;
                if v {
                    data.notecard_text_color.get_or_insert(DEFAULT_NOTECARD_TEXT);
                }
            }
            (PageField::BgImage, FieldValue::Text(v)) => {
                let style = data.custom_style.as_mut().ok_or_else(|| PageError::NoCustomStyle(id.to_string()))?;
                style.bg_image = v;
                style.image_loaded = false;
            }
            (PageField::BgImageOpacity, FieldValue::Number(v)) => {
                let style = data.custom_style.as_mut().ok_or_else(|| PageError::NoCustomStyle(id.to_string()))?;
                style.bg_image_opacity = if v.is_nan() { 1.0 } else { v.clamp(0.0, 1.0) };
            }
            (_, other) => return Err(invalid(&other)),
        }
        Ok(())
    }

    /// Add a project tag. Returns false when the tag is blank or present.
    pub fn add_tag(&mut self, id: &str, tag: &str) -> Result<bool, PageError> {
        let page = self.get_mut(id)?;
        if page.page_type != PageType::Artwork {
            return Err(PageError::FieldNotSupported { field: "projectTags", page_type: page.page_type });
        }
        let tag = tag.trim();
        if tag.is_empty() || page.data.project_tags.iter().any(|t| t == tag) {
            return Ok(false);
        }
        page.data.project_tags.push(tag.to_string());
        Ok(true)
    }

    pub fn remove_tag(&mut self, id: &str, index: usize) -> Result<String, PageError> {
        let page = self.get_mut(id)?;
        if index >= page.data.project_tags.len() {
            return Err(PageError::TagIndex(index));
        }
        Ok(page.data.project_tags.remove(index))
    }

    /// Turn the custom style on, reset to the type's default.
    pub fn enable_style(&mut self, id: &str) -> Result<(), PageError> {
        let page = self.get_mut(id)?;
        let style = page
            .page_type
            .default_style()
            .ok_or(PageError::FieldNotSupported { field: "customStyle", page_type: page.page_type })?;
        page.data.custom_style = Some(style);
        Ok(())
    }

    pub fn disable_style(&mut self, id: &str) -> Result<(), PageError> {
        let page = self.get_mut(id)?;
        if let Some(style) = page.data.custom_style.as_mut() {
            style.enabled = false;
        }
        Ok(())
    }

    fn active_style_mut(&mut self, id: &str) -> Result<&mut CustomStyle, PageError> {
        let page = self.get_mut(id)?;
        page.data
            .custom_style
            .as_mut()
            .filter(|s| s.enabled)
            .ok_or_else(|| PageError::NoCustomStyle(id.to_string()))
    }

    pub fn set_style_kind(&mut self, id: &str, kind: StyleKind) -> Result<(), PageError> {
        self.active_style_mut(id)?.kind = kind;
        Ok(())
    }

    pub fn add_stop(&mut self, id: &str) -> Result<Color, PageError> {
        Ok(self.active_style_mut(id)?.gradient_stops.append())
    }

    pub fn remove_stop(&mut self, id: &str, index: usize) -> Result<Color, PageError> {
        Ok(self.active_style_mut(id)?.gradient_stops.remove(index)?)
    }

    pub fn drop_stop(
        &mut self,
        id: &str,
        dragged: usize,
        target: usize,
        placement: DropPlacement,
    ) -> Result<usize, PageError> {
        Ok(self.active_style_mut(id)?.gradient_stops.drop_on(dragged, target, placement)?)
    }

    /// Current value of a color field.
    pub fn color(&self, id: &str, field: ColorField) -> Result<Color, PageError> {
        let page = self.get(id)?;
        let style = || page.data.active_style().ok_or_else(|| PageError::NoCustomStyle(id.to_string()));
        match field {
            ColorField::SolidColor => Ok(style()?.solid_color),
            ColorField::GradientStop(i) => {
                let stops = &style()?.gradient_stops;
                stops
                    .get(i)
                    .ok_or(PageError::Gradient(GradientError::OutOfRange { index: i, len: stops.len() }))
            }
            ColorField::NotecardTextColor => Ok(page.data.notecard_text_color.unwrap_or(DEFAULT_NOTECARD_TEXT)),
        }
    }

    /// Write a color field. This is the picker's commit target.
    pub fn set_color(&mut self, id: &str, field: ColorField, color: Color) -> Result<(), PageError> {
        match field {
            ColorField::SolidColor => self.active_style_mut(id)?.solid_color = color,
            ColorField::GradientStop(i) => self.active_style_mut(id)?.gradient_stops.set(i, color)?,
            ColorField::NotecardTextColor => {
                let page = self.get_mut(id)?;
                if page.page_type != PageType::Notes {
                    return Err(PageError::FieldNotSupported {
                        field: "notecardTextColor",
                        page_type: page.page_type,
                    });
                }
                page.data.notecard_text_color = Some(color);
            }
        }
        Ok(())
    }

    /// Apply a dropped packet.
    pub fn apply_drop(&mut self, id: &str, target: DropTarget, packet: &TransferPacket) -> Result<(), PageError> {
        match (target, packet) {
            (DropTarget::Color(field), TransferPacket::Color { color, .. }) => self.set_color(id, field, *color),
            (DropTarget::Color(_), _) => Err(PageError::DropRejected("a color swatch only accepts colors")),
            (DropTarget::StylePreview, packet) => {
                let style = self.active_style_mut(id)?;
                match packet {
                    TransferPacket::SavedStyle { style: saved } => style.apply_saved(saved),
                    TransferPacket::Color { color, .. } => style.set_color(*color),
                    TransferPacket::GradientStops { stops, .. } => style.set_gradient(stops.clone()),
                }
                Ok(())
            }
        }
    }

    /// Snapshot the page's enabled style as a named sidebar entry.
    pub fn save_style(&self, id: &str, name: &str, now: DateTime<Utc>) -> Result<SavedStyle, PageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PageError::EmptyStyleName);
        }
        let page = self.get(id)?;
        let style = page.data.active_style().ok_or_else(|| PageError::NoCustomStyle(id.to_string()))?;
        Ok(SavedStyle::from_custom(
            SavedStyle::id_for(now.timestamp_millis()),
            name.to_string(),
            style,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sitetools_core::SavedStyleBody;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
    }

    fn store_with(page_type: PageType) -> (PageStore, String) {
        let mut store = PageStore::new();
        let id = store.create(page_type, now()).id.clone();
        (store, id)
    }

    #[test]
    fn test_templates() {
        let blog = PageType::Blog.template(now());
        assert_eq!(blog.date.as_deref(), Some("2024-03-09"));
        assert!(blog.custom_style.is_none());

        let artwork = PageType::Artwork.template(now());
        assert_eq!(artwork.project_year.as_deref(), Some("2024"));
        let style = artwork.custom_style.unwrap();
        assert!(style.enabled);
        assert_eq!(style.solid_color.to_hex(), "#cfcecc");
        assert_eq!(style.gradient_stops.to_css(), "radial-gradient(#d5dcdf, #dddddd, #d0dada)");

        let notes = PageType::Notes.template(now());
        assert_eq!(notes.custom_style.unwrap().solid_color.to_hex(), "#d8ddea");
        assert_eq!(notes.notecard_text_color, Some(DEFAULT_NOTECARD_TEXT));
        assert!(!notes.notecard_dark);
    }

    #[test]
    fn test_create_newest_first_with_color_rotation() {
        let mut store = PageStore::new();
        for _ in 0..6 {
            store.create(PageType::Blog, now());
        }
        let indices: Vec<usize> = store.pages().iter().map(|p| p.color_index).collect();
        assert_eq!(indices, vec![0, 4, 3, 2, 1, 0]);

        let ids: Vec<&str> = store.pages().iter().map(|p| p.id.as_str()).collect();
        let base = now().timestamp_millis();
        assert_eq!(ids[0], (base + 5).to_string());
        assert_eq!(ids[5], base.to_string());
    }

    #[test]
    fn test_from_pages_continues_rotation() {
        let (store, _) = store_with(PageType::Notes);
        let mut pages = store.into_pages();
        pages[0].color_index = 3;
        let mut store = PageStore::from_pages(pages);
        assert_eq!(store.create(PageType::Blog, now()).color_index, 4);
        assert_eq!(store.pages()[1].border_color(), "var(--color-green)");
    }

    #[test]
    fn test_dark_notes_turns_on_notecard() {
        let (mut store, id) = store_with(PageType::Notes);
        store.set_field(&id, PageField::Dark, FieldValue::Flag(true)).unwrap();
        let data = &store.get(&id).unwrap().data;
        assert!(data.dark);
        assert!(data.notecard_dark);
        assert_eq!(data.notecard_text_color, Some(DEFAULT_NOTECARD_TEXT));
    }

    #[test]
    fn test_field_support_by_type() {
        let (mut store, id) = store_with(PageType::Blog);
        let err = store.set_field(&id, PageField::Dark, FieldValue::Flag(true)).unwrap_err();
        assert!(matches!(err, PageError::FieldNotSupported { field: "dark", .. }));

        let err = store.set_field(&id, PageField::Title, FieldValue::Flag(true)).unwrap_err();
        assert!(matches!(err, PageError::InvalidValue { field: "title", .. }));
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("customStyle.bgImage".parse::<PageField>(), Ok(PageField::BgImage));
        assert_eq!(PageField::Lightbox.parse_value("yes").unwrap(), FieldValue::Flag(true));
        assert!(PageField::BgImageOpacity.parse_value("half").is_err());
    }

    #[test]
    fn test_opacity_clamped() {
        let (mut store, id) = store_with(PageType::Artwork);
        store.set_field(&id, PageField::BgImageOpacity, FieldValue::Number(3.0)).unwrap();
        let style = store.get(&id).unwrap().data.custom_style.clone().unwrap();
        assert_eq!(style.bg_image_opacity, 1.0);
    }

    #[test]
    fn test_tags() {
        let (mut store, id) = store_with(PageType::Artwork);
        assert!(store.add_tag(&id, " print ").unwrap());
        assert!(!store.add_tag(&id, "print").unwrap());
        assert!(!store.add_tag(&id, "   ").unwrap());
        assert!(store.add_tag(&id, "zine").unwrap());
        assert_eq!(store.remove_tag(&id, 0).unwrap(), "print");
        assert_eq!(store.get(&id).unwrap().data.project_tags, vec!["zine"]);
        assert_eq!(store.remove_tag(&id, 5), Err(PageError::TagIndex(5)));
    }

    #[test]
    fn test_style_enable_disable() {
        let (mut store, id) = store_with(PageType::Notes);
        store.set_style_kind(&id, StyleKind::Gradient).unwrap();
        store.disable_style(&id).unwrap();
        assert!(store.get(&id).unwrap().data.active_style().is_none());
        assert!(matches!(store.add_stop(&id), Err(PageError::NoCustomStyle(_))));

        store.enable_style(&id).unwrap();
        let style = store.get(&id).unwrap().data.active_style().unwrap().clone();
        assert_eq!(style.kind, StyleKind::Solid);
    }

    #[test]
    fn test_gradient_stop_edits() {
        let (mut store, id) = store_with(PageType::Artwork);
        assert_eq!(store.add_stop(&id).unwrap().to_hex(), "#d0dada");
        store.remove_stop(&id, 0).unwrap();
        store.remove_stop(&id, 0).unwrap();
        assert!(matches!(store.remove_stop(&id, 0), Err(PageError::Gradient(GradientError::AtMinimum))));
        store.set_color(&id, ColorField::GradientStop(1), Color::WHITE).unwrap();
        assert_eq!(store.color(&id, ColorField::GradientStop(1)).unwrap(), Color::WHITE);
        assert!(store.color(&id, ColorField::GradientStop(9)).is_err());
    }

    #[test]
    fn test_drop_on_style_preview() {
        let (mut store, id) = store_with(PageType::Artwork);
        let stops = GradientStops::pair(Color::BLACK, Color::WHITE);
        store
            .apply_drop(&id, DropTarget::StylePreview, &TransferPacket::gradient(stops.clone()))
            .unwrap();
        let style = store.get(&id).unwrap().data.active_style().unwrap().clone();
        assert_eq!(style.kind, StyleKind::Gradient);
        assert_eq!(style.gradient_stops, stops);

        let saved = SavedStyle {
            id: "saved-style-1".into(),
            name: "Stone".into(),
            body: SavedStyleBody::Solid { solid_color: Color::from_rgb(9, 9, 9) },
        };
        store
            .apply_drop(&id, DropTarget::StylePreview, &TransferPacket::SavedStyle { style: saved })
            .unwrap();
        assert_eq!(store.color(&id, ColorField::SolidColor).unwrap(), Color::from_rgb(9, 9, 9));
    }

    #[test]
    fn test_drop_on_swatch_accepts_colors_only() {
        let (mut store, id) = store_with(PageType::Notes);
        let target = DropTarget::Color(ColorField::NotecardTextColor);
        store.apply_drop(&id, target, &TransferPacket::color(Color::BLACK)).unwrap();
        assert_eq!(store.color(&id, ColorField::NotecardTextColor).unwrap(), Color::BLACK);

        let packet = TransferPacket::gradient(GradientStops::pair(Color::BLACK, Color::WHITE));
        assert!(matches!(store.apply_drop(&id, target, &packet), Err(PageError::DropRejected(_))));
    }

    #[test]
    fn test_save_style() {
        let (mut store, id) = store_with(PageType::Artwork);
        assert_eq!(store.save_style(&id, "  ", now()), Err(PageError::EmptyStyleName));

        let saved = store.save_style(&id, "Clay", now()).unwrap();
        assert_eq!(saved.id, format!("saved-style-{}", now().timestamp_millis()));
        assert_eq!(saved.body, SavedStyleBody::Solid { solid_color: Color::from_rgb(0xcf, 0xce, 0xcc) });

        store.disable_style(&id).unwrap();
        assert!(matches!(store.save_style(&id, "Clay", now()), Err(PageError::NoCustomStyle(_))));
    }

    #[test]
    fn test_picker_id_format() {
        let field = ColorFieldRef { page_id: "17".into(), field: ColorField::GradientStop(2) };
        assert_eq!(field.to_string(), "picker-17-gradientStop-2");
        let field = ColorFieldRef { page_id: "17".into(), field: ColorField::SolidColor };
        assert_eq!(field.to_string(), "picker-17-solidColor-none");
    }

    #[test]
    fn test_color_field_parse() {
        assert_eq!("solid".parse(), Ok(ColorField::SolidColor));
        assert_eq!("stop-3".parse(), Ok(ColorField::GradientStop(3)));
        assert_eq!("gradientStop-0".parse(), Ok(ColorField::GradientStop(0)));
        assert_eq!("notecard".parse(), Ok(ColorField::NotecardTextColor));
        assert!("stop-x".parse::<ColorField>().is_err());
    }

    #[test]
    fn test_page_json_shape() {
        let (store, id) = store_with(PageType::Blog);
        let v = serde_json::to_value(store.get(&id).unwrap()).unwrap();
        assert_eq!(v["type"], "blog");
        assert_eq!(v["colorIndex"], 0);
        assert_eq!(v["data"]["date"], "2024-03-09");
        assert_eq!(v["data"]["thumbnailAlt"], "");
    }
}
