//! Site palette payloads.
//!
//! A payload has two top-level groupings, `css` and `frontmatter`, each
//! mapping a group name to properties of the form
//! `{"type": "color" | "gradient", "value": "..."}`. Groups and properties
//! keep their order from the JSON document.
//!
//! Items are addressed by position: `site-color-0-3` is the fourth item of
//! the first group. Temporary gradients are `temp-gradient-N`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use sitetools_core::{Color, GradientStops, TransferPacket};

const TOP_LEVEL_KEYS: [&str; 2] = ["css", "frontmatter"];

const GRADIENT_KEYWORDS: [&str; 9] =
    ["radial", "linear", "to", "right", "left", "top", "bottom", "gradient", "repeating"];

pub const TEMPORARY_GROUP: &str = "Temporary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    InvalidJson(String),
    NotAnObject,
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::InvalidJson(e) => write!(f, "invalid palette JSON: {}", e),
            PaletteError::NotAnObject => write!(f, "palette must be a JSON object"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Parse palette text. The result is the raw document, kept as-is in storage.
pub fn parse_palette_json(text: &str) -> Result<Value, PaletteError> {
    let value: Value = serde_json::from_str(text).map_err(|e| PaletteError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(PaletteError::NotAnObject);
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Color,
    Gradient,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Color => "color",
            ItemKind::Gradient => "gradient",
        }
    }
}

/// Identifier of a palette item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemId {
    Site { kind: ItemKind, group: usize, item: usize },
    Temp { index: usize },
}

impl ItemId {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemId::Site { kind, .. } => *kind,
            ItemId::Temp { .. } => ItemKind::Gradient,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Site { kind, group, item } => write!(f, "site-{}-{}-{}", kind.as_str(), group, item),
            ItemId::Temp { index } => write!(f, "temp-gradient-{}", index),
        }
    }
}

impl FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let num = |p: &str| p.parse::<usize>().map_err(|_| format!("invalid item id '{}'", s));
        match parts.as_slice() {
            ["site", "color", g, i] => Ok(ItemId::Site { kind: ItemKind::Color, group: num(*g)?, item: num(*i)? }),
            ["site", "gradient", g, i] => Ok(ItemId::Site { kind: ItemKind::Gradient, group: num(*g)?, item: num(*i)? }),
            // Older stores wrote temporary ids kind-first.
            ["temp", "gradient", n] | ["gradient", "temp", n] => Ok(ItemId::Temp { index: num(*n)? }),
            _ => Err(format!("invalid item id '{}'", s)),
        }
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteValue {
    Color { value: String },
    Gradient { css: String, stops: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteItem {
    pub name: String,
    pub value: PaletteValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteGroup {
    pub title: String,
    pub items: Vec<PaletteItem>,
}

fn stop_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#[0-9A-Fa-f]{3,6}|rgba?\([^)]+\)|hsla?\([^)]+\)|[a-z]+").unwrap())
}

/// Color tokens of a CSS gradient, in order, without function names and
/// direction keywords.
pub fn extract_gradient_stops(css: &str) -> Vec<String> {
    stop_token_re()
        .find_iter(css)
        .map(|m| m.as_str())
        .filter(|token| !GRADIENT_KEYWORDS.contains(&token.to_lowercase().as_str()))
        .map(str::to_string)
        .collect()
}

/// Flatten a palette document into groups. Properties with an unknown
/// type are skipped, and so are groups left empty.
pub fn parse_color_data(data: &Value) -> Vec<PaletteGroup> {
    let mut groups = Vec::new();

    for top in TOP_LEVEL_KEYS {
        let Some(grouping) = data.get(top).and_then(Value::as_object) else {
            continue;
        };

        for (group_name, properties) in grouping {
            let Some(properties) = properties.as_object() else {
                log::debug!("skipping non-object palette group {}.{}", top, group_name);
                continue;
            };

            let items: Vec<PaletteItem> = properties
                .iter()
                .filter_map(|(name, prop)| {
                    let value = prop.get("value").and_then(Value::as_str).unwrap_or_default();
                    let value = match prop.get("type").and_then(Value::as_str) {
                        Some("color") => PaletteValue::Color { value: value.to_string() },
                        Some("gradient") => PaletteValue::Gradient {
                            css: value.to_string(),
                            stops: extract_gradient_stops(value),
                        },
                        _ => return None,
                    };
                    Some(PaletteItem { name: name.clone(), value })
                })
                .collect();

            if !items.is_empty() {
                groups.push(PaletteGroup { title: group_name.clone(), items });
            }
        }
    }

    groups
}

/// A gradient the user assembled outside the site palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempGradient {
    pub name: String,
    pub stops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogColor {
    pub id: ItemId,
    pub name: String,
    pub value: String,
    pub group_title: String,
}

impl CatalogColor {
    pub fn color(&self) -> Option<Color> {
        Color::parse(&self.value).ok()
    }

    /// Drag payload, when the value is a color we can read.
    pub fn packet(&self) -> Option<TransferPacket> {
        let color = self.color()?;
        Some(TransferPacket::Color { color, source_id: Some(self.id.to_string()) })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogGradient {
    pub id: ItemId,
    pub name: String,
    pub stops: Vec<String>,
    pub css: String,
    pub group_title: String,
}

impl CatalogGradient {
    /// Stops as colors. None if any stop is not a hex or `rgb()` color.
    pub fn hex_stops(&self) -> Option<GradientStops> {
        let colors = self
            .stops
            .iter()
            .map(|s| Color::parse(s).ok())
            .collect::<Option<Vec<Color>>>()?;
        GradientStops::new(colors).ok()
    }

    pub fn packet(&self) -> Option<TransferPacket> {
        let stops = self.hex_stops()?;
        Some(TransferPacket::GradientStops { stops, source_id: Some(self.id.to_string()) })
    }

    pub fn detail(&self) -> GradientDetail {
        GradientDetail {
            id: self.id.to_string(),
            name: self.name.clone(),
            group: self.group_title.clone(),
            css: self.css.clone(),
            stops: self.stops.clone(),
            pinnable: self.hex_stops().is_some(),
        }
    }
}

/// What the gradient detail view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientDetail {
    pub id: String,
    pub name: String,
    pub group: String,
    pub css: String,
    pub stops: Vec<String>,
    /// False when a stop is not a plain color, so the gradient cannot be
    /// dropped on a page.
    pub pinnable: bool,
}

/// Every addressable color and gradient, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteCatalog {
    pub colors: Vec<CatalogColor>,
    pub gradients: Vec<CatalogGradient>,
}

impl PaletteCatalog {
    pub fn build(groups: &[PaletteGroup], temp: &[TempGradient]) -> Self {
        let mut catalog = Self::default();

        for (g, group) in groups.iter().enumerate() {
            for (i, item) in group.items.iter().enumerate() {
                match &item.value {
                    PaletteValue::Color { value } => catalog.colors.push(CatalogColor {
                        id: ItemId::Site { kind: ItemKind::Color, group: g, item: i },
                        name: item.name.clone(),
                        value: value.clone(),
                        group_title: group.title.clone(),
                    }),
                    PaletteValue::Gradient { css, stops } => catalog.gradients.push(CatalogGradient {
                        id: ItemId::Site { kind: ItemKind::Gradient, group: g, item: i },
                        name: item.name.clone(),
                        stops: stops.clone(),
                        css: css.clone(),
                        group_title: group.title.clone(),
                    }),
                }
            }
        }

        for (index, gradient) in temp.iter().enumerate() {
            catalog.gradients.push(CatalogGradient {
                id: ItemId::Temp { index },
                name: gradient.name.clone(),
                stops: gradient.stops.clone(),
                css: format!("radial-gradient({})", gradient.stops.join(", ")),
                group_title: TEMPORARY_GROUP.to_string(),
            });
        }

        catalog
    }

    pub fn from_document(data: Option<&Value>, temp: &[TempGradient]) -> Self {
        match data {
            Some(data) => Self::build(&parse_color_data(data), temp),
            None => Self::build(&[], temp),
        }
    }

    pub fn color(&self, id: &ItemId) -> Option<&CatalogColor> {
        self.colors.iter().find(|c| c.id == *id)
    }

    pub fn gradient(&self, id: &ItemId) -> Option<&CatalogGradient> {
        self.gradients.iter().find(|g| g.id == *id)
    }

    /// Find a gradient by id or by name.
    pub fn find_gradient(&self, key: &str) -> Option<&CatalogGradient> {
        match key.parse::<ItemId>() {
            Ok(id) => self.gradient(&id),
            Err(_) => self.gradients.iter().find(|g| g.name == key),
        }
    }

    /// Pinned colors in catalog order. Ids that no longer resolve are ignored.
    pub fn pinned_colors(&self, ids: &[ItemId]) -> Vec<&CatalogColor> {
        self.colors.iter().filter(|c| ids.contains(&c.id)).collect()
    }

    pub fn pinned_gradients(&self, ids: &[ItemId]) -> Vec<&CatalogGradient> {
        self.gradients.iter().filter(|g| ids.contains(&g.id)).collect()
    }
}
