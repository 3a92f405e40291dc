// Custom page background styles and the saved-style library entries

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::gradient::GradientStops;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    #[default]
    Solid,
    Gradient,
    Image,
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StyleKind::Solid => "solid",
            StyleKind::Gradient => "gradient",
            StyleKind::Image => "image",
        };
        f.write_str(s)
    }
}

impl FromStr for StyleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solid" => Ok(StyleKind::Solid),
            "gradient" => Ok(StyleKind::Gradient),
            "image" => Ok(StyleKind::Image),
            other => Err(format!("unknown style type '{}' (expected solid, gradient or image)", other)),
        }
    }
}

fn default_opacity() -> f64 {
    1.0
}

/// Background style attached to artwork and notes pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomStyle {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: StyleKind,
    pub solid_color: Color,
    pub gradient_stops: GradientStops,
    pub bg_image: String,
    #[serde(default = "default_opacity")]
    pub bg_image_opacity: f64,
    pub image_loaded: bool,
}

impl Default for CustomStyle {
    fn default() -> Self {
        Self::new(
            Color::from_rgb(0xcf, 0xce, 0xcc),
            GradientStops::pair(Color::WHITE, Color::BLACK),
        )
    }
}

impl CustomStyle {
    /// An enabled solid style with the given defaults.
    pub fn new(solid_color: Color, gradient_stops: GradientStops) -> Self {
        Self {
            enabled: true,
            kind: StyleKind::Solid,
            solid_color,
            gradient_stops,
            bg_image: String::new(),
            bg_image_opacity: default_opacity(),
            image_loaded: false,
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.kind = StyleKind::Solid;
        self.solid_color = color;
    }

    pub fn set_gradient(&mut self, stops: GradientStops) {
        self.kind = StyleKind::Gradient;
        self.gradient_stops = stops;
    }

    pub fn apply_saved(&mut self, saved: &SavedStyle) {
        match &saved.body {
            SavedStyleBody::Solid { solid_color } => self.set_color(*solid_color),
            SavedStyleBody::Gradient { gradient_stops } => self.set_gradient(gradient_stops.clone()),
            SavedStyleBody::Image { bg_image, bg_image_opacity } => {
                self.kind = StyleKind::Image;
                self.bg_image = bg_image.clone();
                self.bg_image_opacity = *bg_image_opacity;
                self.image_loaded = false;
            }
        }
    }
}

/// A named style kept in the shared sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStyle {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub body: SavedStyleBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SavedStyleBody {
    Solid {
        #[serde(rename = "solidColor")]
        solid_color: Color,
    },
    Gradient {
        #[serde(rename = "gradientStops")]
        gradient_stops: GradientStops,
    },
    Image {
        #[serde(rename = "bgImage")]
        bg_image: String,
        #[serde(rename = "bgImageOpacity", default = "default_opacity")]
        bg_image_opacity: f64,
    },
}

impl SavedStyle {
    /// Identifier for a style saved at `millis` since the epoch.
    pub fn id_for(millis: i64) -> String {
        format!("saved-style-{}", millis)
    }

    /// Snapshot the active kind of `style` under `name`.
    pub fn from_custom(id: String, name: String, style: &CustomStyle) -> Self {
        let body = match style.kind {
            StyleKind::Solid => SavedStyleBody::Solid { solid_color: style.solid_color },
            StyleKind::Gradient => SavedStyleBody::Gradient {
                gradient_stops: style.gradient_stops.clone(),
            },
            StyleKind::Image => SavedStyleBody::Image {
                bg_image: style.bg_image.clone(),
                bg_image_opacity: style.bg_image_opacity,
            },
        };
        Self { id, name, body }
    }

    pub fn kind(&self) -> StyleKind {
        match self.body {
            SavedStyleBody::Solid { .. } => StyleKind::Solid,
            SavedStyleBody::Gradient { .. } => StyleKind::Gradient,
            SavedStyleBody::Image { .. } => StyleKind::Image,
        }
    }

    /// CSS background value used for previews.
    pub fn preview_css(&self) -> String {
        match &self.body {
            SavedStyleBody::Solid { solid_color } => solid_color.to_hex(),
            SavedStyleBody::Gradient { gradient_stops } => gradient_stops.to_css(),
            SavedStyleBody::Image { bg_image, .. } => format!("url({})", bg_image),
        }
    }
}
