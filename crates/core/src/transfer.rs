// Drag-and-drop payloads shared between tools
//
// A packet is plain JSON so any channel (drag data, clipboard, CLI argument)
// can carry it. Pinned items carry their palette id so a drop on the sidebar
// can pin them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::gradient::GradientStops;
use crate::style::SavedStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferPacket {
    Color {
        color: Color,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_id: Option<String>,
    },
    GradientStops {
        stops: GradientStops,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_id: Option<String>,
    },
    SavedStyle {
        style: SavedStyle,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferError(pub String);

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid transfer packet: {}", self.0)
    }
}

impl std::error::Error for TransferError {}

impl TransferPacket {
    pub fn color(color: Color) -> Self {
        TransferPacket::Color { color, source_id: None }
    }

    pub fn gradient(stops: GradientStops) -> Self {
        TransferPacket::GradientStops { stops, source_id: None }
    }

    /// Palette item id the packet was dragged from, if any.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            TransferPacket::Color { source_id, .. } | TransferPacket::GradientStops { source_id, .. } => {
                source_id.as_deref()
            }
            TransferPacket::SavedStyle { .. } => None,
        }
    }

    pub fn to_json(&self) -> String {
        // Every field serializes to plain strings and numbers.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, TransferError> {
        serde_json::from_str(json).map_err(|e| TransferError(e.to_string()))
    }
}
