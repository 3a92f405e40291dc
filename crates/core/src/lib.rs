//! Core types shared by every sitetools crate.
//!
//! Colors are stored as canonical hex triples and edited as HSB. Gradients
//! are ordered stop lists that never drop below two stops. Custom styles and
//! transfer packets describe what can be dragged between tools.

pub mod color;
pub mod gradient;
pub mod lenient;
pub mod style;
pub mod transfer;

pub use color::{hex_to_rgb, hsb_to_rgb, parse_hex_input, rgb_to_hex, rgb_to_hsb, Color, ColorError, Hsb, Rgb};
pub use gradient::{DropPlacement, GradientError, GradientStops, MIN_STOPS};
pub use style::{CustomStyle, SavedStyle, SavedStyleBody, StyleKind};
pub use transfer::{TransferError, TransferPacket};
