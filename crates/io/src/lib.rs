// Text outputs and palette payload parsing

pub mod frontmatter;
pub mod palette;
pub mod shortcode;

pub use frontmatter::{generate_filename, generate_frontmatter};
pub use palette::{
    extract_gradient_stops, parse_color_data, parse_palette_json, CatalogColor, CatalogGradient, GradientDetail,
    ItemId, ItemKind, PaletteCatalog, PaletteError, PaletteGroup, TempGradient,
};
pub use shortcode::{block_shortcode, video_shortcode};
