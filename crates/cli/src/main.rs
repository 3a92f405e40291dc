// sitetools CLI - palette, frontmatter, image and video shortcode tools
// State lives in one JSON document per tool under the store directory.

mod color;
mod exit_codes;
mod images;
mod palette;
mod pages;
mod util;
mod videos;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use sitetools_config::StorageError;
use sitetools_engine::{GalleryType, ImageError, PageError, PageType, VideoError};
use sitetools_fetch::FetchError;
use sitetools_io::PaletteError;

use exit_codes::{EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sitetools")]
#[command(about = "Authoring tools for the site: palette, frontmatter, image and video shortcodes")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Store directory (default: ~/.config/sitetools/storage)
    #[arg(long, global = true, env = "SITETOOLS_STORE", value_name = "DIR")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert colors between hex, RGB and HSB
    #[command(after_help = "\
Examples:
  sitetools color show '#3366CC'
  sitetools color show 'rgb(51, 102, 204)' --json
  sitetools color hsb 220 75 80")]
    Color {
        #[command(subcommand)]
        command: ColorCommands,
    },

    /// Load the site palette, pin colors and gradients
    #[command(after_help = "\
Examples:
  sitetools palette load-url
  sitetools palette load-file colors.json
  sitetools palette list
  sitetools palette pin site-color-0-3
  sitetools palette gradient site-gradient-1-0")]
    Palette {
        #[command(subcommand)]
        command: PaletteCommands,
    },

    /// Pinned colors sidebar
    Pins {
        #[command(subcommand)]
        command: PinCommands,
    },

    /// Saved styles in the sidebar
    Styles {
        #[command(subcommand)]
        command: StyleCommands,
    },

    /// Frontmatter pages
    #[command(after_help = "\
Examples:
  sitetools page new artwork
  sitetools page set 1718000000000 title 'Tide Pools'
  sitetools page style 1718000000000 gradient
  sitetools page stop 1718000000000 add
  sitetools page color 1718000000000 stop-0 '#ff8800'
  sitetools page drop 1718000000000 preview site-gradient-1-0
  sitetools page frontmatter 1718000000000")]
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },

    /// Image and gallery shortcodes
    #[command(after_help = "\
Examples:
  sitetools images load https://cdn.test/a.jpg https://cdn.test/b.jpg
  sitetools images block gallery 0 1
  sitetools images gallery-type block-0 vertical
  sitetools images shortcode block-0")]
    Images {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Video shortcodes from spreadsheet rows
    #[command(after_help = "\
Examples:
  pbpaste | sitetools video add
  sitetools video list
  sitetools video shortcode video-0")]
    Video {
        #[command(subcommand)]
        command: VideoCommands,
    },
}

#[derive(Subcommand)]
enum ColorCommands {
    /// Show a color as hex, RGB and HSB
    Show {
        /// `#rgb`, `#rrggbb` or `rgb(r, g, b)`
        color: String,

        #[arg(long)]
        json: bool,
    },

    /// Build a color from hue (0-360), saturation and brightness (0-100)
    #[command(allow_negative_numbers = true)]
    Hsb {
        hue: f64,
        saturation: f64,
        brightness: f64,
    },
}

#[derive(Subcommand)]
enum PaletteCommands {
    /// Fetch the palette (default URL from settings)
    LoadUrl { url: Option<String> },

    /// Load the palette from a JSON file
    LoadFile { path: PathBuf },

    /// Re-fetch a URL palette or re-read a file palette
    Refresh,

    /// Where the palette came from and when
    Status,

    /// List colors and gradients with their ids
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a gradient's CSS and stops
    Gradient {
        /// Gradient id or name
        key: String,

        #[arg(long)]
        json: bool,
    },

    /// Add a temporary gradient
    AddGradient {
        name: String,

        /// Two or more colors
        #[arg(required = true, num_args = 2..)]
        stops: Vec<String>,
    },

    /// Pin or unpin a color or gradient
    Pin { id: String },

    /// Print the drag payload for a color or gradient
    Packet { id: String },

    /// Remove the palette, temporary gradients and pins
    Clear,
}

#[derive(Subcommand)]
enum PinCommands {
    /// Pinned items grouped by palette group, then saved styles
    List {
        #[arg(long)]
        json: bool,
    },

    /// Unpin a color or gradient
    Unpin { id: String },

    /// Pin the item a drag payload came from
    Drop { packet: String },

    /// Clear all pins and saved styles
    Clear,
}

#[derive(Subcommand)]
enum StyleCommands {
    /// List saved styles
    List {
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved style
    Delete { id: String },

    /// Print the drag payload for a saved style
    Packet { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleAction {
    Enable,
    Disable,
    Solid,
    Gradient,
    Image,
}

#[derive(Subcommand)]
enum StopAction {
    /// Append a copy of the last stop
    Add,

    /// Remove a stop (a gradient keeps at least two)
    Remove { index: usize },

    /// Drag stop `dragged` onto stop `target`
    Move {
        dragged: usize,
        target: usize,

        /// Drop on the lower half of the target swatch
        #[arg(long)]
        below: bool,
    },
}

#[derive(Subcommand)]
enum PageCommands {
    /// Create a page (blog, artwork or notes)
    New { page_type: PageType },

    /// List pages, newest first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a page's fields, frontmatter and filename
    Show { id: String },

    /// Set a field (title, thumbnail, thumbnailAlt, date, projectYear,
    /// description, lightbox, dark, notecardDark, bgImage, bgImageOpacity)
    Set { id: String, field: String, value: String },

    /// Add a project tag (artwork pages)
    Tag { id: String, tag: String },

    /// Remove a project tag by position
    Untag { id: String, index: usize },

    /// Enable, disable or switch the custom style
    Style {
        id: String,
        #[arg(value_enum)]
        action: StyleAction,
    },

    /// Edit gradient stops
    Stop {
        id: String,
        #[command(subcommand)]
        action: StopAction,
    },

    /// Set a color field from hex text (solid, notecard, stop-N)
    Color { id: String, field: String, hex: String },

    /// Set a color field from HSB
    Pick {
        id: String,
        field: String,
        #[arg(long)]
        hue: Option<f64>,
        #[arg(long)]
        saturation: Option<f64>,
        #[arg(long)]
        brightness: Option<f64>,
    },

    /// Drop a payload, pinned item id or saved style id on a swatch
    /// (solid, notecard, stop-N) or on the style preview (preview)
    Drop { id: String, target: String, payload: String },

    /// Save the page's custom style to the sidebar
    SaveStyle { id: String, name: String },

    /// Delete a page
    Delete { id: String },

    /// Delete all pages
    Clear,

    /// Print the frontmatter block
    Frontmatter { id: String },

    /// Print the suggested filename
    Filename { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum BlockKindArg {
    Image,
    Gallery,
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Stage image URLs (reads stdin, one per line, when none are given)
    Load { urls: Vec<String> },

    /// Show staged images and blocks
    List {
        #[arg(long)]
        json: bool,
    },

    /// Remove a staged image
    Remove { index: usize },

    /// Create a block from staged images
    Block {
        #[arg(value_enum)]
        kind: BlockKindArg,
        #[arg(required = true)]
        indices: Vec<usize>,
    },

    /// Create an empty block
    NewBlock {
        #[arg(value_enum)]
        kind: BlockKindArg,
    },

    /// Delete a block, returning its images to staging
    DeleteBlock { id: String },

    /// Set a gallery's layout (two-column, three-column, vertical, tarot)
    GalleryType { id: String, gallery_type: GalleryType },

    /// Move a staged image into a block
    Move {
        index: usize,
        block: String,
        #[arg(long)]
        at: Option<usize>,
    },

    /// Send an image from a block back to staging
    Unstage { block: String, index: usize },

    /// Reorder images within a block
    Reorder { block: String, from: usize, to: usize },

    /// Edit an image in a block
    Edit {
        block: String,
        index: usize,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        width: Option<String>,
        #[arg(long)]
        classes: Option<String>,
        #[arg(long)]
        caption: Option<bool>,
        #[arg(long)]
        full_width: Option<bool>,
    },

    /// Print shortcodes (all blocks when no id is given)
    Shortcode { block: Option<String> },

    /// Remove everything
    Clear,
}

#[derive(Subcommand)]
enum VideoCommands {
    /// Add a video from a tab-separated row (reads stdin when omitted)
    Add { row: Option<String> },

    /// List videos, newest first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a video's metadata and shortcode
    Show { id: String },

    /// Look up YouTube and PeerTube titles again
    Titles { id: String },

    /// Print the video shortcode
    Shortcode { id: String },

    /// Delete a video
    Delete { id: String },

    /// Delete all videos
    Clear,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let ctx = util::Context::new(cli.store);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: sitetools <command> [options]");
            eprintln!("       sitetools --help for more information");
            Ok(())
        }
        Some(Commands::Color { command }) => color::run(command),
        Some(Commands::Palette { command }) => palette::run_palette(&ctx, command),
        Some(Commands::Pins { command }) => palette::run_pins(&ctx, command),
        Some(Commands::Styles { command }) => palette::run_styles(&ctx, command),
        Some(Commands::Page { command }) => pages::run(&ctx, command),
        Some(Commands::Images { command }) => images::run(&ctx, command),
        Some(Commands::Video { command }) => videos::run(&ctx, command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn with_code(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        Self::with_code(exit_codes::storage_exit_code(&err), err.to_string())
    }
}

impl From<PageError> for CliError {
    fn from(err: PageError) -> Self {
        Self::with_code(exit_codes::page_exit_code(&err), err.to_string())
    }
}

impl From<ImageError> for CliError {
    fn from(err: ImageError) -> Self {
        Self::with_code(exit_codes::image_exit_code(&err), err.to_string())
    }
}

impl From<VideoError> for CliError {
    fn from(err: VideoError) -> Self {
        Self::with_code(exit_codes::video_exit_code(&err), err.to_string())
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        Self::with_code(exit_codes::fetch_exit_code(&err), err.to_string())
    }
}

impl From<PaletteError> for CliError {
    fn from(err: PaletteError) -> Self {
        Self::parse(err.to_string())
    }
}
