//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | store            | Local storage and input parsing          |
//! | 10-19   | edit             | Rejected edits on pages, images, videos  |
//! | 50-59   | fetch            | Palette and video metadata lookups       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use sitetools_config::StorageError;
use sitetools_engine::{ImageError, PageError, VideoError};
use sitetools_fetch::FetchError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Store (3-9)
// =============================================================================

/// Reading or writing the local store failed.
pub const EXIT_STORE_IO: u8 = 3;

/// Input could not be parsed (palette JSON, TSV row, transfer packet).
pub const EXIT_PARSE: u8 = 4;

// =============================================================================
// Edit (10-19)
// =============================================================================

/// Page, block, video or palette item does not exist.
pub const EXIT_NOT_FOUND: u8 = 10;

/// Edit rejected by a precondition (two-stop minimum, full image block,
/// field not valid for the page type, drop not accepted).
pub const EXIT_REJECTED: u8 = 11;

// =============================================================================
// Fetch (50-59)
// =============================================================================

/// Network failure or non-success HTTP status.
pub const EXIT_FETCH_UPSTREAM: u8 = 50;

/// Vimeo oEmbed failed after all attempts.
pub const EXIT_FETCH_VIMEO: u8 = 51;

/// Response was not the JSON we expected.
pub const EXIT_FETCH_PARSE: u8 = 52;

pub fn storage_exit_code(err: &StorageError) -> u8 {
    match err {
        StorageError::Parse { .. } => EXIT_PARSE,
        _ => EXIT_STORE_IO,
    }
}

pub fn page_exit_code(err: &PageError) -> u8 {
    match err {
        PageError::NotFound(_) | PageError::TagIndex(_) => EXIT_NOT_FOUND,
        PageError::InvalidValue { .. } | PageError::EmptyStyleName => EXIT_USAGE,
        _ => EXIT_REJECTED,
    }
}

pub fn image_exit_code(err: &ImageError) -> u8 {
    match err {
        ImageError::BlockNotFound(_) | ImageError::ThumbnailIndex(_) | ImageError::ImageIndex { .. } => {
            EXIT_NOT_FOUND
        }
        ImageError::NoUrls => EXIT_USAGE,
        _ => EXIT_REJECTED,
    }
}

pub fn video_exit_code(err: &VideoError) -> u8 {
    match err {
        VideoError::NotFound(_) => EXIT_NOT_FOUND,
        _ => EXIT_PARSE,
    }
}

pub fn fetch_exit_code(err: &FetchError) -> u8 {
    match err {
        FetchError::Client(_) => EXIT_ERROR,
        FetchError::Vimeo(_) => EXIT_FETCH_VIMEO,
        FetchError::Parse(_) | FetchError::NotJson => EXIT_FETCH_PARSE,
        _ => EXIT_FETCH_UPSTREAM,
    }
}
