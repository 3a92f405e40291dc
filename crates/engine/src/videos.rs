//! Video records imported from a spreadsheet row plus Vimeo metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

use sitetools_core::lenient::lenient_vec;

/// Minimum tab-separated columns in an import row.
pub const MIN_COLUMNS: usize = 11;

const COL_TITLE: usize = 0;
const COL_VIMEO_ID: usize = 4;
const COL_FILE_URL: usize = 5;
const COL_YOUTUBE: usize = 7;
const COL_PEERTUBE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    EmptyInput,
    TooFewColumns(usize),
    MissingVimeoId,
    MissingFileUrl,
    NotFound(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::EmptyInput => write!(f, "Please paste TSV data first"),
            VideoError::TooFewColumns(n) => {
                write!(f, "Invalid TSV format. Expected at least {} columns. Got {}", MIN_COLUMNS, n)
            }
            VideoError::MissingVimeoId => write!(f, "Missing required field: Vimeo ID (column 5)"),
            VideoError::MissingFileUrl => write!(f, "Missing required field: 720p video file URL (column 6)"),
            VideoError::NotFound(id) => write!(f, "video not found: {}", id),
        }
    }
}

impl std::error::Error for VideoError {}

/// The columns we use from one pasted spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TsvRow {
    pub title: String,
    pub vimeo_id: String,
    pub video_file_url: String,
    pub youtube_url: String,
    pub peertube_url: String,
}

impl TsvRow {
    pub fn parse(input: &str) -> Result<Self, VideoError> {
        // Only line endings: empty leading and trailing columns are significant.
        let input = input.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            return Err(VideoError::EmptyInput);
        }

        let columns: Vec<&str> = input.split('\t').map(str::trim).collect();
        if columns.len() < MIN_COLUMNS {
            return Err(VideoError::TooFewColumns(columns.len()));
        }

        let row = Self {
            title: columns[COL_TITLE].to_string(),
            vimeo_id: columns[COL_VIMEO_ID].to_string(),
            video_file_url: columns[COL_FILE_URL].to_string(),
            youtube_url: columns[COL_YOUTUBE].to_string(),
            peertube_url: columns[COL_PEERTUBE].to_string(),
        };
        if row.vimeo_id.is_empty() {
            return Err(VideoError::MissingVimeoId);
        }
        if row.video_file_url.is_empty() {
            return Err(VideoError::MissingFileUrl);
        }
        Ok(row)
    }
}

/// Subset of the Vimeo oEmbed response we keep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OEmbed {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub vimeo_id: String,
    pub video_file_url: String,
    #[serde(default)]
    pub youtube_url: String,
    #[serde(default)]
    pub youtube_title: Option<String>,
    #[serde(default)]
    pub peertube_url: String,
    #[serde(default)]
    pub peertube_title: Option<String>,
    #[serde(rename = "oEmbed", default)]
    pub oembed: OEmbed,
    /// Title lookup generation. Not persisted, so stale results are only
    /// caught within one process.
    #[serde(skip)]
    lookup_generation: u64,
}

impl VideoRecord {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled Video"
        } else {
            &self.title
        }
    }

    /// Vimeo thumbnail resized to 1440px wide.
    pub fn thumbnail_1440(&self) -> String {
        let base = self.oembed.thumbnail_url.split("-d_").next().unwrap_or_default();
        format!("{}-d_1440.jpg", base)
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.oembed.duration)
    }

    /// Whether the YouTube title matches the Vimeo title. None until looked up.
    pub fn youtube_matches(&self) -> Option<bool> {
        self.youtube_title.as_ref().map(|t| *t == self.oembed.title)
    }

    pub fn peertube_matches(&self) -> Option<bool> {
        self.peertube_title.as_ref().map(|t| *t == self.oembed.title)
    }
}

/// `m:ss` up to an hour, `h:mm:ss` beyond, with no leading zero.
pub fn format_duration(seconds: u64) -> String {
    let s = seconds % 60;
    let label = if seconds > 3600 {
        format!("{:02}:{:02}:{:02}", seconds / 3600, (seconds / 60) % 60, s)
    } else {
        format!("{:02}:{:02}", seconds / 60, s)
    };
    match label.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => label,
    }
}

/// Handle for an in-flight title lookup. Results are only applied if no
/// newer lookup for the same video started since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    video_id: String,
    generation: u64,
}

impl LookupTicket {
    pub fn video_id(&self) -> &str {
        &self.video_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoLibrary {
    #[serde(default, deserialize_with = "lenient_vec")]
    videos: Vec<VideoRecord>,
    #[serde(default)]
    video_id_counter: u64,
}

impl VideoLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    pub fn get(&self, id: &str) -> Result<&VideoRecord, VideoError> {
        self.videos
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| VideoError::NotFound(id.to_string()))
    }

    /// Add a video at the top of the list.
    pub fn add(&mut self, row: TsvRow, oembed: OEmbed) -> &VideoRecord {
        let id = format!("video-{}", self.video_id_counter);
        self.video_id_counter += 1;

        let record = VideoRecord {
            id,
            title: row.title,
            vimeo_id: row.vimeo_id,
            video_file_url: row.video_file_url,
            youtube_url: row.youtube_url,
            youtube_title: None,
            peertube_url: row.peertube_url,
            peertube_title: None,
            oembed,
            lookup_generation: 0,
        };
        self.videos.insert(0, record);
        &self.videos[0]
    }

    pub fn delete(&mut self, id: &str) -> Result<VideoRecord, VideoError> {
        let index = self
            .videos
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| VideoError::NotFound(id.to_string()))?;
        Ok(self.videos.remove(index))
    }

    pub fn clear(&mut self) {
        self.videos.clear();
        self.video_id_counter = 0;
    }

    /// Start a title lookup for a video, superseding any earlier one.
    pub fn begin_title_lookup(&mut self, id: &str) -> Result<LookupTicket, VideoError> {
        let video = self
            .videos
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| VideoError::NotFound(id.to_string()))?;
        video.lookup_generation += 1;
        Ok(LookupTicket { video_id: id.to_string(), generation: video.lookup_generation })
    }

    /// Apply lookup results. Stale tickets and deleted videos are ignored.
    pub fn apply_titles(
        &mut self,
        ticket: &LookupTicket,
        youtube_title: Option<String>,
        peertube_title: Option<String>,
    ) -> bool {
        let Some(video) = self.videos.iter_mut().find(|v| v.id == ticket.video_id) else {
            log::debug!("dropping title lookup for removed video {}", ticket.video_id);
            return false;
        };
        if video.lookup_generation != ticket.generation {
            log::debug!("dropping stale title lookup for {}", ticket.video_id);
            return false;
        }
        video.youtube_title = youtube_title;
        video.peertube_title = peertube_title;
        true
    }
}
