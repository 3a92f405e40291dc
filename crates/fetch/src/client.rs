//! Blocking HTTP client for palettes and video metadata.

use std::thread;
use std::time::Duration;

use serde_json::Value;

use sitetools_engine::videos::OEmbed;
use sitetools_io::palette::parse_palette_json;

pub const VIMEO_BASE: &str = "https://vimeo.com";
pub const YOUTUBE_BASE: &str = "https://www.youtube.com";

const USER_AGENT: &str = concat!("sitetools/", env!("CARGO_PKG_VERSION"));

/// Error type for fetches.
#[derive(Debug)]
pub enum FetchError {
    /// HTTP client could not be built
    Client(String),
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// Body was not the JSON we expected
    Parse(String),
    /// Got an HTML page where JSON was expected
    NotJson,
    /// All Vimeo attempts failed; carries the last failure
    Vimeo(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Client(msg) => write!(f, "HTTP client error: {}", msg),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FetchError::NotJson => write!(f, "Got HTML instead of JSON"),
            FetchError::Vimeo(msg) => write!(f, "Failed to fetch video data from Vimeo: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub oembed_width: u32,
    pub vimeo_attempts: u32,
    pub vimeo_retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            oembed_width: 500,
            vimeo_attempts: 3,
            vimeo_retry_delay: Duration::from_secs(2),
        }
    }
}

pub struct FetchClient {
    http: reqwest::blocking::Client,
    options: FetchOptions,
    vimeo_base: String,
    youtube_base: String,
}

impl FetchClient {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        Self::with_bases(options, VIMEO_BASE.to_string(), YOUTUBE_BASE.to_string())
    }

    /// Client with overridden Vimeo/YouTube hosts (tests, proxies).
    pub fn with_bases(options: FetchOptions, vimeo_base: String, youtube_base: String) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            options,
            vimeo_base: vimeo_base.trim_end_matches('/').to_string(),
            youtube_base: youtube_base.trim_end_matches('/').to_string(),
        })
    }

    fn get_text(&self, request: reqwest::blocking::RequestBuilder) -> Result<String, FetchError> {
        let response = request.send().map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            return Err(FetchError::Http(status.as_u16(), reason));
        }
        response.text().map_err(|e| FetchError::Network(e.to_string()))
    }

    /// Fetch a site palette document. No retries.
    pub fn fetch_palette(&self, url: &str) -> Result<Value, FetchError> {
        let text = self.get_text(self.http.get(url).header("Cache-Control", "no-cache"))?;
        parse_palette_json(&text).map_err(|e| FetchError::Parse(e.to_string()))
    }

    fn try_vimeo(&self, url: &str) -> Result<OEmbed, FetchError> {
        let text = self.get_text(self.http.get(url))?;
        if text.starts_with('<') {
            return Err(FetchError::NotJson);
        }
        serde_json::from_str(&text).map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Vimeo oEmbed metadata, retried with a flat delay between attempts.
    pub fn vimeo_oembed(&self, vimeo_id: &str) -> Result<OEmbed, FetchError> {
        let id: String = url::form_urlencoded::byte_serialize(vimeo_id.as_bytes()).collect();
        let url = format!(
            "{}/api/oembed.json?url=https%3A%2F%2Fvimeo.com%2F{}&width={}",
            self.vimeo_base, id, self.options.oembed_width
        );

        let attempts = self.options.vimeo_attempts.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match self.try_vimeo(&url) {
                Ok(oembed) => return Ok(oembed),
                Err(e) => {
                    log::warn!("[Vimeo {}] attempt {}/{} failed: {}", vimeo_id, attempt, attempts, e);
                    last_error = e.to_string();
                    if attempt < attempts {
                        thread::sleep(self.options.vimeo_retry_delay);
                    }
                }
            }
        }

        Err(FetchError::Vimeo(last_error))
    }

    fn oembed_title(&self, endpoint: &str, video_url: &str) -> Result<String, FetchError> {
        let request = self.http.get(endpoint).query(&[("url", video_url), ("format", "json")]);
        let text = self.get_text(request)?;
        let data: Value = serde_json::from_str(&text).map_err(|e| FetchError::Parse(e.to_string()))?;
        data["title"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| FetchError::Parse("missing title".into()))
    }

    /// YouTube video title, or None if the lookup fails.
    pub fn youtube_title(&self, video_url: &str) -> Option<String> {
        let endpoint = format!("{}/oembed", self.youtube_base);
        match self.oembed_title(&endpoint, video_url) {
            Ok(title) => Some(title),
            Err(e) => {
                log::warn!("Failed to fetch YouTube title for {}: {}", video_url, e);
                None
            }
        }
    }

    /// PeerTube video title from the instance hosting the video, or None.
    pub fn peertube_title(&self, video_url: &str) -> Option<String> {
        let origin = match url::Url::parse(video_url) {
            Ok(parsed) => parsed.origin().ascii_serialization(),
            Err(e) => {
                log::warn!("Not a PeerTube URL {}: {}", video_url, e);
                return None;
            }
        };

        let endpoint = format!("{}/services/oembed", origin);
        match self.oembed_title(&endpoint, video_url) {
            Ok(title) => Some(title),
            Err(e) => {
                log::warn!("Failed to fetch PeerTube title for {}: {}", video_url, e);
                None
            }
        }
    }

    /// Look up both titles. Empty URLs are skipped.
    pub fn watch_titles(&self, youtube_url: &str, peertube_url: &str) -> (Option<String>, Option<String>) {
        let youtube = if youtube_url.is_empty() { None } else { self.youtube_title(youtube_url) };
        let peertube = if peertube_url.is_empty() { None } else { self.peertube_title(peertube_url) };
        (youtube, peertube)
    }
}
