// Shared helpers for CLI commands

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use sitetools_config::storage::{IMAGES_KEY, PAGES_KEY, VIDEOS_KEY};
use sitetools_config::{Settings, Store};
use sitetools_engine::{ImageBoard, Page, PageStore, VideoLibrary};
use sitetools_fetch::{FetchClient, FetchOptions};

use crate::CliError;

/// Settings plus the store every command reads and writes.
pub struct Context {
    pub settings: Settings,
    pub store: Store,
}

impl Context {
    pub fn new(store_override: Option<PathBuf>) -> Self {
        let settings = Settings::load();
        let store = match store_override {
            Some(root) => Store::at(root),
            None => settings.store(),
        };
        log::debug!("using store at {}", store.root().display());
        Self { settings, store }
    }

    pub fn fetch_client(&self) -> Result<FetchClient, CliError> {
        let options = FetchOptions {
            timeout: Duration::from_secs(self.settings.http_timeout_secs),
            oembed_width: self.settings.oembed_width,
            vimeo_attempts: self.settings.vimeo_attempts,
            vimeo_retry_delay: Duration::from_millis(self.settings.vimeo_retry_delay_ms),
        };
        Ok(FetchClient::new(options)?)
    }

    pub fn load_pages(&self) -> PageStore {
        PageStore::from_pages(self.store.load_list::<Page>(PAGES_KEY))
    }

    pub fn save_pages(&self, pages: &PageStore) -> Result<(), CliError> {
        Ok(self.store.set(PAGES_KEY, pages.pages())?)
    }

    pub fn load_images(&self) -> ImageBoard {
        self.store.load_or_default(IMAGES_KEY)
    }

    pub fn save_images(&self, board: &ImageBoard) -> Result<(), CliError> {
        Ok(self.store.set(IMAGES_KEY, board)?)
    }

    pub fn load_videos(&self) -> VideoLibrary {
        self.store.load_or_default(VIDEOS_KEY)
    }

    pub fn save_videos(&self, library: &VideoLibrary) -> Result<(), CliError> {
        Ok(self.store.set(VIDEOS_KEY, library)?)
    }
}

/// Read all of stdin. Refuses to block on an interactive terminal.
pub fn read_stdin(what: &str) -> Result<String, CliError> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::args(format!("no {} given", what))
            .with_hint(format!("pass {} as an argument or pipe it on stdin", what)));
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(|e| CliError::args(format!("failed to read stdin: {}", e)))?;
    Ok(text)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::parse(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Current time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
