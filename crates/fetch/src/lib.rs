//! Network fetches used by the authoring tools.
//!
//! Blocking reqwest client (no Tokio runtime required). Only the Vimeo
//! oEmbed lookup retries; title lookups give up quietly and return `None`.

mod client;

pub use client::{FetchClient, FetchError, FetchOptions, VIMEO_BASE, YOUTUBE_BASE};
