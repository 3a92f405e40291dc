// Fetch client against a local mock server.
// Run with: cargo test -p sitetools-fetch --test oembed

use std::time::Duration;

use httpmock::prelude::*;
use sitetools_fetch::{FetchClient, FetchError, FetchOptions};

fn client(server: &MockServer) -> FetchClient {
    let options = FetchOptions {
        timeout: Duration::from_secs(5),
        vimeo_retry_delay: Duration::from_millis(10),
        ..FetchOptions::default()
    };
    FetchClient::with_bases(options, server.base_url(), server.base_url()).unwrap()
}

#[test]
fn vimeo_oembed_parses_metadata() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/oembed.json")
            .query_param("url", "https://vimeo.com/76979871")
            .query_param("width", "500");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "type": "video",
                "title": "Tide",
                "thumbnail_url": "https://i.vimeocdn.com/video/452001751-8216e0571c251a09d8af3f4d6ea2b2c3-d_295x166",
                "duration": 754,
                "width": 500,
                "height": 281
            }));
    });

    let oembed = client(&server).vimeo_oembed("76979871").unwrap();
    mock.assert();
    assert_eq!(oembed.title, "Tide");
    assert_eq!(oembed.duration, 754);
    assert_eq!(oembed.height, 281);
}

#[test]
fn vimeo_html_response_exhausts_attempts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/oembed.json");
        then.status(200)
            .header("content-type", "text/html")
            .body("<!DOCTYPE html><html>rate limited</html>");
    });

    let err = client(&server).vimeo_oembed("1").unwrap_err();
    mock.assert_calls(3);
    assert!(matches!(err, FetchError::Vimeo(_)));
    assert_eq!(err.to_string(), "Failed to fetch video data from Vimeo: Got HTML instead of JSON");
}

#[test]
fn vimeo_server_error_is_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/oembed.json");
        then.status(503);
    });

    let err = client(&server).vimeo_oembed("1").unwrap_err();
    mock.assert_calls(3);
    assert!(err.to_string().contains("HTTP 503"), "error: {}", err);
}

#[test]
fn youtube_title_lookup() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/oembed")
            .query_param("url", "https://youtu.be/abc")
            .query_param("format", "json");
        then.status(200).json_body(serde_json::json!({ "title": "Tide" }));
    });

    assert_eq!(client(&server).youtube_title("https://youtu.be/abc"), Some("Tide".to_string()));
    mock.assert();
}

#[test]
fn youtube_failure_returns_none() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/oembed");
        then.status(404);
    });

    assert_eq!(client(&server).youtube_title("https://youtu.be/gone"), None);
}

#[test]
fn peertube_title_uses_video_origin() {
    let server = MockServer::start();
    let video_url = format!("{}/w/9c9de5e8", server.base_url());
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/services/oembed")
            .query_param("url", video_url.as_str())
            .query_param("format", "json");
        then.status(200).json_body(serde_json::json!({ "title": "Tide (PeerTube)" }));
    });

    let (youtube, peertube) = client(&server).watch_titles("", &video_url);
    mock.assert();
    assert_eq!(youtube, None);
    assert_eq!(peertube, Some("Tide (PeerTube)".to_string()));
}

#[test]
fn fetch_palette_document() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/colors.json");
        then.status(200).body(r##"{"css": {"Brand": {"accent": {"type": "color", "value": "#3366cc"}}}}"##);
    });
    server.mock(|when, then| {
        when.method(GET).path("/missing.json");
        then.status(404);
    });

    let c = client(&server);
    let doc = c.fetch_palette(&format!("{}/colors.json", server.base_url())).unwrap();
    assert_eq!(doc["css"]["Brand"]["accent"]["value"], "#3366cc");

    let err = c.fetch_palette(&format!("{}/missing.json", server.base_url())).unwrap_err();
    assert!(matches!(err, FetchError::Http(404, _)));
}
