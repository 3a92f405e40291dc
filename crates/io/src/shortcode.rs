// Eleventy shortcodes for image blocks and videos

use serde::Serialize;

use sitetools_engine::images::{BlockKind, GalleryType, ImageBlock, DEFAULT_WIDTH};
use sitetools_engine::videos::VideoRecord;

/// Shortcode for a block. Empty blocks produce an empty string.
pub fn block_shortcode(block: &ImageBlock) -> String {
    let Some(first) = block.images.first() else {
        return String::new();
    };

    match block.kind {
        BlockKind::Image => {
            let width = if first.width.is_empty() { DEFAULT_WIDTH } else { &first.width };
            if first.classes.is_empty() {
                format!("{{% image \"{}\", \"{}\", \"{}\" %}}", first.url, first.description, width)
            } else {
                format!(
                    "{{% image \"{}\", \"{}\", \"{}\", \"{}\" %}}",
                    first.url, first.description, width, first.classes
                )
            }
        }
        BlockKind::Gallery { gallery_type } => {
            let mut out = format!("{{% photoGrid \"{}\" %}}\n", gallery_type);
            for image in &block.images {
                // Vertical galleries always render full width.
                let full_width = image.is_full_width || gallery_type == GalleryType::Vertical;
                out.push_str(&format!(
                    "{{% photoGridItem \"{}\", \"{}\", {}, {} %}}\n",
                    image.url, image.description, image.show_caption, full_width
                ));
            }
            out.push_str("{% endphotoGrid %}");
            out
        }
    }
}

#[derive(Serialize)]
struct WatchLinks<'a> {
    #[serde(rename = "Youtube", skip_serializing_if = "Option::is_none")]
    youtube: Option<&'a str>,
    #[serde(rename = "Peertube", skip_serializing_if = "Option::is_none")]
    peertube: Option<&'a str>,
}

/// `{% video "id", "url" %}` with an optional single-quoted JSON object of
/// watch links.
pub fn video_shortcode(video: &VideoRecord) -> String {
    let links = WatchLinks {
        youtube: Some(video.youtube_url.as_str()).filter(|u| !u.is_empty()),
        peertube: Some(video.peertube_url.as_str()).filter(|u| !u.is_empty()),
    };

    let mut out = format!("{{% video \"{}\", \"{}\"", video.vimeo_id, video.video_file_url);
    if links.youtube.is_some() || links.peertube.is_some() {
        match serde_json::to_string(&links) {
            Ok(json) => out.push_str(&format!(", '{}'", json)),
            Err(e) => log::warn!("could not encode watch links for {}: {}", video.id, e),
        }
    }
    out.push_str(" %}");
    out
}
