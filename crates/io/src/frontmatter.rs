// Frontmatter and filename generation for pages

use std::sync::OnceLock;

use regex::Regex;

use sitetools_core::{CustomStyle, StyleKind};
use sitetools_engine::pages::{Page, PageType, DEFAULT_NOTECARD_TEXT};

/// Double-quote a YAML scalar. Empty strings become `''`.
pub fn quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Render the YAML frontmatter block for a page, `---` delimited.
///
/// Fields are emitted only when set. Which fields appear, and whether they
/// are quoted, depends on the page type.
pub fn generate_frontmatter(page: &Page) -> String {
    let data = &page.data;
    let mut lines = vec!["---".to_string()];

    match page.page_type {
        PageType::Blog => {
            if !data.title.is_empty() {
                lines.push(format!("title: {}", quote(&data.title)));
            }
            if !data.thumbnail.is_empty() {
                lines.push(format!("thumbnail: {}", quote(&data.thumbnail)));
            }
            if !data.thumbnail_alt.is_empty() {
                lines.push(format!("thumbnailAlt: {}", quote(&data.thumbnail_alt)));
            }
            if let Some(date) = data.date.as_deref().filter(|d| !d.is_empty()) {
                lines.push(format!("date: {}", quote(date)));
            }
        }
        PageType::Artwork => {
            if !data.title.is_empty() {
                lines.push(format!("title: {}", quote(&data.title)));
            }
            if !data.project_tags.is_empty() {
                let tags: Vec<String> = data.project_tags.iter().map(|t| format!("\"{}\"", t)).collect();
                lines.push(format!("projectTags: [{}]", tags.join(", ")));
            }
            if let Some(year) = data.project_year.as_deref().filter(|y| !y.is_empty()) {
                lines.push(format!("projectYear: {}", quote(year)));
            }
            if !data.description.is_empty() {
                lines.push(format!("description: {}", data.description));
            }
            if data.lightbox {
                lines.push("lightbox: true".to_string());
            }
            if data.dark {
                lines.push("dark: true".to_string());
            }

            if let Some(style) = data.active_style() {
                if style.kind == StyleKind::Image {
                    if !style.bg_image.is_empty() {
                        lines.push(format!("bgImage: {}", style.bg_image));
                        if style.bg_image_opacity < 1.0 {
                            lines.push(format!("bgImageOpacity: {}", style.bg_image_opacity));
                        }
                    }
                } else if let Some(yaml) = custom_style_yaml(style) {
                    lines.push(yaml);
                }
            }

            if !data.thumbnail.is_empty() {
                lines.push(format!("thumbnail: {}", data.thumbnail));
            }
            if !data.thumbnail_alt.is_empty() {
                lines.push(format!("thumbnailAlt: {}", data.thumbnail_alt));
            }
        }
        PageType::Notes => {
            if !data.title.is_empty() {
                lines.push(format!("title: {}", data.title));
            }
            if !data.description.is_empty() {
                lines.push(format!("description: {}", data.description));
            }

            if let Some(style) = data.active_style() {
                let text_color = data.notecard_text_color.unwrap_or(DEFAULT_NOTECARD_TEXT);
                lines.push(notecard_style_yaml(style, data.notecard_dark, &text_color.to_hex()));
                if let Some(yaml) = custom_style_yaml(style) {
                    lines.push(yaml);
                }
            }

            if data.lightbox {
                lines.push("lightbox: true".to_string());
            }
            if data.dark {
                lines.push("dark: true".to_string());
            }
            if !data.thumbnail.is_empty() {
                lines.push(format!("thumbnail: {}", quote(&data.thumbnail)));
            }
            if data.notecard_dark {
                lines.push("notecardDark: true".to_string());
            }
        }
    }

    lines.push("---".to_string());
    lines.join("\n")
}

/// `customStyle: >` block scalar setting the page background variables.
/// Image styles have no block.
pub fn custom_style_yaml(style: &CustomStyle) -> Option<String> {
    let (color, gradient) = match style.kind {
        StyleKind::Solid => (style.solid_color.to_hex(), "none".to_string()),
        StyleKind::Gradient => (style.gradient_stops.last().to_hex(), style.gradient_stops.to_css()),
        StyleKind::Image => return None,
    };
    Some(format!(
        "customStyle: >\n  :root {{\n    --main-bg-color:{};\n    --main-bg-gradient:{};\n  }}",
        color, gradient
    ))
}

/// Inline CSS for the notes card, single-quoted.
pub fn notecard_style_yaml(style: &CustomStyle, notecard_dark: bool, text_color: &str) -> String {
    let mut css = match style.kind {
        StyleKind::Solid => format!("background-color:{};", style.solid_color),
        StyleKind::Gradient => format!("background-image:{};", style.gradient_stops.to_css()),
        StyleKind::Image if !style.bg_image.is_empty() => format!("background-image:url({});", style.bg_image),
        StyleKind::Image => String::new(),
    };
    if notecard_dark {
        css.push_str(&format!("color:{};", text_color));
    }
    format!("notecardStyle: '{}'", css)
}

fn slug_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Lowercase, drop punctuation, collapse whitespace runs to `-`.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = slug_strip_re().replace_all(&lower, "");
    whitespace_re().replace_all(&stripped, "-").into_owned()
}

/// Suggested filename for a page.
pub fn generate_filename(page: &Page) -> String {
    match page.page_type {
        PageType::Blog => match page.data.date.as_deref().filter(|d| !d.is_empty()) {
            Some(date) => format!("{}.md", date),
            None => "untitled.md".to_string(),
        },
        PageType::Artwork | PageType::Notes => {
            let title = if page.data.title.is_empty() { "untitled" } else { &page.data.title };
            format!("{}.md", slugify(title))
        }
    }
}
