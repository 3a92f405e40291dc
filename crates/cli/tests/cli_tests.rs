// End-to-end tests for the `sitetools` binary against a temporary store.
// Run with: cargo test -p sitetools-cli --test cli_tests
//
// Nothing here touches the network: palettes are loaded from files and video
// records are seeded straight into the store.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn store(&self) -> std::path::PathBuf {
        self.dir.path().join("store")
    }

    fn run(&self, args: &[&str]) -> Output {
        let config = self.dir.path().join("config");
        Command::new(env!("CARGO_BIN_EXE_sitetools"))
            .arg("--store")
            .arg(self.store())
            .args(args)
            .env("XDG_CONFIG_HOME", &config)
            .env("HOME", self.dir.path())
            .env_remove("SITETOOLS_STORE")
            .env_remove("RUST_LOG")
            .output()
            .expect("run sitetools")
    }

    /// Run and require success; returns trimmed stdout.
    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(output.status.success(), "sitetools {:?} failed: {:?}\nstderr: {}",
            args, output.status, String::from_utf8_lossy(&output.stderr));
        String::from_utf8_lossy(&output.stdout).trim_end().to_string()
    }

    /// Run and require the given exit code; returns stderr.
    fn fails(&self, args: &[&str], code: i32) -> String {
        let output = self.run(args);
        assert_eq!(output.status.code(), Some(code), "sitetools {:?}\nstdout: {}\nstderr: {}",
            args, String::from_utf8_lossy(&output.stdout), String::from_utf8_lossy(&output.stderr));
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    fn write(&self, name: &str, contents: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }
}

const PALETTE: &str = r##"{
    "css": {
        "Brand": {
            "accent": {"type": "color", "value": "#3366cc"},
            "dawn": {"type": "gradient", "value": "radial-gradient(#ff0000, #0000ff)"}
        }
    }
}"##;

// ---------------------------------------------------------------------------
// color
// ---------------------------------------------------------------------------

#[test]
fn color_show_converts() {
    let env = Env::new();
    let out = env.ok(&["color", "show", "#3366CC"]);
    assert!(out.contains("hex  #3366cc"), "{}", out);
    assert!(out.contains("rgb  rgb(51, 102, 204)"), "{}", out);
    assert!(out.contains("hsb  220, 75%, 80%"), "{}", out);

    let white = env.ok(&["color", "hsb", "0", "0", "100"]);
    assert!(white.starts_with("hex  #ffffff"), "{}", white);
}

#[test]
fn color_show_rejects_garbage() {
    let env = Env::new();
    let stderr = env.fails(&["color", "show", "nope"], 4);
    assert!(stderr.starts_with("error:"), "{}", stderr);
}

// ---------------------------------------------------------------------------
// pages
// ---------------------------------------------------------------------------

#[test]
fn blog_frontmatter_and_filename() {
    let env = Env::new();
    let id = env.ok(&["page", "new", "blog"]);
    env.ok(&["page", "set", &id, "title", "Hello"]);
    env.ok(&["page", "set", &id, "date", "2024-01-01"]);

    assert_eq!(env.ok(&["page", "frontmatter", &id]), "---\ntitle: \"Hello\"\ndate: \"2024-01-01\"\n---");
    assert_eq!(env.ok(&["page", "filename", &id]), "2024-01-01.md");

    // Persisted under the shared key
    assert!(env.store().join("frontmatterPages.json").exists());
}

#[test]
fn unreadable_page_does_not_wipe_the_store() {
    let env = Env::new();
    fs::create_dir_all(env.store()).unwrap();
    let pages = r##"[
        {"id": "artwork-1", "type": "artwork", "colorIndex": 1,
         "data": {"title": "Keep me", "customStyle": {"enabled": true, "type": "gradient",
                  "solidColor": "#cfcecc", "gradientStops": ["navy", "#ffffff"]}}},
        {"id": "blog-0", "type": "blog", "colorIndex": 0,
         "data": {"title": "Also keep", "date": "2024-01-01"}}
    ]"##;
    fs::write(env.store().join("frontmatterPages.json"), pages).unwrap();

    env.ok(&["page", "new", "blog"]);
    let list = env.ok(&["page", "list"]);
    assert!(list.contains("Also keep"), "{}", list);
    assert_eq!(list.lines().count(), 2, "{}", list);

    // The entry that could not be read is still on disk.
    let kept = fs::read_to_string(env.store().join("frontmatterPages.json.bad")).unwrap();
    assert!(kept.contains("Keep me"));
}

#[test]
fn page_field_rules() {
    let env = Env::new();
    let id = env.ok(&["page", "new", "blog"]);
    env.fails(&["page", "set", &id, "lightbox", "true"], 11);
    env.fails(&["page", "set", &id, "colour", "x"], 2);
    env.fails(&["page", "frontmatter", "12345"], 10);
}

#[test]
fn gradient_keeps_two_stops() {
    let env = Env::new();
    let id = env.ok(&["page", "new", "artwork"]);
    env.ok(&["page", "style", &id, "gradient"]);

    let stops = env.ok(&["page", "stop", &id, "remove", "0"]);
    assert_eq!(stops.lines().count(), 2, "{}", stops);

    let stderr = env.fails(&["page", "stop", &id, "remove", "0"], 11);
    assert!(stderr.contains("error:"), "{}", stderr);

    let stops = env.ok(&["page", "stop", &id, "add"]);
    assert_eq!(stops.lines().count(), 3, "{}", stops);
}

#[test]
fn hex_entry_goes_through_picker() {
    let env = Env::new();
    let id = env.ok(&["page", "new", "artwork"]);
    assert_eq!(env.ok(&["page", "color", &id, "solid", "FF8800"]), "#ff8800");
    env.fails(&["page", "color", &id, "solid", "#f80"], 2);

    assert_eq!(env.ok(&["page", "pick", &id, "solid", "--brightness", "0"]), "#000000");
    let fm = env.ok(&["page", "frontmatter", &id]);
    assert!(fm.contains("--main-bg-color:#000000;"), "{}", fm);
}

// ---------------------------------------------------------------------------
// palette, pins, drops
// ---------------------------------------------------------------------------

#[test]
fn palette_load_pin_and_drop() {
    let env = Env::new();
    let path = env.write("colors.json", PALETTE);

    let out = env.ok(&["palette", "load-file", &path]);
    assert!(out.starts_with("Loaded from file on "), "{}", out);
    assert!(out.contains("1 colors, 1 gradients"), "{}", out);

    let list = env.ok(&["palette", "list"]);
    assert!(list.contains("site-color-0-0"), "{}", list);
    assert!(list.contains("site-gradient-0-1"), "{}", list);

    assert_eq!(env.ok(&["palette", "pin", "site-color-0-0"]), "Pinned site-color-0-0");
    let pins = env.ok(&["pins", "list"]);
    assert!(pins.starts_with("Brand"), "{}", pins);
    assert!(pins.contains("accent"), "{}", pins);

    let id = env.ok(&["page", "new", "artwork"]);
    env.ok(&["page", "drop", &id, "preview", "site-gradient-0-1"]);
    let fm = env.ok(&["page", "frontmatter", &id]);
    assert!(fm.contains("--main-bg-gradient:radial-gradient(#ff0000, #0000ff);"), "{}", fm);
    assert!(fm.contains("--main-bg-color:#0000ff;"), "{}", fm);

    // A gradient cannot land on a single swatch
    env.fails(&["page", "drop", &id, "solid", "site-gradient-0-1"], 11);
}

#[test]
fn bad_palette_file_keeps_previous_palette() {
    let env = Env::new();
    let good = env.write("colors.json", PALETTE);
    let bad = env.write("broken.json", "{ not json");

    env.ok(&["palette", "load-file", &good]);
    let stderr = env.fails(&["palette", "load-file", &bad], 4);
    assert!(stderr.contains("hint:"), "{}", stderr);

    let list = env.ok(&["palette", "list"]);
    assert!(list.contains("accent"), "{}", list);
}

#[test]
fn saved_styles_survive_palette_writes() {
    let env = Env::new();
    let path = env.write("colors.json", PALETTE);
    let page = env.ok(&["page", "new", "notes"]);

    let style_id = env.ok(&["page", "save-style", &page, "Lilac"]);
    assert!(style_id.starts_with("saved-style-"), "{}", style_id);

    env.ok(&["palette", "load-file", &path]);
    env.ok(&["palette", "clear"]);
    let styles = env.ok(&["styles", "list"]);
    assert!(styles.contains("Lilac"), "{}", styles);

    env.ok(&["styles", "delete", &style_id]);
    assert_eq!(env.ok(&["styles", "list"]), "");
}

#[test]
fn packet_drop_pins_source() {
    let env = Env::new();
    let path = env.write("colors.json", PALETTE);
    env.ok(&["palette", "load-file", &path]);

    let packet = env.ok(&["palette", "packet", "site-color-0-0"]);
    assert!(packet.contains("\"source_id\":\"site-color-0-0\""), "{}", packet);

    assert_eq!(env.ok(&["pins", "drop", &packet]), "Pinned site-color-0-0");
    // Already pinned
    env.fails(&["pins", "drop", &packet], 11);

    env.ok(&["pins", "clear"]);
    assert_eq!(env.ok(&["pins", "list"]), "No pinned colors");
}

// ---------------------------------------------------------------------------
// images
// ---------------------------------------------------------------------------

#[test]
fn gallery_shortcode_flow() {
    let env = Env::new();
    env.ok(&["images", "load", "https://cdn.test/a.jpg", "https://cdn.test/b.jpg", "https://cdn.test/c.jpg"]);

    assert_eq!(env.ok(&["images", "block", "gallery", "0", "1"]), "block-0");
    env.ok(&["images", "gallery-type", "block-0", "vertical"]);
    env.ok(&["images", "edit", "block-0", "1", "--description", "Shore", "--caption", "true"]);

    assert_eq!(
        env.ok(&["images", "shortcode", "block-0"]),
        "{% photoGrid \"vertical\" %}\n\
         {% photoGridItem \"https://cdn.test/a.jpg\", \"\", false, true %}\n\
         {% photoGridItem \"https://cdn.test/b.jpg\", \"Shore\", true, true %}\n\
         {% endphotoGrid %}"
    );

    assert_eq!(env.ok(&["images", "block", "image", "0"]), "block-1");
    assert_eq!(
        env.ok(&["images", "shortcode", "block-1"]),
        "{% image \"https://cdn.test/c.jpg\", \"\", \"1440\" %}"
    );

    // An image block holds one image
    env.ok(&["images", "load", "https://cdn.test/d.jpg"]);
    env.fails(&["images", "move", "0", "block-1"], 11);

    assert_eq!(env.ok(&["images", "delete-block", "block-0"]), "Returned 2 images to staging");
    env.fails(&["images", "gallery-type", "block-0", "tarot"], 10);
}

// ---------------------------------------------------------------------------
// videos
// ---------------------------------------------------------------------------

#[test]
fn video_rows_are_validated_before_fetching() {
    let env = Env::new();
    let stderr = env.fails(&["video", "add", "Tide\t2024"], 4);
    assert!(stderr.contains("Expected at least 11 columns. Got 2"), "{}", stderr);

    let stderr = env.fails(&["video", "add", "   "], 4);
    assert!(stderr.contains("Please paste TSV data first"), "{}", stderr);

    let row = ["Tide", "", "", "", "", "https://cdn.test/tide.mp4", "", "", "", "", "x"].join("\t");
    let stderr = env.fails(&["video", "add", &row], 4);
    assert!(stderr.contains("Vimeo ID (column 5)"), "{}", stderr);
}

#[test]
fn seeded_video_shortcode() {
    let env = Env::new();
    fs::create_dir_all(env.store()).unwrap();
    fs::write(
        Path::new(&env.store()).join("videoShortcodeGeneratorState.json"),
        r#"{
            "videos": [{
                "id": "video-0",
                "title": "Tide",
                "vimeoId": "76979871",
                "videoFileUrl": "https://cdn.test/tide-720.mp4",
                "youtubeUrl": "https://youtu.be/abc",
                "youtubeTitle": "Tide",
                "peertubeUrl": "",
                "oEmbed": {
                    "title": "Tide",
                    "thumbnail_url": "https://i.vimeocdn.com/video/452001751-8216e05-d_295x166",
                    "duration": 754,
                    "width": 500,
                    "height": 281
                }
            }],
            "videoIdCounter": 1
        }"#,
    )
    .unwrap();

    assert_eq!(
        env.ok(&["video", "shortcode", "video-0"]),
        r#"{% video "76979871", "https://cdn.test/tide-720.mp4", '{"Youtube":"https://youtu.be/abc"}' %}"#
    );

    let list = env.ok(&["video", "list"]);
    assert!(list.contains("12:34"), "{}", list);

    let show = env.ok(&["video", "show", "video-0"]);
    assert!(show.contains("https://i.vimeocdn.com/video/452001751-8216e05-d_1440.jpg"), "{}", show);
    assert!(show.contains("title matches"), "{}", show);

    env.ok(&["video", "delete", "video-0"]);
    env.fails(&["video", "shortcode", "video-0"], 10);
}
