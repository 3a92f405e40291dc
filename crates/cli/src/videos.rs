// sitetools video: spreadsheet rows to video shortcodes

use sitetools_engine::{TsvRow, VideoLibrary, VideoRecord};
use sitetools_fetch::FetchClient;
use sitetools_io::video_shortcode;

use crate::util::{print_json, read_stdin, Context};
use crate::{CliError, VideoCommands};

pub fn run(ctx: &Context, command: VideoCommands) -> Result<(), CliError> {
    let mut library = ctx.load_videos();

    match command {
        VideoCommands::Add { row } => {
            let text = match row {
                Some(row) => row,
                None => read_stdin("a TSV row")?,
            };
            // Validate before touching the network.
            let row = TsvRow::parse(&text)?;
            let client = ctx.fetch_client()?;
            let oembed = client.vimeo_oembed(&row.vimeo_id)?;

            let id = library.add(row, oembed).id.clone();
            ctx.save_videos(&library)?;
            lookup_titles(&client, &mut library, &id)?;
            ctx.save_videos(&library)?;

            print_video(library.get(&id)?);
            Ok(())
        }
        VideoCommands::List { json } => {
            if json {
                return print_json(library.videos());
            }
            for video in library.videos() {
                println!("{:<10} {:>8}  {}", video.id, video.duration_label(), video.display_title());
            }
            Ok(())
        }
        VideoCommands::Show { id } => {
            print_video(library.get(&id)?);
            Ok(())
        }
        VideoCommands::Titles { id } => {
            library.get(&id)?;
            let client = ctx.fetch_client()?;
            lookup_titles(&client, &mut library, &id)?;
            ctx.save_videos(&library)?;
            print_video(library.get(&id)?);
            Ok(())
        }
        VideoCommands::Shortcode { id } => {
            println!("{}", video_shortcode(library.get(&id)?));
            Ok(())
        }
        VideoCommands::Delete { id } => {
            library.delete(&id)?;
            ctx.save_videos(&library)
        }
        VideoCommands::Clear => {
            library.clear();
            ctx.save_videos(&library)
        }
    }
}

/// Fetch YouTube and PeerTube titles for a video and apply them, unless a
/// newer lookup superseded this one.
fn lookup_titles(client: &FetchClient, library: &mut VideoLibrary, id: &str) -> Result<(), CliError> {
    let video = library.get(id)?;
    if video.youtube_url.is_empty() && video.peertube_url.is_empty() {
        return Ok(());
    }
    let (youtube_url, peertube_url) = (video.youtube_url.clone(), video.peertube_url.clone());

    let ticket = library.begin_title_lookup(id)?;
    let (youtube, peertube) = client.watch_titles(&youtube_url, &peertube_url);
    if !library.apply_titles(&ticket, youtube, peertube) {
        log::info!("title lookup for {} was superseded", ticket.video_id());
    }
    Ok(())
}

fn match_label(matches: Option<bool>, title: Option<&str>) -> String {
    match (matches, title) {
        (Some(true), _) => "title matches".to_string(),
        (Some(false), Some(title)) => format!("title differs: {}", title),
        _ => "title not checked".to_string(),
    }
}

fn print_video(video: &VideoRecord) {
    println!("{} {}", video.id, video.display_title());
    println!(
        "  vimeo      {} ({}, {}x{})",
        video.vimeo_id,
        video.duration_label(),
        video.oembed.width,
        video.oembed.height
    );
    println!("  file       {}", video.video_file_url);
    println!("  thumbnail  {}", video.thumbnail_1440());
    if !video.youtube_url.is_empty() {
        println!(
            "  youtube    {} ({})",
            video.youtube_url,
            match_label(video.youtube_matches(), video.youtube_title.as_deref())
        );
    }
    if !video.peertube_url.is_empty() {
        println!(
            "  peertube   {} ({})",
            video.peertube_url,
            match_label(video.peertube_matches(), video.peertube_title.as_deref())
        );
    }
    println!();
    println!("{}", video_shortcode(video));
}
