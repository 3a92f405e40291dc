// sitetools images: staging area, blocks and shortcodes

use sitetools_engine::{BlockKind, ImageBlock, ImageEntry};
use sitetools_io::block_shortcode;

use crate::util::{print_json, read_stdin, Context};
use crate::{BlockKindArg, CliError, ImageCommands};

impl From<BlockKindArg> for BlockKind {
    fn from(kind: BlockKindArg) -> Self {
        match kind {
            BlockKindArg::Image => BlockKind::Image,
            BlockKindArg::Gallery => BlockKind::gallery(),
        }
    }
}

pub fn run(ctx: &Context, command: ImageCommands) -> Result<(), CliError> {
    let mut board = ctx.load_images();

    match command {
        ImageCommands::Load { urls } => {
            let text = if urls.is_empty() { read_stdin("image URLs")? } else { urls.join("\n") };
            let added = board.load_urls(&text)?;
            ctx.save_images(&board)?;
            println!("Staged {} image{}", added, if added == 1 { "" } else { "s" });
            Ok(())
        }
        ImageCommands::List { json } => {
            if json {
                return print_json(&board);
            }
            println!("Staging ({} of {} images)", board.staged().len(), board.total_images());
            for (i, entry) in board.staged().iter().enumerate() {
                print_entry(i, entry);
            }
            for block in board.blocks() {
                print_block(block);
            }
            Ok(())
        }
        ImageCommands::Remove { index } => {
            let removed = board.remove_thumbnail(index)?;
            ctx.save_images(&board)?;
            println!("Removed {}", removed.filename());
            Ok(())
        }
        ImageCommands::Block { kind, indices } => {
            let id = board.block_from_selection(kind.into(), &indices)?.id.clone();
            ctx.save_images(&board)?;
            println!("{}", id);
            Ok(())
        }
        ImageCommands::NewBlock { kind } => {
            let id = board.create_block(kind.into()).id.clone();
            ctx.save_images(&board)?;
            println!("{}", id);
            Ok(())
        }
        ImageCommands::DeleteBlock { id } => {
            let returned = board.delete_block(&id)?;
            ctx.save_images(&board)?;
            println!("Returned {} image{} to staging", returned, if returned == 1 { "" } else { "s" });
            Ok(())
        }
        ImageCommands::GalleryType { id, gallery_type } => {
            board.set_gallery_type(&id, gallery_type)?;
            ctx.save_images(&board)
        }
        ImageCommands::Move { index, block, at } => {
            board.move_to_block(index, &block, at)?;
            ctx.save_images(&board)
        }
        ImageCommands::Unstage { block, index } => {
            board.send_to_staging(&block, index)?;
            ctx.save_images(&board)
        }
        ImageCommands::Reorder { block, from, to } => {
            board.move_within_block(&block, from, to)?;
            ctx.save_images(&board)
        }
        ImageCommands::Edit { block, index, description, width, classes, caption, full_width } => {
            let entry = board.image_mut(&block, index)?;
            if let Some(description) = description {
                entry.description = description;
            }
            if let Some(width) = width {
                entry.width = width;
            }
            if let Some(classes) = classes {
                entry.classes = classes;
            }
            if let Some(caption) = caption {
                entry.show_caption = caption;
            }
            if let Some(full_width) = full_width {
                entry.is_full_width = full_width;
            }
            ctx.save_images(&board)
        }
        ImageCommands::Shortcode { block } => {
            let shortcodes: Vec<String> = match block {
                Some(id) => vec![block_shortcode(board.block(&id)?)],
                None => board.blocks().iter().map(block_shortcode).collect(),
            };
            let output: Vec<String> = shortcodes.into_iter().filter(|s| !s.is_empty()).collect();
            println!("{}", output.join("\n\n"));
            Ok(())
        }
        ImageCommands::Clear => {
            board.clear();
            ctx.save_images(&board)
        }
    }
}

fn print_entry(index: usize, entry: &ImageEntry) {
    let mut flags = Vec::new();
    if entry.show_caption {
        flags.push("caption");
    }
    if entry.is_full_width {
        flags.push("full-width");
    }
    println!("  {:>3}  {:<40} {}", index, entry.filename(), flags.join(" "));
}

fn print_block(block: &ImageBlock) {
    match block.kind {
        BlockKind::Image => println!("{} ({})", block.id, block.kind.label()),
        BlockKind::Gallery { gallery_type } => println!("{} ({}, {})", block.id, block.kind.label(), gallery_type),
    }
    for (i, entry) in block.images.iter().enumerate() {
        print_entry(i, entry);
    }
}
