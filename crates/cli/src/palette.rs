// sitetools palette / pins / styles

use std::fs;

use serde_json::{json, Value};

use sitetools_config::{DataSource, PaletteState, PinnedSidebar, SidebarItem};
use sitetools_core::{Color, TransferPacket};
use sitetools_io::{parse_palette_json, ItemId, PaletteCatalog, TempGradient};

use crate::exit_codes::{EXIT_NOT_FOUND, EXIT_REJECTED};
use crate::util::{now_ms, print_json, Context};
use crate::{CliError, PaletteCommands, PinCommands, StyleCommands};

pub fn run_palette(ctx: &Context, command: PaletteCommands) -> Result<(), CliError> {
    let mut state = PaletteState::load(&ctx.store);

    match command {
        PaletteCommands::LoadUrl { url } => {
            let url = url.unwrap_or_else(|| ctx.settings.palette_url.clone());
            load_url(ctx, &mut state, &url)
        }
        PaletteCommands::LoadFile { path } => {
            let text = fs::read_to_string(&path)
                .map_err(|e| CliError::args(format!("cannot read {}: {}", path.display(), e)))?;
            let data = parse_palette_json(&text)
                .map_err(|e| CliError::from(e).with_hint("the stored palette was left unchanged"))?;
            state.set_loaded(data, DataSource::File, now_ms());
            state.save(&ctx.store)?;
            print_summary(&state);
            Ok(())
        }
        PaletteCommands::Refresh => {
            if state.data_source == Some(DataSource::Url) {
                let url = state.refresh_url().unwrap_or(&ctx.settings.palette_url).to_string();
                return load_url(ctx, &mut state, &url);
            }
            if !state.refresh_file(now_ms()) {
                return Err(CliError::with_code(EXIT_NOT_FOUND, "no palette loaded")
                    .with_hint("run `sitetools palette load-url` or `sitetools palette load-file <PATH>`"));
            }
            state.save(&ctx.store)?;
            print_summary(&state);
            Ok(())
        }
        PaletteCommands::Status => {
            println!("{}", state.status_line());
            Ok(())
        }
        PaletteCommands::List { json } => list(&state, json),
        PaletteCommands::Gradient { key, json } => {
            let catalog = state.catalog();
            let gradient = catalog
                .find_gradient(&key)
                .ok_or_else(|| CliError::with_code(EXIT_NOT_FOUND, format!("gradient not found: {}", key)))?;
            let detail = gradient.detail();
            if json {
                return print_json(&detail);
            }
            println!("{} ({})", detail.name, detail.group);
            println!("id     {}", detail.id);
            println!("css    {}", detail.css);
            for (i, stop) in detail.stops.iter().enumerate() {
                println!("stop {} {}", i, stop);
            }
            Ok(())
        }
        PaletteCommands::AddGradient { name, stops } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CliError::args("a gradient needs a name"));
            }
            let stops = stops
                .iter()
                .map(|s| Color::parse(s).map(|c| c.to_hex()))
                .collect::<Result<Vec<String>, _>>()
                .map_err(|e| CliError::parse(e.to_string()))?;
            let id = state.add_temp_gradient(TempGradient { name, stops });
            state.save(&ctx.store)?;
            println!("{}", id);
            Ok(())
        }
        PaletteCommands::Pin { id } => {
            let id = parse_item_id(&id)?;
            let catalog = state.catalog();
            if catalog.color(&id).is_none() && catalog.gradient(&id).is_none() {
                return Err(CliError::with_code(EXIT_NOT_FOUND, format!("no palette item {}", id)));
            }
            let pinned = state.toggle_pin(id);
            state.save_sidebar(&ctx.store)?;
            println!("{} {}", if pinned { "Pinned" } else { "Unpinned" }, id);
            Ok(())
        }
        PaletteCommands::Packet { id } => {
            let packet = resolve_payload(&state, &id)?;
            println!("{}", packet.to_json());
            Ok(())
        }
        PaletteCommands::Clear => {
            state.clear_all();
            state.save(&ctx.store)?;
            println!("{}", state.status_line());
            Ok(())
        }
    }
}

pub fn run_pins(ctx: &Context, command: PinCommands) -> Result<(), CliError> {
    let mut state = PaletteState::load(&ctx.store);

    match command {
        PinCommands::List { json } => {
            let sidebar = PinnedSidebar::build(&state);
            if json {
                return print_json(&sidebar_json(&sidebar));
            }
            if sidebar.is_empty() {
                println!("No pinned colors");
                return Ok(());
            }
            for group in &sidebar.groups {
                println!("{}", group.title);
                for item in &group.items {
                    match item {
                        SidebarItem::Color(c) => println!("  {:<22} {:<16} {}", c.id.to_string(), c.name, c.value),
                        SidebarItem::Gradient(g) => println!("  {:<22} {:<16} {}", g.id.to_string(), g.name, g.css),
                    }
                }
            }
            if !sidebar.saved_styles.is_empty() {
                println!("Saved styles");
                for style in &sidebar.saved_styles {
                    println!("  {:<22} {:<16} {}", style.id, style.name, style.preview_css());
                }
            }
            Ok(())
        }
        PinCommands::Unpin { id } => {
            let id = parse_item_id(&id)?;
            if !state.unpin(&id) {
                return Err(CliError::with_code(EXIT_NOT_FOUND, format!("{} is not pinned", id)));
            }
            state.save_sidebar(&ctx.store)?;
            println!("Unpinned {}", id);
            Ok(())
        }
        PinCommands::Drop { packet } => {
            let packet = TransferPacket::from_json(&packet).map_err(|e| CliError::parse(e.to_string()))?;
            let id = state.pin_packet(&packet).ok_or_else(|| {
                CliError::with_code(EXIT_REJECTED, "nothing to pin")
                    .with_hint("only palette colors and gradients that are not already pinned can be dropped here")
            })?;
            state.save_sidebar(&ctx.store)?;
            println!("Pinned {}", id);
            Ok(())
        }
        PinCommands::Clear => {
            state.clear_pins();
            state.save_sidebar(&ctx.store)?;
            Ok(())
        }
    }
}

pub fn run_styles(ctx: &Context, command: StyleCommands) -> Result<(), CliError> {
    let mut state = PaletteState::load(&ctx.store);

    match command {
        StyleCommands::List { json } => {
            if json {
                return print_json(&state.saved_styles);
            }
            for style in &state.saved_styles {
                println!("{:<22} {:<16} {:<9} {}", style.id, style.name, style.kind().to_string(), style.preview_css());
            }
            Ok(())
        }
        StyleCommands::Delete { id } => {
            if !state.delete_saved_style(&id) {
                return Err(CliError::with_code(EXIT_NOT_FOUND, format!("saved style not found: {}", id)));
            }
            state.save_sidebar(&ctx.store)?;
            Ok(())
        }
        StyleCommands::Packet { id } => {
            let packet = resolve_payload(&state, &id)?;
            println!("{}", packet.to_json());
            Ok(())
        }
    }
}

fn load_url(ctx: &Context, state: &mut PaletteState, url: &str) -> Result<(), CliError> {
    let data = ctx
        .fetch_client()?
        .fetch_palette(url)
        .map_err(|e| CliError::from(e).with_hint("the stored palette was left unchanged"))?;
    state.set_loaded_url(data, url, now_ms());
    state.save(&ctx.store)?;
    print_summary(state);
    Ok(())
}

fn print_summary(state: &PaletteState) {
    let catalog = state.catalog();
    println!("{}", state.status_line());
    println!("{} colors, {} gradients", catalog.colors.len(), catalog.gradients.len());
}

fn parse_item_id(text: &str) -> Result<ItemId, CliError> {
    text.parse::<ItemId>()
        .map_err(|e| CliError::args(e).with_hint("ids look like site-color-0-3 or temp-gradient-1"))
}

/// A drag payload from packet JSON, a palette item id or a saved style id.
pub fn resolve_payload(state: &PaletteState, text: &str) -> Result<TransferPacket, CliError> {
    let text = text.trim();
    if text.starts_with('{') {
        return TransferPacket::from_json(text).map_err(|e| CliError::parse(e.to_string()));
    }

    if let Some(style) = state.saved_styles.iter().find(|s| s.id == text) {
        return Ok(TransferPacket::SavedStyle { style: style.clone() });
    }

    let id = parse_item_id(text)?;
    let catalog = state.catalog();
    let packet = match (catalog.color(&id), catalog.gradient(&id)) {
        (Some(color), _) => color.packet(),
        (None, Some(gradient)) => gradient.packet(),
        (None, None) => return Err(CliError::with_code(EXIT_NOT_FOUND, format!("no palette item {}", id))),
    };
    packet.ok_or_else(|| CliError::with_code(EXIT_REJECTED, format!("{} is not made of plain colors", id)))
}

fn catalog_json(state: &PaletteState, catalog: &PaletteCatalog) -> Value {
    let colors: Vec<Value> = catalog
        .colors
        .iter()
        .map(|c| {
            json!({
                "id": c.id.to_string(),
                "name": c.name,
                "value": c.value,
                "group": c.group_title,
                "pinned": state.is_pinned(&c.id),
            })
        })
        .collect();
    let gradients: Vec<Value> = catalog
        .gradients
        .iter()
        .map(|g| {
            json!({
                "id": g.id.to_string(),
                "name": g.name,
                "css": g.css,
                "stops": g.stops,
                "group": g.group_title,
                "pinned": state.is_pinned(&g.id),
            })
        })
        .collect();
    json!({ "colors": colors, "gradients": gradients })
}

fn list(state: &PaletteState, as_json: bool) -> Result<(), CliError> {
    let catalog = state.catalog();
    if as_json {
        return print_json(&catalog_json(state, &catalog));
    }
    if catalog.colors.is_empty() && catalog.gradients.is_empty() {
        println!("{}", state.status_line());
        return Ok(());
    }

    let mark = |id: &ItemId| if state.is_pinned(id) { '*' } else { ' ' };
    let mut group = None;
    for c in &catalog.colors {
        if group != Some(&c.group_title) {
            println!("{}", c.group_title);
            group = Some(&c.group_title);
        }
        println!("{} {:<22} {:<16} {}", mark(&c.id), c.id.to_string(), c.name, c.value);
    }
    group = None;
    for g in &catalog.gradients {
        if group != Some(&g.group_title) {
            println!("{} (gradients)", g.group_title);
            group = Some(&g.group_title);
        }
        println!("{} {:<22} {:<16} {}", mark(&g.id), g.id.to_string(), g.name, g.css);
    }
    Ok(())
}

fn sidebar_json(sidebar: &PinnedSidebar) -> Value {
    let groups: Vec<Value> = sidebar
        .groups
        .iter()
        .map(|group| {
            let items: Vec<Value> = group
                .items
                .iter()
                .map(|item| match item {
                    SidebarItem::Color(c) => json!({
                        "id": c.id.to_string(),
                        "name": c.name,
                        "value": c.value,
                    }),
                    SidebarItem::Gradient(g) => json!({
                        "id": g.id.to_string(),
                        "name": g.name,
                        "css": g.css,
                    }),
                })
                .collect();
            json!({ "title": group.title, "items": items })
        })
        .collect();
    json!({ "groups": groups, "savedStyles": sidebar.saved_styles })
}
