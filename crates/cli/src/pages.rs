// sitetools page: frontmatter pages and their custom styles

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;

use sitetools_config::PaletteState;
use sitetools_core::{Color, DropPlacement, StyleKind};
use sitetools_engine::pages::ColorFieldRef;
use sitetools_engine::{
    ColorField, DropTarget, Page, PageField, PageStore, PickerEvent, PickerLayout, PickerManager,
};
use sitetools_io::{generate_filename, generate_frontmatter};

use crate::palette::resolve_payload;
use crate::util::{print_json, Context};
use crate::{CliError, PageCommands, StopAction, StyleAction};

pub fn run(ctx: &Context, command: PageCommands) -> Result<(), CliError> {
    let mut pages = ctx.load_pages();

    match command {
        PageCommands::New { page_type } => {
            let id = pages.create(page_type, Utc::now()).id.clone();
            ctx.save_pages(&pages)?;
            println!("{}", id);
            Ok(())
        }
        PageCommands::List { json } => {
            if json {
                return print_json(pages.pages());
            }
            for page in pages.pages() {
                let title = if page.data.title.is_empty() { "(untitled)" } else { page.data.title.as_str() };
                println!("{:<14} {:<8} {:<32} {}", page.id, page.page_type.to_string(), title, generate_filename(page));
            }
            Ok(())
        }
        PageCommands::Show { id } => {
            let page = pages.get(&id)?;
            println!("{} page {} ({})", page.page_type.label(), page.id, page.border_color());
            if let Some(style) = page.data.active_style() {
                println!("style: {}", style.kind);
                println!("  solid     {}", style.solid_color);
                println!("  gradient  {}", style.gradient_stops.to_css());
            }
            println!();
            println!("{}", generate_frontmatter(page));
            println!();
            println!("filename: {}", generate_filename(page));
            Ok(())
        }
        PageCommands::Set { id, field, value } => {
            let field: PageField = field.parse().map_err(CliError::args)?;
            let value = field.parse_value(&value)?;
            pages.set_field(&id, field, value)?;
            ctx.save_pages(&pages)
        }
        PageCommands::Tag { id, tag } => {
            if !pages.add_tag(&id, &tag)? {
                log::info!("tag '{}' not added to {}", tag.trim(), id);
            }
            ctx.save_pages(&pages)?;
            println!("{}", pages.get(&id)?.data.project_tags.join(", "));
            Ok(())
        }
        PageCommands::Untag { id, index } => {
            let removed = pages.remove_tag(&id, index)?;
            ctx.save_pages(&pages)?;
            println!("Removed {}", removed);
            Ok(())
        }
        PageCommands::Style { id, action } => {
            match action {
                StyleAction::Enable => pages.enable_style(&id)?,
                StyleAction::Disable => pages.disable_style(&id)?,
                StyleAction::Solid => pages.set_style_kind(&id, StyleKind::Solid)?,
                StyleAction::Gradient => pages.set_style_kind(&id, StyleKind::Gradient)?,
                StyleAction::Image => pages.set_style_kind(&id, StyleKind::Image)?,
            }
            ctx.save_pages(&pages)
        }
        PageCommands::Stop { id, action } => {
            match action {
                StopAction::Add => {
                    pages.add_stop(&id)?;
                }
                StopAction::Remove { index } => {
                    pages.remove_stop(&id, index)?;
                }
                StopAction::Move { dragged, target, below } => {
                    let placement = if below { DropPlacement::Below } else { DropPlacement::Above };
                    pages.drop_stop(&id, dragged, target, placement)?;
                }
            }
            ctx.save_pages(&pages)?;
            print_stops(pages.get(&id)?);
            Ok(())
        }
        PageCommands::Color { id, field, hex } => {
            let field: ColorField = field.parse().map_err(CliError::args)?;
            let color = pick(&pages, &id, field, |picker| picker.submit_hex(&hex))?.ok_or_else(|| {
                CliError::args(format!("not a six-digit hex color: {}", hex)).with_hint("use #rrggbb, e.g. #3366cc")
            })?;
            pages.set_color(&id, field, color)?;
            ctx.save_pages(&pages)?;
            println!("{}", color);
            Ok(())
        }
        PageCommands::Pick { id, field, hue, saturation, brightness } => {
            if hue.is_none() && saturation.is_none() && brightness.is_none() {
                return Err(CliError::args("nothing to pick").with_hint("pass --hue, --saturation or --brightness"));
            }
            let field: ColorField = field.parse().map_err(CliError::args)?;
            let color = pick(&pages, &id, field, |picker| {
                let mut committed = None;
                if let Some(hue) = hue {
                    committed = picker.set_hue(hue);
                }
                if saturation.is_some() || brightness.is_some() {
                    let current = picker.session().map(|s| s.hsb()).unwrap_or_default();
                    committed = picker.set_sat_bright(
                        saturation.unwrap_or(current.s),
                        brightness.unwrap_or(current.b),
                    );
                }
                committed
            })?
            .ok_or_else(|| CliError::args("picker did not commit a color"))?;
            pages.set_color(&id, field, color)?;
            ctx.save_pages(&pages)?;
            println!("{}", color);
            Ok(())
        }
        PageCommands::Drop { id, target, payload } => {
            let target = match target.as_str() {
                "preview" => DropTarget::StylePreview,
                other => DropTarget::Color(other.parse().map_err(CliError::args)?),
            };
            let packet = resolve_payload(&PaletteState::load(&ctx.store), &payload)?;
            pages.apply_drop(&id, target, &packet)?;
            ctx.save_pages(&pages)
        }
        PageCommands::SaveStyle { id, name } => {
            let style = pages.save_style(&id, &name, Utc::now())?;
            let mut state = PaletteState::load(&ctx.store);
            println!("{}", style.id);
            state.add_saved_style(style);
            state.save_sidebar(&ctx.store)?;
            Ok(())
        }
        PageCommands::Delete { id } => {
            pages.delete(&id)?;
            ctx.save_pages(&pages)
        }
        PageCommands::Clear => {
            pages.clear();
            ctx.save_pages(&pages)
        }
        PageCommands::Frontmatter { id } => {
            println!("{}", generate_frontmatter(pages.get(&id)?));
            Ok(())
        }
        PageCommands::Filename { id } => {
            println!("{}", generate_filename(pages.get(&id)?));
            Ok(())
        }
    }
}

/// Open a picker on a page color field, drive it, and return what it
/// committed last.
fn pick<F>(pages: &PageStore, id: &str, field: ColorField, drive: F) -> Result<Option<Color>, CliError>
where
    F: FnOnce(&mut PickerManager<ColorFieldRef>) -> Option<Color>,
{
    let current = pages.color(id, field)?;
    let committed: Rc<RefCell<Option<Color>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&committed);

    let mut picker = PickerManager::with_listener(Box::new(|event: PickerEvent<ColorFieldRef>| {
        log::debug!("picker: {:?}", event);
    }));
    let field_ref = ColorFieldRef { page_id: id.to_string(), field };
    picker.activate(
        field_ref,
        current,
        PickerLayout::default(),
        Box::new(move |color: Color| *sink.borrow_mut() = Some(color)),
    );

    let returned = drive(&mut picker);
    picker.close();

    let last = committed.borrow_mut().take();
    Ok(last.or(returned))
}

fn print_stops(page: &Page) {
    if let Some(style) = page.data.active_style() {
        for (i, stop) in style.gradient_stops.iter().enumerate() {
            println!("stop-{} {}", i, stop);
        }
    }
}
