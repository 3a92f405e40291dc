// sitetools color: conversions

use serde_json::json;

use sitetools_core::{Color, Hsb};

use crate::util::print_json;
use crate::{CliError, ColorCommands};

pub fn run(command: ColorCommands) -> Result<(), CliError> {
    match command {
        ColorCommands::Show { color, json } => {
            let color = Color::parse(&color).map_err(|e| CliError::parse(e.to_string()))?;
            show(color, json)
        }
        ColorCommands::Hsb { hue, saturation, brightness } => {
            show(Color::from_hsb(Hsb::new(hue, saturation, brightness).clamped()), false)
        }
    }
}

fn show(color: Color, json: bool) -> Result<(), CliError> {
    let rgb = color.rgb();
    let hsb = color.hsb();
    if json {
        return print_json(&json!({
            "hex": color.to_hex(),
            "rgb": [rgb.r, rgb.g, rgb.b],
            "hsb": [hsb.h.round(), hsb.s.round(), hsb.b.round()],
        }));
    }

    println!("hex  {}", color.to_hex());
    println!("rgb  rgb({}, {}, {})", rgb.r, rgb.g, rgb.b);
    println!("hsb  {:.0}, {:.0}%, {:.0}%", hsb.h, hsb.s, hsb.b);
    Ok(())
}
