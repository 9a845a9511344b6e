// Writes a 224x224 letterboxed thumbnail of a JPEG for every interpolation
// mode, as PNG files next to the working directory.
//
//   cargo run --release --example thumbnail -- input.jpg [side] [rgba|rgb|gray]

use image::ExtendedColorType;
use planefit::{ColorSpace, Interpolation, Plane, ThumbnailConfig, Thumbnailer};
use std::error::Error;

fn color_type(plane: &Plane) -> ExtendedColorType {
    match plane.channels {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        _ => ExtendedColorType::Rgba8,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let input = args.next().ok_or("usage: thumbnail <input.jpg> [side] [rgba|rgb|gray]")?;
    let side: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(224);
    let color = match args.next().as_deref() {
        None | Some("rgba") => ColorSpace::Rgba,
        Some("rgb") => ColorSpace::Rgb,
        Some("gray") => ColorSpace::Gray,
        Some(other) => return Err(format!("unknown layout '{other}'").into()),
    };

    let jpeg = std::fs::read(&input)?;
    for mode in Interpolation::ALL {
        let thumbnailer =
            Thumbnailer::with_config(ThumbnailConfig::default().with_interpolation(mode));
        let plane = match color {
            ColorSpace::Rgba => thumbnailer.jpeg_to_square_rgba(&jpeg, side)?,
            ColorSpace::Rgb => thumbnailer.jpeg_to_square_rgb(&jpeg, side)?,
            ColorSpace::Gray => thumbnailer.jpeg_to_square_gray(&jpeg, side)?,
        };

        let output = format!("thumbnail-{side}-{mode}.png");
        image::save_buffer(
            &output,
            &plane.data,
            plane.size.width,
            plane.size.height,
            color_type(&plane),
        )?;
        println!("{output}: {}x{} ({} bytes)", plane.size.width, plane.size.height, plane.data.len());
    }
    Ok(())
}
