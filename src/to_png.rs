#![cfg(feature = "host")]
//! Host-side PNG previews of a [`PixelBuffer`], drawn as the display would look in its
//! current rotation.

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use png::{BitDepth, ColorType, Encoder, ScaledFloat};

use crate::PixelBuffer;
use crate::pixel_buffer::unpack;

const PREVIEW_INVERSE_GAMMA: f32 = 2.2;

/// An 8-bit RGB raster ready for encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    /// Width in image pixels.
    pub width: u32,
    /// Height in image pixels.
    pub height: u32,
    /// Row-major RGB triples.
    pub data: Vec<u8>,
}

/// Write `buffer` as a PNG no larger than `max_dimension` on either side.
///
/// Each LED is drawn as a soft disc on a black background. Parent directories are created
/// as needed.
///
/// # Errors
///
/// Returns I/O and encoder errors.
pub fn write_buffer_png(
    buffer: &PixelBuffer,
    output_path: impl AsRef<Path>,
    max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_path.as_ref();
    let preview = render_preview(buffer, max_dimension);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut encoder = Encoder::new(
        BufWriter::new(File::create(output_path)?),
        preview.width,
        preview.height,
    );
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&preview.data)?;
    writer.finish()?;
    Ok(())
}

/// Rasterize `buffer` without encoding it.
///
/// # Panics
///
/// Panics if `max_dimension` is too small to give each LED at least a 4-pixel cell.
#[must_use]
pub fn render_preview(buffer: &PixelBuffer, max_dimension: u32) -> Preview {
    let (columns, rows) = buffer.shape();
    let (columns, rows) = (columns as u32, rows as u32);
    let cell = max_dimension / columns.max(rows);
    assert!(cell >= 4, "max_dimension leaves less than 4 pixels per LED");

    let width = columns * cell;
    let height = rows * cell;
    let mut data = vec![0; (width * height * 3) as usize];
    let radius = cell as f32 * 0.4;
    let center = (cell as f32 - 1.0) / 2.0;

    for y in 0..rows {
        for x in 0..columns {
            let (red, green, blue) = unpack(buffer.pixel(x as usize, y as usize));
            let color = [red, green, blue].map(|channel| preview_level(widen(channel)));
            for local_y in 0..cell {
                for local_x in 0..cell {
                    let distance = (local_x as f32 - center).hypot(local_y as f32 - center);
                    let intensity = (radius + 0.5 - distance).clamp(0.0, 1.0);
                    if intensity == 0.0 {
                        continue;
                    }
                    let index = (((y * cell + local_y) * width + x * cell + local_x) * 3) as usize;
                    for (slot, level) in data[index..index + 3].iter_mut().zip(color) {
                        *slot = (level * intensity * 255.0).round() as u8;
                    }
                }
            }
        }
    }

    Preview {
        width,
        height,
        data,
    }
}

/// Stretch a 6-bit channel back to the full 8-bit range.
const fn widen(channel: u8) -> u8 {
    (channel << 2) | (channel >> 4)
}

/// Brightness a viewer perceives for a PWM duty of `channel / 255`.
fn preview_level(channel: u8) -> f32 {
    (f32::from(channel) / 255.0).powf(1.0 / PREVIEW_INVERSE_GAMMA)
}
