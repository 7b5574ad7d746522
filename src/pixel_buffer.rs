//! In-memory pixel store for the 17×7 display, addressed through the active [`Rotation`].
//!
//! Colors are quantized to 6 bits per channel as they are written, which is the resolution
//! of the HT16D35 PWM registers. See [`PixelBuffer`] for the storage format.

pub mod rotation;

pub use rotation::Rotation;

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    image::{GetPixel, ImageRaw},
    pixelcolor::{PixelColor, Rgb888, RgbColor, raw::ByteOrder},
    prelude::{OriginDimensions, Pixel, Point, Size},
};
use smart_leds::RGB8;

use crate::{PIXEL_COUNT, Result};

/// Largest value a quantized channel can hold.
pub const CHANNEL_MAX: u8 = 0x3F;

/// Reduce an 8-bit channel to the 6-bit range `0..=63` by dropping the two low bits.
#[must_use]
pub const fn quantize(channel: u8) -> u8 {
    channel >> 2
}

/// Quantize and pack a color as `(r6 << 16) | (g6 << 8) | b6`.
///
/// ```rust
/// use unicorn_hat_mini::pixel_buffer::pack;
///
/// assert_eq!(pack(255, 255, 255), 0x003F_3F3F);
/// assert_eq!(pack(4, 8, 3), 0x0001_0200);
/// ```
#[must_use]
pub const fn pack(red: u8, green: u8, blue: u8) -> u32 {
    ((quantize(red) as u32) << 16) | ((quantize(green) as u32) << 8) | quantize(blue) as u32
}

/// Split a packed pixel into its `(red, green, blue)` 6-bit lanes.
#[must_use]
pub const fn unpack(pixel: u32) -> (u8, u8, u8) {
    (
        (pixel >> 16) as u8 & CHANNEL_MAX,
        (pixel >> 8) as u8 & CHANNEL_MAX,
        pixel as u8 & CHANNEL_MAX,
    )
}

/// A readable source image for [`PixelBuffer::set_image`].
///
/// Implemented for embedded-graphics [`ImageRaw`] images (for example
/// `ImageRaw<Rgb888>`) and for row-major `[[RGB8; W]; H]` arrays.
pub trait ImageSource {
    /// Image `(width, height)` in pixels.
    fn dimensions(&self) -> (usize, usize);

    /// Color at `(x, y)`; callers only ask for coordinates inside [`Self::dimensions`].
    fn rgb_at(&self, x: usize, y: usize) -> RGB8;
}

impl<C, BO> ImageSource for ImageRaw<'_, C, BO>
where
    C: PixelColor + From<<C as PixelColor>::Raw> + Into<Rgb888>,
    BO: ByteOrder,
    Self: GetPixel<Color = C>,
{
    fn dimensions(&self) -> (usize, usize) {
        let size = OriginDimensions::size(self);
        (size.width as usize, size.height as usize)
    }

    fn rgb_at(&self, x: usize, y: usize) -> RGB8 {
        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            return RGB8::default();
        };
        self.pixel(Point::new(x, y))
            .map_or_else(RGB8::default, |color| rgb888_to_rgb8(color.into()))
    }
}

impl<const W: usize, const H: usize> ImageSource for [[RGB8; W]; H] {
    fn dimensions(&self) -> (usize, usize) {
        (W, H)
    }

    fn rgb_at(&self, x: usize, y: usize) -> RGB8 {
        self.get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or_default()
    }
}

fn rgb888_to_rgb8(color: Rgb888) -> RGB8 {
    RGB8::new(color.r(), color.g(), color.b())
}

/// Packed colors for every LED, plus the rotation used to address them.
///
/// Storage is one `u32` per LED in native column-major order (see [`Rotation::offset`]),
/// each holding `(r6 << 16) | (g6 << 8) | b6`. Only the low six bits of each byte lane are
/// ever set.
///
/// Coordinates passed to [`Self::set_pixel`] are checked against the rotated shape and
/// panic when out of range. The [`DrawTarget`] implementation clips instead, so
/// embedded-graphics shapes may extend past the edges.
///
/// Changing the rotation does not move pixels that are already stored: they keep their
/// physical position and only later writes use the new orientation.
///
/// # Example
///
/// ```rust
/// use unicorn_hat_mini::{PixelBuffer, Rotation};
///
/// let mut buffer = PixelBuffer::new();
/// buffer.set_pixel(0, 0, 255, 0, 0);
/// assert_eq!(buffer.pixel(0, 0), 63 << 16);
///
/// buffer.set_rotation(Rotation::Deg90);
/// assert_eq!(buffer.shape(), (7, 17));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: [u32; PIXEL_COUNT],
    rotation: Rotation,
}

impl PixelBuffer {
    /// A black buffer in the native orientation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pixels: [0; PIXEL_COUNT],
            rotation: Rotation::Deg0,
        }
    }

    /// The rotation used to address pixels.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Switch the address function. Stored pixels are left where they are.
    pub const fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// [`Self::set_rotation`] from an angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRotation`](crate::Error::InvalidRotation) unless `degrees` is
    /// 0, 90, 180 or 270; the rotation is then unchanged.
    pub fn set_rotation_degrees(&mut self, degrees: u16) -> Result<()> {
        self.rotation = Rotation::from_degrees(degrees)?;
        Ok(())
    }

    /// `(width, height)` as seen by callers under the current rotation.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.rotation.shape()
    }

    /// Set one pixel, quantizing each channel to 6 bits.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside [`Self::shape`].
    pub fn set_pixel(&mut self, x: usize, y: usize, red: u8, green: u8, blue: u8) {
        let offset = self.checked_offset(x, y);
        self.pixels[offset] = pack(red, green, blue);
    }

    /// [`Self::set_pixel`] taking an [`RGB8`] color.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside [`Self::shape`].
    pub fn set_pixel_color(&mut self, x: usize, y: usize, color: RGB8) {
        self.set_pixel(x, y, color.r, color.g, color.b);
    }

    /// Packed value stored for `(x, y)` under the current rotation.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside [`Self::shape`].
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[self.checked_offset(x, y)]
    }

    /// Set every pixel to one color.
    pub fn set_all(&mut self, red: u8, green: u8, blue: u8) {
        self.pixels.fill(pack(red, green, blue));
    }

    /// [`Self::set_all`] taking an [`RGB8`] color.
    pub fn set_all_color(&mut self, color: RGB8) {
        self.set_all(color.r, color.g, color.b);
    }

    /// Set every pixel to black.
    pub fn clear(&mut self) {
        self.set_all(0, 0, 0);
    }

    /// Packed pixels in storage order.
    #[must_use]
    pub const fn pixels(&self) -> &[u32; PIXEL_COUNT] {
        &self.pixels
    }

    /// Copy an image onto the display, starting at `(offset_x, offset_y)` in the image.
    ///
    /// Every display pixel `(x, y)` reads image pixel `(x + offset_x, y + offset_y)`. With
    /// `wrap`, coordinates past the right or bottom edge wrap around the image; negative
    /// coordinates never wrap. Display pixels with no image pixel behind them are set to
    /// `background`.
    ///
    /// ```rust
    /// use embedded_graphics::{image::ImageRaw, pixelcolor::Rgb888};
    /// use smart_leds::RGB8;
    /// use unicorn_hat_mini::PixelBuffer;
    ///
    /// // 2×1 image: red then blue.
    /// let data = [255, 0, 0, 0, 0, 255];
    /// let image = ImageRaw::<Rgb888>::new(&data, 2);
    ///
    /// let mut buffer = PixelBuffer::new();
    /// buffer.set_image(&image, 0, 0, true, RGB8::default());
    /// assert_eq!(buffer.pixel(0, 0), 63 << 16);
    /// assert_eq!(buffer.pixel(1, 0), 63);
    /// assert_eq!(buffer.pixel(2, 0), 63 << 16); // wrapped
    /// assert_eq!(buffer.pixel(0, 1), 63 << 16);
    /// ```
    pub fn set_image<I>(
        &mut self,
        image: &I,
        offset_x: i32,
        offset_y: i32,
        wrap: bool,
        background: RGB8,
    ) where
        I: ImageSource + ?Sized,
    {
        let (image_width, image_height) = image.dimensions();
        let (width, height) = self.shape();
        for y in 0..height {
            for x in 0..width {
                let source_x = source_coordinate(x, offset_x, image_width, wrap);
                let source_y = source_coordinate(y, offset_y, image_height, wrap);
                let color = match (source_x, source_y) {
                    (Some(source_x), Some(source_y)) => image.rgb_at(source_x, source_y),
                    _ => background,
                };
                self.set_pixel_color(x, y, color);
            }
        }
    }

    fn checked_offset(&self, x: usize, y: usize) -> usize {
        assert!(
            self.rotation.contains(x, y),
            "pixel coordinate must be within the rotated display shape"
        );
        self.rotation.offset(x, y)
    }
}

/// Image coordinate for display coordinate `display`, or `None` when it falls outside.
fn source_coordinate(display: usize, offset: i32, extent: usize, wrap: bool) -> Option<usize> {
    let display = i64::try_from(display).ok()?;
    let source = usize::try_from(display + i64::from(offset)).ok()?;
    if extent == 0 {
        return None;
    }
    if wrap {
        Some(source % extent)
    } else {
        (source < extent).then_some(source)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        let (width, height) = self.shape();
        Size::new(width as u32, height as u32)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(coord.x), usize::try_from(coord.y)) else {
                continue;
            };
            if self.rotation.contains(x, y) {
                self.set_pixel(x, y, color.r(), color.g(), color.b());
            }
        }
        Ok(())
    }
}
