//! A device abstraction for the dual HT16D35 display: the pixel buffer plus the bus that
//! refreshes it.
//!
//! See [`PanelDriver`] for the lifecycle and an example.

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::Rgb888,
    prelude::{OriginDimensions, Pixel, Size},
};
use embedded_hal::{digital::OutputPin, spi::SpiBus};
use heapless::Vec;
use smart_leds::RGB8;

use crate::ht16d35::{
    BRIGHTNESS_MAX, Command, FRAME_BYTES, INIT_BRIGHTNESS, Panel, PanelFrame, render_panel,
};
use crate::{Error, ImageSource, PanelBus, PixelBuffer, Result, Rotation};

/// Command byte plus the largest payload: a start address and a full frame.
const TX_CAPACITY: usize = FRAME_BYTES + 2;

/// System control payload: oscillator and display off.
const SYSTEM_STANDBY: u8 = 0x00;
/// System control payload: oscillator and display on.
const SYSTEM_ON: u8 = 0x03;

/// Drives both HT16D35 chips from one [`PixelBuffer`].
///
/// [`Self::new`] resets and configures both chips, leaving them on with a blank frame and
/// brightness `0x01`. Drawing calls only touch the in-memory buffer; [`Self::show`] sends it,
/// left panel first. [`Self::shutdown`] turns the outputs off and hands the bus back, after
/// which no further transfers are possible.
///
/// The driver owns the bus exclusively and is not meant to be shared between tasks.
///
/// # Example
///
/// ```rust,no_run
/// use embedded_hal::{digital::OutputPin, spi::SpiBus};
/// use unicorn_hat_mini::{PanelBus, PanelDriver, Rotation};
///
/// fn smile<SPI: SpiBus, CS0: OutputPin, CS1: OutputPin>(
///     bus: PanelBus<SPI, CS0, CS1>,
/// ) -> unicorn_hat_mini::Result<PanelBus<SPI, CS0, CS1>> {
///     let mut display = PanelDriver::new(bus)?;
///     display.set_rotation(Rotation::Deg180);
///     display.set_brightness(0.5)?;
///     display.set_pixel(4, 2, 255, 200, 0);
///     display.set_pixel(12, 2, 255, 200, 0);
///     display.show()?;
///     display.shutdown()
/// }
/// ```
pub struct PanelDriver<SPI, CS0, CS1> {
    bus: PanelBus<SPI, CS0, CS1>,
    tx: Vec<u8, TX_CAPACITY>,
    frame: PanelFrame,
    buffer: PixelBuffer,
}

impl<SPI, CS0, CS1> PanelDriver<SPI, CS0, CS1>
where
    SPI: SpiBus<u8>,
    CS0: OutputPin,
    CS1: OutputPin,
{
    /// Take ownership of the bus and initialize both chips, left then right.
    ///
    /// # Errors
    ///
    /// Returns the first bus or chip-select failure; the chips may then be partially
    /// configured.
    pub fn new(bus: PanelBus<SPI, CS0, CS1>) -> Result<Self> {
        let mut driver = Self {
            bus,
            tx: Vec::new(),
            frame: [0; FRAME_BYTES],
            buffer: PixelBuffer::new(),
        };
        for panel in Panel::ALL {
            driver.init_panel(panel)?;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("PanelDriver: both panels initialized");
        Ok(driver)
    }

    fn init_panel(&mut self, panel: Panel) -> Result<()> {
        self.xfer(panel, Command::SoftReset, &[])?;
        self.xfer(panel, Command::GlobalBrightness, &[&[INIT_BRIGHTNESS]])?;
        self.xfer(panel, Command::ScrollControl, &[&[0x00]])?;
        self.xfer(panel, Command::SystemControl, &[&[SYSTEM_STANDBY]])?;
        self.frame.fill(0);
        self.bus.write_display(panel, &self.frame)?;
        self.xfer(panel, Command::ComPinControl, &[&[0xFF]])?;
        self.xfer(panel, Command::RowPinControl, &[&[0xFF; 4]])?;
        self.xfer(panel, Command::SystemControl, &[&[SYSTEM_ON]])
    }

    /// Send `command` followed by the concatenated `data` chunks to one panel as a single
    /// chip-select window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransferTooLong`] if the payload does not fit the transmit buffer,
    /// otherwise any bus or chip-select failure.
    pub fn xfer(&mut self, panel: Panel, command: Command, data: &[&[u8]]) -> Result<()> {
        self.tx.clear();
        self.tx
            .push(command.into())
            .map_err(|_| Error::TransferTooLong)?;
        for chunk in data {
            self.tx
                .extend_from_slice(chunk)
                .map_err(|()| Error::TransferTooLong)?;
        }
        self.bus.transaction(panel, &[self.tx.as_slice()])
    }

    /// Send a ready-made frame to one panel without copying it into the transmit buffer.
    ///
    /// # Errors
    ///
    /// Returns any bus or chip-select failure.
    pub fn xfer_write_display(&mut self, panel: Panel, frame: &PanelFrame) -> Result<()> {
        self.bus.write_display(panel, frame)
    }

    /// Serialize the buffer and send it, left panel then right.
    ///
    /// # Errors
    ///
    /// Returns the first bus or chip-select failure. If the left transfer succeeded and the
    /// right one failed, the two halves show different frames until the next successful
    /// call.
    pub fn show(&mut self) -> Result<()> {
        #[cfg(feature = "defmt")]
        defmt::trace!("PanelDriver::show");
        for panel in Panel::ALL {
            render_panel(self.buffer.pixels(), panel, &mut self.frame);
            self.bus.write_display(panel, &self.frame)?;
        }
        Ok(())
    }

    /// Set global brightness on both panels from `level` in `0.0..=1.0`.
    ///
    /// `level` is clamped and rounded to the nearest register step, so `1.0` sends
    /// [`BRIGHTNESS_MAX`] and `0.0` sends zero. NaN counts as zero.
    ///
    /// # Errors
    ///
    /// Returns any bus or chip-select failure.
    pub fn set_brightness(&mut self, level: f32) -> Result<()> {
        self.set_brightness_raw(brightness_register(level))
    }

    /// Set the global brightness register on both panels, clamped to `0..=BRIGHTNESS_MAX`.
    ///
    /// # Errors
    ///
    /// Returns any bus or chip-select failure.
    pub fn set_brightness_raw(&mut self, value: u8) -> Result<()> {
        let value = value.min(BRIGHTNESS_MAX);
        #[cfg(feature = "defmt")]
        defmt::debug!("PanelDriver: brightness {}", value);
        for panel in Panel::ALL {
            self.xfer(panel, Command::GlobalBrightness, &[&[value]])?;
        }
        Ok(())
    }

    /// Select the rotation used by later drawing calls. Stored pixels are not moved.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        #[cfg(feature = "defmt")]
        defmt::debug!("PanelDriver: rotation {}", rotation);
        self.buffer.set_rotation(rotation);
    }

    /// [`Self::set_rotation`] from an angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRotation`] unless `degrees` is 0, 90, 180 or 270; the rotation
    /// is then unchanged.
    pub fn set_rotation_degrees(&mut self, degrees: u16) -> Result<()> {
        self.buffer.set_rotation_degrees(degrees)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("PanelDriver: rotation {}", self.buffer.rotation());
        Ok(())
    }

    /// Turn both panels' outputs off and return the bus.
    ///
    /// The buffer is dropped. The chips keep their display RAM but show nothing until they
    /// are initialized again.
    ///
    /// # Errors
    ///
    /// Returns the first bus or chip-select failure; the bus is lost with the driver.
    pub fn shutdown(mut self) -> Result<PanelBus<SPI, CS0, CS1>> {
        for panel in Panel::ALL {
            self.xfer(panel, Command::ComPinControl, &[&[0x00]])?;
            self.xfer(panel, Command::RowPinControl, &[&[0x00; 4]])?;
            self.xfer(panel, Command::SystemControl, &[&[SYSTEM_STANDBY]])?;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("PanelDriver: shut down");
        Ok(self.bus)
    }
}

impl<SPI, CS0, CS1> PanelDriver<SPI, CS0, CS1> {
    /// Set one pixel under the current rotation. Nothing is sent until [`Self::show`].
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside [`Self::shape`].
    pub fn set_pixel(&mut self, x: usize, y: usize, red: u8, green: u8, blue: u8) {
        self.buffer.set_pixel(x, y, red, green, blue);
    }

    /// [`Self::set_pixel`] taking an [`RGB8`] color.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside [`Self::shape`].
    pub fn set_pixel_color(&mut self, x: usize, y: usize, color: RGB8) {
        self.buffer.set_pixel_color(x, y, color);
    }

    /// Packed value stored for `(x, y)` under the current rotation.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside [`Self::shape`].
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buffer.pixel(x, y)
    }

    /// Fill the buffer with one color.
    pub fn set_all(&mut self, red: u8, green: u8, blue: u8) {
        self.buffer.set_all(red, green, blue);
    }

    /// [`Self::set_all`] taking an [`RGB8`] color.
    pub fn set_all_color(&mut self, color: RGB8) {
        self.buffer.set_all_color(color);
    }

    /// Blank the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// See [`PixelBuffer::set_image`].
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
        self.buffer
            .set_image(image, offset_x, offset_y, wrap, background);
    }

    /// The active rotation.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.buffer.rotation()
    }

    /// `(width, height)` under the current rotation.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.buffer.shape()
    }

    /// Alias of [`Self::shape`].
    #[must_use]
    pub const fn get_shape(&self) -> (usize, usize) {
        self.shape()
    }

    /// The pixels that the next [`Self::show`] will send.
    #[must_use]
    pub const fn pixel_buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Mutable access to the buffer, for drawing helpers that take a [`PixelBuffer`].
    pub const fn pixel_buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    /// Give the bus back without turning the panels off; they keep showing the last frame.
    pub fn release(self) -> PanelBus<SPI, CS0, CS1> {
        self.bus
    }
}

/// Brightness register value for `level`, rounding half up.
fn brightness_register(level: f32) -> u8 {
    let level = level.clamp(0.0, 1.0);
    // `as` saturates and maps NaN to 0.
    (level * f32::from(BRIGHTNESS_MAX) + 0.5) as u8
}

impl<SPI, CS0, CS1> OriginDimensions for PanelDriver<SPI, CS0, CS1> {
    fn size(&self) -> Size {
        self.buffer.size()
    }
}

impl<SPI, CS0, CS1> DrawTarget for PanelDriver<SPI, CS0, CS1> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.buffer.draw_iter(pixels)
    }
}
