//! Holtek HT16D35 command set and the pixel-to-frame serialization for both chips.
//!
//! The display is split across two chips: the left one drives buffer offsets
//! `0..PANEL_LEFT_PIXELS` and the right one the rest. Each chip receives its own
//! [`FRAME_BYTES`]-byte frame, laid out according to [`lut::FRAME_LUT`].

pub mod lut;

use core::ops::Range;

use crate::PIXEL_COUNT;
use crate::pixel_buffer::unpack;
use lut::{FRAME_LUT, PANEL_LEFT_PIXELS};

/// Size of one chip's display RAM: 28 rows of 8 bytes.
pub const FRAME_BYTES: usize = 28 * 8;

/// One chip's display RAM image, sent after [`WRITE_DISPLAY_HEADER`].
pub type PanelFrame = [u8; FRAME_BYTES];

/// Highest value accepted by the global brightness register.
pub const BRIGHTNESS_MAX: u8 = 63;

/// Global brightness programmed during initialization.
pub const INIT_BRIGHTNESS: u8 = 0x01;

/// Command byte plus start address that precedes a full frame write.
pub const WRITE_DISPLAY_HEADER: [u8; 2] = [Command::WriteDisplay as u8, 0x00];

/// HT16D35 command bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Reset all registers to their power-on defaults.
    SoftReset = 0xCC,
    /// Global brightness, followed by one byte in `0..=BRIGHTNESS_MAX`.
    GlobalBrightness = 0x37,
    /// COM pin drive enable, followed by one byte.
    ComPinControl = 0x41,
    /// ROW pin drive enable, followed by four bytes.
    RowPinControl = 0x42,
    /// Write display RAM, followed by a start address and data.
    WriteDisplay = 0x80,
    /// Read display RAM.
    ReadDisplay = 0x81,
    /// System control: `0x00` standby, `0x03` oscillator and display on.
    SystemControl = 0x35,
    /// Scroll control, followed by one byte.
    ScrollControl = 0x20,
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command as Self
    }
}

/// One of the two chips, each behind its own chip-select line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Panel {
    /// Chip for the left columns; refreshed first.
    Left,
    /// Chip for the right columns.
    Right,
}

impl Panel {
    /// Both panels in refresh order.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// First buffer offset driven by this panel.
    #[must_use]
    pub const fn pixel_offset(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => PANEL_LEFT_PIXELS,
        }
    }

    /// Number of pixels driven by this panel.
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        match self {
            Self::Left => PANEL_LEFT_PIXELS,
            Self::Right => PIXEL_COUNT - PANEL_LEFT_PIXELS,
        }
    }

    /// Buffer offsets driven by this panel.
    #[must_use]
    pub const fn pixels(self) -> Range<usize> {
        self.pixel_offset()..self.pixel_offset() + self.pixel_count()
    }
}

/// Serialize one panel's share of `pixels` into `frame`.
///
/// `frame` is zeroed first, so bytes with no LED behind them are always sent as zero.
pub fn render_panel(pixels: &[u32; PIXEL_COUNT], panel: Panel, frame: &mut PanelFrame) {
    frame.fill(0);
    let Some(panel_pixels) = pixels.get(panel.pixels()) else {
        return;
    };
    for (&pixel, offsets) in panel_pixels.iter().zip(FRAME_LUT.chunks_exact(3)) {
        let (red, green, blue) = unpack(pixel);
        if let &[red_at, green_at, blue_at] = offsets {
            frame[usize::from(red_at)] = red;
            frame[usize::from(green_at)] = green;
            frame[usize::from(blue_at)] = blue;
        }
    }
}
