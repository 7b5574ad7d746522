//! Driver for a 17×7 RGB LED matrix built from two Holtek HT16D35 chips on one SPI bus, as on
//! the Pimoroni Unicorn HAT Mini.
//!
//! # Glossary
//!
//! - **Panel:** one HT16D35 chip and the LEDs it drives. The left panel covers buffer offsets
//!   `0..63`, the right panel `63..119`. Each has its own chip select.
//! - **Frame:** the 224 bytes of display RAM written to one panel per refresh.
//! - **Rotation:** how caller `(x, y)` coordinates map onto the fixed physical layout.
//!
//! Start with [`PanelBus`] and [`PanelDriver`]. [`PixelBuffer`] is usable on its own for
//! composing frames off-device.
#![cfg_attr(not(any(test, feature = "host")), no_std)]

#[cfg(all(feature = "host", feature = "embedded"))]
compile_error!("Enable at most one of the 'host' and 'embedded' features");

mod error;
pub mod ht16d35;
mod panel_bus;
mod panel_driver;
pub mod pixel_buffer;
#[cfg(feature = "host")]
pub mod to_png;

/// Columns in the native orientation.
pub const COLS: usize = 17;
/// Rows in the native orientation.
pub const ROWS: usize = 7;
/// LEDs on the display.
pub const PIXEL_COUNT: usize = COLS * ROWS;

pub use crate::error::{Error, Result};
pub use crate::ht16d35::{Command, Panel};
pub use crate::panel_bus::PanelBus;
pub use crate::panel_driver::PanelDriver;
pub use crate::pixel_buffer::{ImageSource, PixelBuffer, Rotation};
pub use smart_leds::RGB8;
