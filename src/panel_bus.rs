//! The shared SPI bus and the two chip-select lines, owned as one unit.

use embedded_hal::{
    digital::{OutputPin, PinState},
    spi::SpiBus,
};

use crate::ht16d35::{PanelFrame, Panel, WRITE_DISPLAY_HEADER};
use crate::{Error, Result};

/// Hardware handles for both chips: one SPI bus plus an active-low chip select per chip.
///
/// Hand this to [`PanelDriver::new`](crate::PanelDriver::new); it is returned by
/// [`PanelDriver::shutdown`](crate::PanelDriver::shutdown) and
/// [`PanelDriver::release`](crate::PanelDriver::release).
///
/// The bus must not be shared with other devices while the driver owns it: chip selects
/// are driven manually around each write.
#[derive(Debug)]
pub struct PanelBus<SPI, CS0, CS1> {
    /// SPI bus shared by both chips (MOSI and SCK only, nothing is read back).
    pub spi: SPI,
    /// Chip select for [`Panel::Left`].
    pub left_cs: CS0,
    /// Chip select for [`Panel::Right`].
    pub right_cs: CS1,
}

impl<SPI, CS0, CS1> PanelBus<SPI, CS0, CS1>
where
    SPI: SpiBus<u8>,
    CS0: OutputPin,
    CS1: OutputPin,
{
    /// Bundle the bus and chip selects. Both chip selects should already idle high.
    pub const fn new(spi: SPI, left_cs: CS0, right_cs: CS1) -> Self {
        Self {
            spi,
            left_cs,
            right_cs,
        }
    }

    /// Split back into the bus and chip selects.
    pub fn into_parts(self) -> (SPI, CS0, CS1) {
        (self.spi, self.left_cs, self.right_cs)
    }

    /// Select `panel`, write each chunk in order, flush, then deselect.
    ///
    /// The chip select is released even if a write fails; the write error wins over a
    /// release error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipSelect`] or [`Error::Spi`] from the underlying HAL.
    pub fn transaction(&mut self, panel: Panel, chunks: &[&[u8]]) -> Result<()> {
        self.chip_select(panel, PinState::Low)?;
        let written = chunks
            .iter()
            .try_for_each(|chunk| self.spi.write(chunk))
            .and_then(|()| self.spi.flush())
            .map_err(|error| Error::spi(&error));
        let released = self.chip_select(panel, PinState::High);
        written.and(released)
    }

    /// Send a whole frame to `panel` using the fixed write-display header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipSelect`] or [`Error::Spi`] from the underlying HAL.
    pub fn write_display(&mut self, panel: Panel, frame: &PanelFrame) -> Result<()> {
        self.transaction(panel, &[&WRITE_DISPLAY_HEADER, frame])
    }

    fn chip_select(&mut self, panel: Panel, state: PinState) -> Result<()> {
        match panel {
            Panel::Left => self
                .left_cs
                .set_state(state)
                .map_err(|error| Error::chip_select(&error)),
            Panel::Right => self
                .right_cs
                .set_state(state)
                .map_err(|error| Error::chip_select(&error)),
        }
    }
}
