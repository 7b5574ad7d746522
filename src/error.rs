use derive_more::{Display, Error};
use embedded_hal::{digital, spi};

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by the pixel buffer and the panel driver.
///
/// Bus and pin failures are reported by their embedded-hal [`ErrorKind`](spi::ErrorKind) so
/// the error type does not depend on the HAL in use.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Rotation was not one of 0, 90, 180 or 270 degrees.
    #[display("rotation must be one of 0, 90, 180, 270 (got {_0})")]
    InvalidRotation(#[error(not(source))] u16),

    /// The shared SPI bus rejected a write.
    #[display("SPI bus error: {_0:?}")]
    Spi(#[error(not(source))] spi::ErrorKind),

    /// A chip-select line could not be driven.
    #[display("chip-select error: {_0:?}")]
    ChipSelect(#[error(not(source))] digital::ErrorKind),

    /// A command plus its data did not fit in the transmit buffer.
    #[display("command payload exceeds the transmit buffer")]
    TransferTooLong,
}

impl Error {
    pub(crate) fn spi(error: &impl spi::Error) -> Self {
        Self::Spi(error.kind())
    }

    pub(crate) fn chip_select(error: &impl digital::Error) -> Self {
        Self::ChipSelect(error.kind())
    }
}
