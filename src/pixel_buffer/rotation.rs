//! Display rotation and the logical `(x, y)` to buffer-offset address functions.
//!
//! The buffer is stored column-major in the panel's native orientation: offset
//! `x * ROWS + y` for an unrotated display. Each [`Rotation`] maps caller coordinates in its
//! own (possibly swapped) shape onto that fixed storage.

use crate::{COLS, Error, ROWS, Result};

/// One of the four supported display rotations.
///
/// ```rust
/// use unicorn_hat_mini::Rotation;
///
/// let rotation = Rotation::from_degrees(90).expect("90 is a supported rotation");
/// assert_eq!(rotation, Rotation::Deg90);
/// assert_eq!(rotation.shape(), (7, 17)); // (width, height)
/// assert!(Rotation::from_degrees(45).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Native orientation, 17 wide by 7 high.
    #[default]
    Deg0,
    /// Rotated a quarter turn, 7 wide by 17 high.
    Deg90,
    /// Upside down, 17 wide by 7 high.
    Deg180,
    /// Rotated three quarter turns, 7 wide by 17 high.
    Deg270,
}

impl Rotation {
    /// All rotations in increasing angle.
    pub const ALL: [Self; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    /// Parse a rotation given in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRotation`] unless `degrees` is 0, 90, 180 or 270.
    pub const fn from_degrees(degrees: u16) -> Result<Self> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(Error::InvalidRotation(other)),
        }
    }

    /// The rotation angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Caller-visible `(width, height)` under this rotation.
    #[must_use]
    pub const fn shape(self) -> (usize, usize) {
        match self {
            Self::Deg0 | Self::Deg180 => (COLS, ROWS),
            Self::Deg90 | Self::Deg270 => (ROWS, COLS),
        }
    }

    /// Whether `(x, y)` lies inside [`Self::shape`].
    #[must_use]
    pub const fn contains(self, x: usize, y: usize) -> bool {
        let (width, height) = self.shape();
        x < width && y < height
    }

    /// Buffer offset for caller coordinate `(x, y)`.
    ///
    /// `(x, y)` must be inside [`Self::shape`]; out-of-range input yields an offset that
    /// belongs to a different pixel or lies past the end of the buffer.
    #[must_use]
    pub const fn offset(self, x: usize, y: usize) -> usize {
        match self {
            Self::Deg0 => x * ROWS + y,
            Self::Deg90 => (COLS - 1 - y) * ROWS + x,
            Self::Deg180 => (COLS - 1 - x) * ROWS + (ROWS - 1 - y),
            Self::Deg270 => y * ROWS + (ROWS - 1 - x),
        }
    }

    /// Caller coordinate `(x, y)` stored at buffer `offset`; the inverse of [`Self::offset`].
    #[must_use]
    pub const fn xy(self, offset: usize) -> (usize, usize) {
        let column = offset / ROWS;
        let row = offset % ROWS;
        match self {
            Self::Deg0 => (column, row),
            Self::Deg90 => (row, COLS - 1 - column),
            Self::Deg180 => (COLS - 1 - column, ROWS - 1 - row),
            Self::Deg270 => (ROWS - 1 - row, column),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = Error;

    fn try_from(degrees: u16) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}
