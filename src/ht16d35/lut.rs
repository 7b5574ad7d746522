//! Frame-buffer byte offsets for every LED, in the order the pixel buffer stores them.
//!
//! Entry `3 * i`, `3 * i + 1` and `3 * i + 2` give the red, green and blue byte offsets for
//! pixel `i` of a panel. The left panel uses all 63 triples; the right panel has fewer
//! LEDs and uses the leading triples only. The values follow the board wiring between
//! HT16D35 outputs and LEDs and cannot be derived from the panel geometry.

use crate::PIXEL_COUNT;
use crate::ht16d35::FRAME_BYTES;

/// Red, green and blue frame-buffer offsets for each panel-local pixel.
#[rustfmt::skip]
pub const FRAME_LUT: [u8; 189] = [
    0x8b, 0x8a, 0x89, 0xdf, 0xde, 0xdd, 0xa7, 0xa6, 0xa5, 0xc3, 0xc2, 0xc1,
    0x6f, 0x6e, 0x6d, 0x37, 0x36, 0x35, 0x53, 0x52, 0x51, 0x88, 0x87, 0x86,
    0xdc, 0xdb, 0xda, 0xa4, 0xa3, 0xa2, 0xc0, 0xbf, 0xbe, 0x6c, 0x6b, 0x6a,
    0x34, 0x33, 0x32, 0x50, 0x4f, 0x4e, 0x71, 0x73, 0x72, 0xc5, 0xc7, 0xc6,
    0x8d, 0x8f, 0x8e, 0xa9, 0xab, 0xaa, 0x55, 0x57, 0x56, 0x1d, 0x1f, 0x1e,
    0x39, 0x3b, 0x3a, 0x74, 0x76, 0x75, 0xc8, 0xca, 0xc9, 0x90, 0x92, 0x91,
    0xac, 0xae, 0xad, 0x58, 0x5a, 0x59, 0x20, 0x22, 0x21, 0x3c, 0x3e, 0x3d,
    0x77, 0x79, 0x78, 0xcb, 0xcd, 0xcc, 0x93, 0x95, 0x94, 0xaf, 0xb1, 0xb0,
    0x5b, 0x5d, 0x5c, 0x23, 0x25, 0x24, 0x3f, 0x41, 0x40, 0x7a, 0x7c, 0x7b,
    0xce, 0xd0, 0xcf, 0x96, 0x98, 0x97, 0xb2, 0xb4, 0xb3, 0x5e, 0x60, 0x5f,
    0x26, 0x28, 0x27, 0x42, 0x44, 0x43, 0x7d, 0x7f, 0x7e, 0xd1, 0xd3, 0xd2,
    0x99, 0x9b, 0x9a, 0xb5, 0xb7, 0xb6, 0x61, 0x63, 0x62, 0x29, 0x2b, 0x2a,
    0x45, 0x47, 0x46, 0x80, 0x82, 0x81, 0xd4, 0xd6, 0xd5, 0x9c, 0x9e, 0x9d,
    0xb8, 0xba, 0xb9, 0x64, 0x66, 0x65, 0x2c, 0x2e, 0x2d, 0x48, 0x4a, 0x49,
    0x83, 0x85, 0x84, 0xd7, 0xd9, 0xd8, 0x9f, 0xa1, 0xa0, 0xbb, 0xbd, 0xbc,
    0x67, 0x69, 0x68, 0x2f, 0x31, 0x30, 0x4b, 0x4d, 0x4c,
];

/// Pixels driven by the left chip; buffer offsets `0..PANEL_LEFT_PIXELS`.
pub const PANEL_LEFT_PIXELS: usize = FRAME_LUT.len() / 3;

/// Pixels driven by the right chip; buffer offsets `PANEL_LEFT_PIXELS..PIXEL_COUNT`.
pub const PANEL_RIGHT_PIXELS: usize = PIXEL_COUNT - PANEL_LEFT_PIXELS;

const _: () = {
    assert!(FRAME_LUT.len() % 3 == 0, "lut must hold whole RGB triples");
    assert!(
        PANEL_RIGHT_PIXELS <= PANEL_LEFT_PIXELS,
        "right panel reuses the leading lut triples"
    );
    let mut i = 0;
    while i < FRAME_LUT.len() {
        assert!((FRAME_LUT[i] as usize) < FRAME_BYTES, "lut offset past end of frame");
        i += 1;
    }
};
