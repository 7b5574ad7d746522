#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]
//! Scrolling rainbow on a Unicorn HAT Mini wired to a Pico 1.
//!
//! Wiring: SPI0 with SCK on GPIO 18 and MOSI on GPIO 19; left chip select on GPIO 17, right
//! chip select on GPIO 14. The on-board LED blinks while frames are being sent.
//!
//! Buttons (active low, GPIO 10 to 13): A steps the rotation, B blanks the display until
//! released, X and Y raise and lower the brightness.

use core::{convert::Infallible, panic};

use embassy_executor::Spawner;
use embassy_rp::{
    gpio::{Input, Level, Output, Pull},
    spi::{Config, Spi},
};
use embassy_time::{Duration, Instant, Ticker};
use smart_leds::hsv::{Hsv, hsv2rgb};
use unicorn_hat_mini::{
    COLS, PanelBus, PanelDriver, ROWS, Result, Rotation, ht16d35::BRIGHTNESS_MAX,
};
use {defmt_rtt as _, panic_probe as _};

const FRAME_RATE_HZ: u64 = 60;
/// Time for the pattern to cycle through every hue once.
const HUE_CYCLE_MS: u64 = 4_000;
/// Frames between on-board LED toggles.
const BLINK_FRAMES: u32 = 6;
const BRIGHTNESS_START: u8 = 12;
const BRIGHTNESS_STEP: u8 = 4;

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let mut config = Config::default();
    config.frequency = 5_000_000;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, config);
    let left_cs = Output::new(p.PIN_17, Level::High);
    let right_cs = Output::new(p.PIN_14, Level::High);
    let mut status_led = Output::new(p.PIN_25, Level::Low);
    let button_a = Input::new(p.PIN_10, Pull::Up);
    let button_b = Input::new(p.PIN_11, Pull::Up);
    let button_x = Input::new(p.PIN_12, Pull::Up);
    let button_y = Input::new(p.PIN_13, Pull::Up);

    let mut display = PanelDriver::new(PanelBus::new(spi, left_cs, right_cs))?;
    let mut brightness = BRIGHTNESS_START;
    display.set_brightness_raw(brightness)?;
    defmt::info!("rainbow: display ready");

    let mut ticker = Ticker::every(Duration::from_hz(FRAME_RATE_HZ));
    let mut frame: u32 = 0;
    let mut was_pressed = [false; 3];
    loop {
        let pressed = [button_a.is_low(), button_x.is_low(), button_y.is_low()];
        let [rotate, brighter, dimmer] =
            core::array::from_fn(|index| pressed[index] && !was_pressed[index]);
        was_pressed = pressed;

        if rotate {
            let rotation = next_rotation(display.rotation());
            display.set_rotation(rotation);
            defmt::info!("rainbow: rotation {}", rotation);
        }
        if brighter || dimmer {
            brightness = if brighter {
                brightness.saturating_add(BRIGHTNESS_STEP).min(BRIGHTNESS_MAX)
            } else {
                brightness.saturating_sub(BRIGHTNESS_STEP)
            };
            display.set_brightness_raw(brightness)?;
        }

        let elapsed_ms = Instant::now().as_millis();
        let (width, height) = display.shape();
        if button_b.is_low() {
            display.clear();
        } else {
            paint_rainbow(&mut display, elapsed_ms, width, height);
        }
        display.show()?;

        frame = frame.wrapping_add(1);
        if frame % BLINK_FRAMES == 0 {
            status_led.toggle();
        }
        ticker.next().await;
    }
}

fn paint_rainbow<SPI, CS0, CS1>(
    display: &mut PanelDriver<SPI, CS0, CS1>,
    elapsed_ms: u64,
    width: usize,
    height: usize,
) {
    for y in 0..height {
        for x in 0..width {
            let color = hsv2rgb(Hsv {
                hue: hue_at(elapsed_ms, x, y),
                sat: 255,
                val: 255,
            });
            display.set_pixel_color(x, y, color);
        }
    }
}

fn next_rotation(rotation: Rotation) -> Rotation {
    match rotation {
        Rotation::Deg0 => Rotation::Deg90,
        Rotation::Deg90 => Rotation::Deg180,
        Rotation::Deg180 => Rotation::Deg270,
        Rotation::Deg270 => Rotation::Deg0,
    }
}

/// Hue for `(x, y)`: one full turn every `HUE_CYCLE_MS`, half a turn across the width and a
/// full turn down the height.
fn hue_at(elapsed_ms: u64, x: usize, y: usize) -> u8 {
    let time = elapsed_ms % HUE_CYCLE_MS * 256 / HUE_CYCLE_MS;
    let across = x as u64 * 256 / (2 * COLS as u64);
    let down = y as u64 * 256 / ROWS as u64;
    ((time + across + down) % 256) as u8
}
