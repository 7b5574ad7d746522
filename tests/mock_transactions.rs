#![allow(missing_docs)]
//! Exact call sequences against embedded-hal-mock, including chip-select failures.

use std::io::ErrorKind as IoErrorKind;

use embedded_hal::digital::ErrorKind;
use embedded_hal_mock::eh1::{
    MockError,
    digital::{Mock as PinMock, State, Transaction as PinTransaction},
    spi::{Mock as SpiMock, Transaction as SpiTransaction},
};
use unicorn_hat_mini::ht16d35::FRAME_BYTES;
use unicorn_hat_mini::{Error, PanelBus, PanelDriver};

/// Bus writes for one panel's initialization, each command followed by a flush.
fn init_writes() -> Vec<SpiTransaction<u8>> {
    let command = |bytes: &[u8]| [SpiTransaction::write_vec(bytes.to_vec()), SpiTransaction::flush()];
    let mut writes = Vec::new();
    writes.extend(command(&[0xCC]));
    writes.extend(command(&[0x37, 0x01]));
    writes.extend(command(&[0x20, 0x00]));
    writes.extend(command(&[0x35, 0x00]));
    writes.push(SpiTransaction::write_vec(vec![0x80, 0x00]));
    writes.push(SpiTransaction::write_vec(vec![0x00; FRAME_BYTES]));
    writes.push(SpiTransaction::flush());
    writes.extend(command(&[0x41, 0xFF]));
    writes.extend(command(&[0x42, 0xFF, 0xFF, 0xFF, 0xFF]));
    writes.extend(command(&[0x35, 0x03]));
    writes
}

/// `count` select/deselect pairs.
fn windows(count: usize) -> Vec<PinTransaction> {
    (0..count)
        .flat_map(|_| [PinTransaction::set(State::Low), PinTransaction::set(State::High)])
        .collect()
}

#[test]
fn init_then_brightness_matches_exactly() {
    let mut spi_expectations = init_writes();
    spi_expectations.extend(init_writes());
    spi_expectations.extend([
        SpiTransaction::write_vec(vec![0x37, 32]),
        SpiTransaction::flush(),
        SpiTransaction::write_vec(vec![0x37, 32]),
        SpiTransaction::flush(),
    ]);
    let mut spi = SpiMock::new(&spi_expectations);
    let mut left_cs = PinMock::new(&windows(9));
    let mut right_cs = PinMock::new(&windows(9));

    let mut driver = PanelDriver::new(PanelBus::new(spi.clone(), left_cs.clone(), right_cs.clone()))
        .expect("init");
    driver.set_brightness(0.5).expect("brightness");
    drop(driver);

    spi.done();
    left_cs.done();
    right_cs.done();
}

#[test]
fn chip_select_failure_stops_init() {
    let mut spi = SpiMock::<u8>::new(&[]);
    let mut left_cs = PinMock::new(&[
        PinTransaction::set(State::Low).with_error(MockError::Io(IoErrorKind::NotConnected)),
    ]);
    let mut right_cs = PinMock::new(&[]);

    let result = PanelDriver::new(PanelBus::new(spi.clone(), left_cs.clone(), right_cs.clone()));
    assert!(matches!(result, Err(Error::ChipSelect(ErrorKind::Other))));

    spi.done();
    left_cs.done();
    right_cs.done();
}

#[test]
fn release_failure_is_reported_after_the_write() {
    let mut spi = SpiMock::new(&[SpiTransaction::write_vec(vec![0xCC]), SpiTransaction::flush()]);
    let mut left_cs = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High).with_error(MockError::Io(IoErrorKind::BrokenPipe)),
    ]);
    let mut right_cs = PinMock::new(&[]);

    let result = PanelDriver::new(PanelBus::new(spi.clone(), left_cs.clone(), right_cs.clone()));
    assert!(matches!(result, Err(Error::ChipSelect(ErrorKind::Other))));

    spi.done();
    left_cs.done();
    right_cs.done();
}
