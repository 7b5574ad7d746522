#![allow(missing_docs)]
//! Bytes on the wire for initialization, refresh, brightness and shutdown.

mod common;

use common::{BusEvent, Recorder, Transaction};
use embedded_hal::spi::ErrorKind;
use unicorn_hat_mini::ht16d35::FRAME_BYTES;
use unicorn_hat_mini::ht16d35::lut::FRAME_LUT;
use unicorn_hat_mini::{Error, Panel, PanelDriver, Rotation};

type Driver = PanelDriver<common::FakeSpi, common::FakePin, common::FakePin>;

fn init_sequence() -> Vec<Vec<u8>> {
    let mut clear = vec![0x80, 0x00];
    clear.extend([0; FRAME_BYTES]);
    vec![
        vec![0xCC],
        vec![0x37, 0x01],
        vec![0x20, 0x00],
        vec![0x35, 0x00],
        clear,
        vec![0x41, 0xFF],
        vec![0x42, 0xFF, 0xFF, 0xFF, 0xFF],
        vec![0x35, 0x03],
    ]
}

fn started() -> (Recorder, Driver) {
    let recorder = Recorder::new();
    let driver = PanelDriver::new(recorder.bus()).expect("fake bus never fails during init");
    recorder.clear();
    (recorder, driver)
}

fn panels(transactions: &[Transaction]) -> Vec<Panel> {
    transactions.iter().map(|transaction| transaction.panel).collect()
}

fn payloads(transactions: &[Transaction]) -> Vec<Vec<u8>> {
    transactions.iter().map(Transaction::bytes).collect()
}

/// Frame bytes of a display write, after checking its header.
fn frame_of(transaction: &Transaction) -> Vec<u8> {
    let bytes = transaction.bytes();
    assert_eq!(bytes[..2], [0x80, 0x00]);
    assert_eq!(bytes.len(), 2 + FRAME_BYTES);
    bytes[2..].to_vec()
}

#[test]
fn init_configures_left_then_right() {
    let recorder = Recorder::new();
    let _driver = PanelDriver::new(recorder.bus()).expect("fake bus never fails during init");

    let transactions = recorder.transactions();
    assert_eq!(transactions.len(), 16);
    let (left, right) = transactions.split_at(8);
    assert!(left.iter().all(|transaction| transaction.panel == Panel::Left));
    assert!(right.iter().all(|transaction| transaction.panel == Panel::Right));
    assert_eq!(payloads(left), init_sequence());
    assert_eq!(payloads(right), init_sequence());
}

#[test]
fn show_sends_exactly_two_frames() {
    let (recorder, mut driver) = started();
    driver.show().expect("show");

    let transactions = recorder.transactions();
    assert_eq!(panels(&transactions), [Panel::Left, Panel::Right]);
    for transaction in &transactions {
        // Header and frame go out as separate writes, never concatenated.
        assert_eq!(transaction.writes.len(), 2);
        assert_eq!(transaction.writes[0], [0x80, 0x00]);
        assert_eq!(transaction.writes[1].len(), FRAME_BYTES);
    }
}

#[test]
fn red_origin_pixel_lands_on_first_lut_triple() {
    let (recorder, mut driver) = started();
    driver.set_pixel(0, 0, 255, 0, 0);
    driver.show().expect("show");

    let transactions = recorder.transactions();
    let left = frame_of(&transactions[0]);
    let right = frame_of(&transactions[1]);
    assert_eq!(left[usize::from(FRAME_LUT[0])], 63);
    assert_eq!(left[usize::from(FRAME_LUT[1])], 0);
    assert_eq!(left[usize::from(FRAME_LUT[2])], 0);
    assert_eq!(left.iter().filter(|&&byte| byte != 0).count(), 1);
    assert!(right.iter().all(|&byte| byte == 0));
}

#[test]
fn rotated_origin_pixel_lands_on_right_panel() {
    let (recorder, mut driver) = started();
    driver.set_rotation(Rotation::Deg180);
    driver.set_pixel(0, 0, 0, 0, 255);
    driver.show().expect("show");

    // Offset 118 is the right panel's last pixel, local index 55.
    let transactions = recorder.transactions();
    let left = frame_of(&transactions[0]);
    let right = frame_of(&transactions[1]);
    assert!(left.iter().all(|&byte| byte == 0));
    assert_eq!(right[usize::from(FRAME_LUT[55 * 3 + 2])], 63);
    assert_eq!(right.iter().filter(|&&byte| byte != 0).count(), 1);
}

#[test]
fn white_fills_mapped_bytes_only() {
    let (recorder, mut driver) = started();
    driver.set_all(255, 255, 255);
    driver.show().expect("show");

    let transactions = recorder.transactions();
    let left = frame_of(&transactions[0]);
    let right = frame_of(&transactions[1]);
    assert_eq!(left.iter().filter(|&&byte| byte == 63).count(), 63 * 3);
    assert_eq!(right.iter().filter(|&&byte| byte == 63).count(), 56 * 3);
    assert!(left.iter().chain(&right).all(|&byte| byte == 0 || byte == 63));
}

#[test]
fn brightness_goes_to_both_panels() {
    let (recorder, mut driver) = started();
    driver.set_brightness(1.0).expect("brightness");
    driver.set_brightness(0.0).expect("brightness");
    driver.set_brightness_raw(200).expect("brightness");

    let transactions = recorder.transactions();
    assert_eq!(
        panels(&transactions),
        [Panel::Left, Panel::Right, Panel::Left, Panel::Right, Panel::Left, Panel::Right]
    );
    assert_eq!(
        payloads(&transactions),
        [
            vec![0x37, 63],
            vec![0x37, 63],
            vec![0x37, 0],
            vec![0x37, 0],
            vec![0x37, 63],
            vec![0x37, 63],
        ]
    );
}

#[test]
fn shutdown_disables_outputs_and_returns_bus() {
    let (recorder, driver) = started();
    let bus = driver.shutdown().expect("shutdown");

    let transactions = recorder.transactions();
    assert_eq!(
        panels(&transactions),
        [Panel::Left, Panel::Left, Panel::Left, Panel::Right, Panel::Right, Panel::Right]
    );
    let sequence = vec![vec![0x41, 0x00], vec![0x42, 0, 0, 0, 0], vec![0x35, 0x00]];
    let expected: Vec<Vec<u8>> = sequence.iter().chain(&sequence).cloned().collect();
    assert_eq!(payloads(&transactions), expected);

    // The returned bus still works.
    let _driver = PanelDriver::new(bus).expect("reinitialize");
}

#[test]
fn release_sends_nothing() {
    let (recorder, driver) = started();
    let _bus = driver.release();
    assert!(recorder.events().is_empty());
}

#[test]
fn spi_failure_propagates_and_releases_chip_select() {
    let (recorder, mut driver) = started();
    recorder.fail_writes();

    assert_eq!(driver.show(), Err(Error::Spi(ErrorKind::Other)));
    assert_eq!(
        recorder.events(),
        [BusEvent::Select(Panel::Left), BusEvent::Deselect(Panel::Left)]
    );
}

#[test]
fn invalid_rotation_changes_nothing() {
    let (recorder, mut driver) = started();
    driver.set_rotation(Rotation::Deg90);

    assert_eq!(
        driver.set_rotation_degrees(45),
        Err(Error::InvalidRotation(45))
    );
    assert_eq!(driver.rotation(), Rotation::Deg90);
    assert_eq!(driver.get_shape(), (7, 17));
    assert!(recorder.events().is_empty());

    driver.set_rotation_degrees(270).expect("valid rotation");
    assert_eq!(driver.rotation(), Rotation::Deg270);
}

#[test]
fn drawing_without_show_sends_nothing() {
    let (recorder, mut driver) = started();
    driver.set_pixel(1, 1, 10, 20, 30);
    driver.set_all(1, 2, 3);
    driver.clear();
    assert!(recorder.events().is_empty());
}
