//! Recording stand-ins for the SPI bus and chip-select pins.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::{digital, spi};
use unicorn_hat_mini::{Panel, PanelBus};

/// Something that happened on the fake hardware, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusEvent {
    Select(Panel),
    Deselect(Panel),
    Write(Vec<u8>),
    Flush,
}

/// Bytes sent to one panel between a select and the matching deselect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub panel: Panel,
    pub writes: Vec<Vec<u8>>,
}

impl Transaction {
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

/// Shared log behind a [`FakeSpi`] and two [`FakePin`]s.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<BusEvent>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> PanelBus<FakeSpi, FakePin, FakePin> {
        PanelBus::new(
            FakeSpi {
                recorder: self.clone(),
            },
            FakePin {
                panel: Panel::Left,
                recorder: self.clone(),
            },
            FakePin {
                panel: Panel::Right,
                recorder: self.clone(),
            },
        )
    }

    /// Make every later SPI write fail with [`spi::ErrorKind::Other`].
    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Group the log into transactions, checking that each is select, writes, flush,
    /// deselect on a single panel.
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut transactions = Vec::new();
        let mut open: Option<Transaction> = None;
        let mut flushed = false;
        for event in self.events() {
            match event {
                BusEvent::Select(panel) => {
                    assert!(open.is_none(), "{panel:?} selected inside a transaction");
                    open = Some(Transaction {
                        panel,
                        writes: Vec::new(),
                    });
                    flushed = false;
                }
                BusEvent::Write(bytes) => {
                    let transaction = open.as_mut().expect("write outside a transaction");
                    assert!(!flushed, "write after flush");
                    transaction.writes.push(bytes);
                }
                BusEvent::Flush => {
                    assert!(open.is_some(), "flush outside a transaction");
                    flushed = true;
                }
                BusEvent::Deselect(panel) => {
                    let transaction = open.take().expect("deselect outside a transaction");
                    assert_eq!(transaction.panel, panel, "deselected the wrong panel");
                    assert!(flushed, "deselected before flushing");
                    transactions.push(transaction);
                }
            }
        }
        assert!(open.is_none(), "transaction left open");
        transactions
    }

    fn record(&self, event: BusEvent) {
        self.events.borrow_mut().push(event);
    }
}

pub struct FakeSpi {
    recorder: Recorder,
}

impl spi::ErrorType for FakeSpi {
    type Error = spi::ErrorKind;
}

impl spi::SpiBus<u8> for FakeSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        panic!("the display is write-only, attempted to read {} bytes", words.len());
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if self.recorder.fail_writes.get() {
            return Err(spi::ErrorKind::Other);
        }
        self.recorder.record(BusEvent::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        panic!("unexpected full-duplex transfer of {} bytes", write.len());
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        panic!("unexpected in-place transfer of {} bytes", words.len());
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.recorder.record(BusEvent::Flush);
        Ok(())
    }
}

pub struct FakePin {
    panel: Panel,
    recorder: Recorder,
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl digital::OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.recorder.record(BusEvent::Select(self.panel));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.recorder.record(BusEvent::Deselect(self.panel));
        Ok(())
    }
}
