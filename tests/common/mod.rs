//! Recording mocks for the bus, reset pin, delay, host and amplifiers.
//!
//! Every mock pushes onto one shared event log, so tests can check the order
//! things happened in across collaborators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use tas3004::{AmpLine, AmpMute, Config, EqPreset, Host, RecoverySelector, Tas3004, Timings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A bus write that went through: sub-address, then payload
    Write(u8, Vec<u8>),
    /// A bus write that was refused
    Nack(u8),
    /// Reset line level (`true` = run)
    Reset(bool),
    Delay(u32),
    Mute(AmpLine, bool),
    Fatal(RecoverySelector),
}

#[derive(Debug, Default)]
pub struct Log {
    pub events: Vec<Event>,
    /// Bus write attempts so far, including refused ones
    pub attempts: usize,
    /// Attempt numbers (from zero) that will be refused
    pub fail_attempts: BTreeSet<usize>,
    /// Refuse every bus write
    pub fail_all: bool,
    /// Refuse this many writes to this sub-address
    pub fail_register: Option<(u8, usize)>,
    pub frame: u32,
}

pub type Shared = Rc<RefCell<Log>>;

pub struct MockI2c(pub Shared);
pub struct MockPin(pub Shared);
pub struct MockDelay(pub Shared);
pub struct MockHost(pub Shared);
pub struct MockAmps(pub Shared);

pub type TestCodec = Tas3004<MockI2c, MockPin, MockDelay, MockHost>;

impl Write for MockI2c {
    type Error = ();

    fn write(&mut self, _address: u8, bytes: &[u8]) -> Result<(), ()> {
        let mut log = self.0.borrow_mut();
        let attempt = log.attempts;
        log.attempts += 1;
        let register = bytes[0];
        let mut refuse = log.fail_all || log.fail_attempts.contains(&attempt);
        if let Some((target, remaining)) = log.fail_register {
            if target == register && remaining > 0 {
                log.fail_register = Some((target, remaining - 1));
                refuse = true;
            }
        }
        if refuse {
            log.events.push(Event::Nack(register));
            Err(())
        } else {
            log.events.push(Event::Write(register, bytes[1..].to_vec()));
            Ok(())
        }
    }
}

impl OutputPin for MockPin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), ()> {
        self.0.borrow_mut().events.push(Event::Reset(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), ()> {
        self.0.borrow_mut().events.push(Event::Reset(true));
        Ok(())
    }
}

impl DelayMs<u32> for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ms));
    }
}

impl Host for MockHost {
    fn notify_fatal_error(&mut self, selector: RecoverySelector) {
        self.0.borrow_mut().events.push(Event::Fatal(selector));
    }

    fn frame_count(&self) -> u32 {
        self.0.borrow().frame
    }

    fn set_frame_count(&mut self, value: u32) -> bool {
        self.0.borrow_mut().frame = value;
        true
    }
}

impl AmpMute for MockAmps {
    type Error = ();

    fn set_mute_state(&mut self, line: AmpLine, muted: bool) -> Result<(), ()> {
        self.0.borrow_mut().events.push(Event::Mute(line, muted));
        Ok(())
    }
}

/// Timings used by the tests: all distinct, so delays can be told apart.
pub const TEST_TIMINGS: Timings = Timings {
    reset_setup_ms: 1,
    reset_hold_ms: 2,
    reset_release_ms: 3,
    volume_ramp_ms: 4,
    amp_mute_ms: 5,
    post_init_ms: 6,
};

pub fn config() -> Config {
    Config {
        timings: TEST_TIMINGS,
        ..Config::DEFAULT
    }
}

pub fn codec_with(config: Config, presets: &'static [EqPreset]) -> (TestCodec, Shared) {
    let log: Shared = Rc::new(RefCell::new(Log::default()));
    let codec = Tas3004::new(
        MockI2c(log.clone()),
        MockPin(log.clone()),
        MockDelay(log.clone()),
        MockHost(log.clone()),
        config,
        presets,
    );
    (codec, log)
}

pub fn codec() -> (TestCodec, Shared) {
    codec_with(config(), &[])
}

/// Forget everything logged so far.
pub fn clear(log: &Shared) {
    let mut log = log.borrow_mut();
    log.events.clear();
    log.attempts = 0;
}

pub fn events(log: &Shared) -> Vec<Event> {
    log.borrow().events.clone()
}

/// The successful bus writes, in order.
pub fn writes(log: &Shared) -> Vec<(u8, Vec<u8>)> {
    log.borrow()
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Write(register, data) => Some((*register, data.clone())),
            _ => None,
        })
        .collect()
}

/// Sub-addresses of the successful bus writes, in order.
pub fn write_addresses(log: &Shared) -> Vec<u8> {
    writes(log).into_iter().map(|(register, _)| register).collect()
}

/// The last payload written to `register`.
pub fn last_write(log: &Shared, register: u8) -> Option<Vec<u8>> {
    writes(log)
        .into_iter()
        .rev()
        .find(|(r, _)| *r == register)
        .map(|(_, data)| data)
}

/// How many times the reset line was pulled low.
pub fn reset_pulses(log: &Shared) -> usize {
    log.borrow()
        .events
        .iter()
        .filter(|e| **e == Event::Reset(false))
        .count()
}
