//! The [`Tas3004`] driver: shadow registers, write-through and load mode.
//!
//! Feature controls live in the submodules; every register write they make
//! funnels through the one write routine here.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use crate::config::{Config, EqPreset};
use crate::drc::{self, DrcSettings};
use crate::guard::InitLock;
use crate::interface::Interface;
use crate::platform::{Host, RecoverySelector};
use crate::registers::{LoadMode, Register, MAX_REGISTER_WIDTH};
use crate::shadow::ShadowRegisters;
use crate::tables;
use crate::Error;

mod controls;
mod equalizer;
mod init;
mod power;
mod volume;

pub use controls::{AnalogPower, InputSource, MixerState, SUPPORTED_SAMPLE_RATES};
pub use equalizer::Stream;
pub use init::InitState;
pub use volume::VolumeState;

//
// Public Types
//

/// How a register write treats the shadow copy and the hardware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteMode {
    /// Update the shadow only. No bus traffic.
    ShadowOnly,
    /// Send to the hardware, leaving the shadow alone.
    HardwareOnly,
    /// Update the shadow, then send to the hardware.
    All,
    /// Update the shadow, then send to the hardware. Behaves like
    /// [`WriteMode::All`]; marks writes that must always reach the chip.
    ForceAll,
}

/// Represents the state inside our TAS3004 chip, and owns the bus used to
/// reach it.
pub struct Tas3004<I2C, RST, D, H = ()> {
    interface: Interface<I2C, RST>,
    delay: D,
    host: H,
    config: Config,
    presets: &'static [EqPreset],
    shadow: ShadowRegisters,
    lock: InitLock,
    init_state: InitState,
    drc: DrcSettings,
    volume: VolumeState,
    max_volume: u32,
}

//
// impls on Public Types
//

impl WriteMode {
    fn updates_shadow(self) -> bool {
        matches!(self, WriteMode::ShadowOnly | WriteMode::All | WriteMode::ForceAll)
    }

    fn updates_hardware(self) -> bool {
        matches!(self, WriteMode::HardwareOnly | WriteMode::All | WriteMode::ForceAll)
    }
}

impl<I2C, RST, D, H> Tas3004<I2C, RST, D, H>
where
    I2C: Write,
    RST: OutputPin,
    D: DelayMs<u32>,
    H: Host,
{
    /// Create a new TAS3004 driver.
    ///
    /// The shadow registers start with the power-on programme (see
    /// [`ShadowRegisters::set_register_defaults`]), but nothing is sent to
    /// the chip until you call [`Tas3004::start`].
    pub fn new(
        i2c: I2C,
        reset: RST,
        delay: D,
        host: H,
        config: Config,
        presets: &'static [EqPreset],
    ) -> Tas3004<I2C, RST, D, H> {
        let mut codec = Tas3004 {
            interface: Interface::new(i2c, reset, config.bus_address),
            delay,
            host,
            config,
            presets,
            shadow: ShadowRegisters::new(),
            lock: InitLock::new(),
            init_state: InitState::Idle,
            drc: drc::DISABLED,
            volume: VolumeState::default(),
            max_volume: tables::UNITY_VOLUME,
        };
        codec.recompute_max_volume();
        codec
    }

    /// Write `data` to the register at bus sub-address `address`.
    ///
    /// `data` is truncated or zero-padded to the register's width. Fails with
    /// [`Error::UnmappedRegister`] before touching anything if `address` is
    /// not a TAS3004 register.
    pub fn write_register(&mut self, address: u8, data: &[u8], mode: WriteMode) -> Result<(), Error> {
        let register = Register::from_address(address).ok_or(Error::UnmappedRegister(address))?;
        self.write(register, data, mode)
    }

    /// Read back the register at bus sub-address `address` into `buffer`.
    ///
    /// Reads from the shadow registers because the TAS3004 is write-only.
    /// Copies at most the register's width and returns the number of bytes
    /// copied.
    pub fn read_register(&self, address: u8, buffer: &mut [u8]) -> Result<usize, Error> {
        let register = Register::from_address(address).ok_or(Error::UnmappedRegister(address))?;
        Ok(self.shadow.load(register, buffer))
    }

    /// The shadow registers.
    pub fn shadow(&self) -> &ShadowRegisters {
        &self.shadow
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The host this driver reports to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host this driver reports to.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give back the bus, reset pin, delay and host.
    pub fn release(self) -> (I2C, RST, D, H) {
        let (i2c, reset) = self.interface.release();
        (i2c, reset, self.delay, self.host)
    }

    /// The load mode the shadow of Main Control Register 1 is in.
    pub fn load_mode(&self) -> LoadMode {
        LoadMode::of(self.shadow.byte(Register::MainControl1))
    }

    /// Switch the DSP load mode, keeping every other bit of Main Control
    /// Register 1.
    ///
    /// Only biquad registers may be written in [`LoadMode::Fast`]. Outside
    /// this crate the switch is only reachable through loaders that always
    /// come back to [`LoadMode::Normal`].
    pub(crate) fn set_load_mode(&mut self, mode: LoadMode) -> Result<(), Error> {
        let value = mode.apply(self.shadow.byte(Register::MainControl1));
        self.write(Register::MainControl1, &[value], WriteMode::ForceAll)
    }

    /// Dump the interesting shadow registers to the log.
    pub fn log_registers(&self) {
        #[cfg(feature = "defmt")]
        {
            defmt::debug!("TAS3004 MCR1: {=u8:x}", self.shadow.byte(Register::MainControl1));
            defmt::debug!("TAS3004 DRC:  {=[u8]:x}", self.shadow.get(Register::DynamicRange));
            defmt::debug!("TAS3004 VOL:  {=[u8]:x}", self.shadow.get(Register::Volume));
            defmt::debug!("TAS3004 ACR:  {=u8:x}", self.shadow.byte(Register::AnalogControl));
            defmt::debug!("TAS3004 MCR2: {=u8:x}", self.shadow.byte(Register::MainControl2));
            defmt::debug!("TAS3004 MIXL: {=[u8]:x}", self.shadow.get(Register::MixerLeftGain));
            defmt::debug!("TAS3004 MIXR: {=[u8]:x}", self.shadow.get(Register::MixerRightGain));
        }
    }

    /// Every register write goes through here.
    ///
    /// A failed bus write is reported to the host straight away, as well as
    /// being returned. Recovery is the host's call, never retried inline.
    fn write(&mut self, register: Register, data: &[u8], mode: WriteMode) -> Result<(), Error> {
        let width = register.width();
        let mut image = [0u8; MAX_REGISTER_WIDTH];
        let count = data.len().min(width);
        image[..count].copy_from_slice(&data[..count]);

        if mode.updates_shadow() {
            self.shadow.store(register, &image[..width]);
        }
        if mode.updates_hardware() {
            if let Err(e) = self.interface.write_register(register, &image[..width]) {
                self.host
                    .notify_fatal_error(RecoverySelector::ControlBusFatalError);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Run `load` with the DSP in fast load mode.
    ///
    /// Normal load mode is restored afterwards, with the rest of Main Control
    /// Register 1 as it was on entry, even if entering fast mode or `load`
    /// failed. The first error wins.
    fn with_fast_load<F>(&mut self, load: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let saved = self.shadow.byte(Register::MainControl1);
        let result = self
            .set_load_mode(LoadMode::Fast)
            .and_then(|()| load(self));
        let restored = self.write(
            Register::MainControl1,
            &[LoadMode::Normal.apply(saved)],
            WriteMode::ForceAll,
        );
        result.and(restored)
    }

    /// Read-modify-write of a one-byte register.
    fn update_bits(&mut self, register: Register, value: u8, mask: u8, mode: WriteMode) -> Result<(), Error> {
        let current = self.shadow.byte(register);
        let new = (current & !mask) | (value & mask);
        self.write(register, &[new], mode)
    }
}
