//! Initialisation and recovery: reset the chip and replay the shadow
//! registers in the order the DSP needs them.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use super::{Tas3004, WriteMode};
use crate::platform::Host;
use crate::registers::{LoadMode, Register, INIT_SEQUENCE, MAX_REGISTER_WIDTH};
use crate::Error;

/// Where the register replay has got to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitState {
    /// Never initialised
    Idle,
    /// Pulsing the reset line
    Resetting,
    /// Replaying the biquads in fast load mode
    FastLoadBiquads,
    /// Replaying everything else in normal load mode
    NormalLoadRest,
    /// The last replay succeeded
    Done,
    /// The last replay ran out of attempts
    Failed,
}

impl<I2C, RST, D, H> Tas3004<I2C, RST, D, H>
where
    I2C: Write,
    RST: OutputPin,
    D: DelayMs<u32>,
    H: Host,
{
    /// Reset the codec and write every shadow register back to it.
    ///
    /// A failed attempt starts again from the reset pulse, up to
    /// [`Config::max_init_attempts`](crate::Config::max_init_attempts) times,
    /// after which you get [`Error::DeviceUnresponsive`]. If a replay is
    /// already running you get [`Error::Busy`] and nothing is touched.
    ///
    /// The shadow registers are not changed, apart from Main Control
    /// Register 1 which is always left in normal load mode.
    pub fn initialize(&mut self) -> Result<(), Error> {
        if !self.lock.try_acquire() {
            #[cfg(feature = "defmt")]
            defmt::warn!("TAS3004 initialisation already in progress");
            return Err(Error::Busy);
        }
        let result = self.replay_with_retries();
        self.lock.release();
        result
    }

    /// Where the last (or current) replay got to.
    pub fn init_state(&self) -> InitState {
        self.init_state
    }

    fn replay_with_retries(&mut self) -> Result<(), Error> {
        let attempts = self.config.max_init_attempts.max(1);
        for _attempt in 1..=attempts {
            match self.replay_once() {
                Ok(()) => {
                    self.init_state = InitState::Done;
                    #[cfg(feature = "defmt")]
                    defmt::info!("TAS3004 initialised on attempt {=u8}", _attempt);
                    return Ok(());
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("TAS3004 initialisation attempt {=u8} failed: {}", _attempt, _e);
                }
            }
        }
        self.init_state = InitState::Failed;
        #[cfg(feature = "defmt")]
        defmt::error!("TAS3004 unresponsive after {=u8} attempts", attempts);
        Err(Error::DeviceUnresponsive { attempts })
    }

    fn replay_once(&mut self) -> Result<(), Error> {
        self.init_state = InitState::Resetting;
        #[cfg(feature = "defmt")]
        defmt::debug!("TAS3004 replay: reset");
        self.interface
            .reset_pulse(&mut self.delay, &self.config.timings)?;

        let saved = LoadMode::Normal.apply(self.shadow.byte(Register::MainControl1));
        // Unknown after reset, so the first entry always sets it
        let mut current: Option<LoadMode> = None;
        let mut image = [0u8; MAX_REGISTER_WIDTH];

        for &(register, mode) in INIT_SEQUENCE.iter() {
            if current != Some(mode) {
                self.init_state = match mode {
                    LoadMode::Fast => InitState::FastLoadBiquads,
                    LoadMode::Normal => InitState::NormalLoadRest,
                };
                self.write(
                    Register::MainControl1,
                    &[mode.apply(saved)],
                    WriteMode::HardwareOnly,
                )?;
                current = Some(mode);
            }
            let count = self.shadow.load(register, &mut image);
            self.write(register, &image[..count], WriteMode::HardwareOnly)?;
        }

        self.write(Register::MainControl1, &[saved], WriteMode::All)
    }
}
