//! Start up, sleep, wake and recovery.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use super::{AnalogPower, Tas3004};
use crate::platform::{AmpMute, Host, RecoverySelector, ALL_AMP_LINES};
use crate::Error;

impl<I2C, RST, D, H> Tas3004<I2C, RST, D, H>
where
    I2C: Write,
    RST: OutputPin,
    D: DelayMs<u32>,
    H: Host,
{
    /// Bring the codec up for the first time.
    ///
    /// Replays the registers, then cycles the analog section through power
    /// down, which the part needs before its inputs work.
    pub fn start(&mut self) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("Starting TAS3004");
        self.recompute_max_volume();
        self.initialize()?;
        self.delay.delay_ms(self.config.timings.post_init_ms);
        self.toggle_analog_power_down_wake()
    }

    /// Power the analog section down and mute every amplifier.
    ///
    /// Every line is tried and the settle delay always runs, even if the codec
    /// cannot be reached or a mute line is stuck. A codec error is returned
    /// first, otherwise the first line that would not mute.
    pub fn sleep<M>(&mut self, amps: &mut M) -> Result<(), Error>
    where
        M: AmpMute,
    {
        #[cfg(feature = "defmt")]
        defmt::info!("TAS3004 going to sleep");
        let powered_down = self.set_analog_power(AnalogPower::PowerDown);
        let mut muted = Ok(());
        for line in ALL_AMP_LINES {
            if amps.set_mute_state(line, true).is_err() {
                #[cfg(feature = "defmt")]
                defmt::error!("Failed to mute {}", line);
                muted = muted.and(Err(Error::MuteLine(line)));
            }
        }
        self.delay.delay_ms(self.config.timings.amp_mute_ms);
        powered_down.and(muted)
    }

    /// Power the analog section back up and replay the registers.
    ///
    /// The chip may have lost its state while asleep, so a failed power up
    /// write is left to the replay, which sends the analog control register
    /// again.
    pub fn wake(&mut self) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("TAS3004 waking");
        if let Err(_e) = self.set_analog_power(AnalogPower::Normal) {
            #[cfg(feature = "defmt")]
            defmt::warn!("TAS3004 power up failed, replaying registers: {}", _e);
        }
        self.initialize()
    }

    /// Re-initialise the codec after the host was told something went wrong.
    pub fn recover_from_fatal_error(&mut self, _selector: RecoverySelector) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::warn!("TAS3004 recovering from {}", _selector);
        self.initialize()
    }
}
