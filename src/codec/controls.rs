//! Inputs, mixers, analog power and the digital audio format.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use super::{Tas3004, WriteMode};
use crate::platform::Host;
use crate::registers::{acr, mcr1, Register};
use crate::Error;

/// Sample rates the TAS3004 can run at, in Hz.
pub const SUPPORTED_SAMPLE_RATES: [u32; 3] = [32_000, 44_100, 48_000];

/// Which analog input feeds the ADC.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputSource {
    /// Stereo line input A
    LineInputA,
    /// The built-in microphone, on the right side of input B, mixed to mono
    InternalMicrophone,
}

/// Analog section power.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogPower {
    /// Normal operation
    Normal,
    /// Analog section powered down
    PowerDown,
}

/// Gain of the main (I²S) input to each mixer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MixerState {
    /// Unity gain
    ZeroDb,
    /// Muted
    Mute,
}

/// First byte of the mixer gain for unity gain.
const MIXER_ZERO_DB: u8 = 0x10;

/// Index of the analog (play-through) gain in each mixer register.
const MIXER_ANALOG_BYTE: usize = 6;

impl<I2C, RST, D, H> Tas3004<I2C, RST, D, H>
where
    I2C: Write,
    RST: OutputPin,
    D: DelayMs<u32>,
    H: Host,
{
    /// Select which analog input goes to the ADC.
    pub fn set_active_input(&mut self, input: InputSource) -> Result<(), Error> {
        const MASK: u8 = acr::ADM_B_MONAURAL | acr::LRB_RIGHT | acr::INPUT_B;
        let value = match input {
            InputSource::LineInputA => 0,
            InputSource::InternalMicrophone => MASK,
        };
        self.update_bits(Register::AnalogControl, value, MASK, WriteMode::All)
    }

    /// Get which analog input goes to the ADC.
    ///
    /// See [`Tas3004::set_active_input`]
    pub fn active_input(&self) -> InputSource {
        if self.shadow.byte(Register::AnalogControl) & acr::INPUT_B == 0 {
            InputSource::LineInputA
        } else {
            InputSource::InternalMicrophone
        }
    }

    /// Power the analog section up or down.
    pub fn set_analog_power(&mut self, power: AnalogPower) -> Result<(), Error> {
        const MASK: u8 = acr::POWER_DOWN;
        let value = match power {
            AnalogPower::Normal => 0,
            AnalogPower::PowerDown => MASK,
        };
        self.update_bits(Register::AnalogControl, value, MASK, WriteMode::All)
    }

    /// Cycle the analog section through power down and back to normal.
    pub fn toggle_analog_power_down_wake(&mut self) -> Result<(), Error> {
        self.set_analog_power(AnalogPower::PowerDown)?;
        self.set_analog_power(AnalogPower::Normal)
    }

    /// Get the analog section power state.
    pub fn analog_power(&self) -> AnalogPower {
        if self.shadow.byte(Register::AnalogControl) & acr::POWER_DOWN == 0 {
            AnalogPower::Normal
        } else {
            AnalogPower::PowerDown
        }
    }

    /// Route the analog input straight to the output, or not.
    ///
    /// Only the analog gain byte of each mixer changes.
    pub fn set_play_through(&mut self, enabled: bool) -> Result<(), Error> {
        let gain = if enabled { MIXER_ZERO_DB } else { 0 };
        self.set_mixer_byte(MIXER_ANALOG_BYTE, gain)
    }

    /// Get whether the analog input is routed straight to the output.
    pub fn play_through(&self) -> bool {
        self.shadow.get(Register::MixerLeftGain)[MIXER_ANALOG_BYTE] != 0
    }

    /// Mute or unmute the main input to both mixers.
    ///
    /// Only the main gain byte of each mixer changes.
    pub fn set_mixer_state(&mut self, state: MixerState) -> Result<(), Error> {
        let gain = match state {
            MixerState::ZeroDb => MIXER_ZERO_DB,
            MixerState::Mute => 0,
        };
        self.set_mixer_byte(0, gain)
    }

    /// Get the codec ready to drive a newly selected output.
    ///
    /// Puts the main input back through the mixers at 0 dB and makes sure the
    /// analog section is powered. Silencing the old output while it switches
    /// is up to the caller, with [`Tas3004::set_mute`] or the amplifier
    /// mutes.
    pub fn prepare_for_output_change(&mut self) -> Result<(), Error> {
        self.set_mixer_state(MixerState::ZeroDb)?;
        self.set_analog_power(AnalogPower::Normal)
    }

    /// Change the sample rate.
    ///
    /// The TAS3004 follows the I²S clocks, so this only checks the rate and
    /// replays the registers so the chip resynchronises.
    pub fn set_sample_rate(&mut self, rate: u32) -> Result<(), Error> {
        if !SUPPORTED_SAMPLE_RATES.contains(&rate) {
            return Err(Error::UnsupportedSampleRate(rate));
        }
        self.initialize()
    }

    /// Change the sample depth to 16 or 24 bits.
    ///
    /// The registers are replayed first, then the word length is set.
    pub fn set_sample_depth(&mut self, depth: u32) -> Result<(), Error> {
        let bits = match depth {
            16 => mcr1::WORD_LENGTH_16,
            24 => mcr1::WORD_LENGTH_24,
            other => return Err(Error::UnsupportedSampleDepth(other)),
        };
        self.initialize()?;
        self.update_bits(
            Register::MainControl1,
            bits,
            mcr1::WORD_LENGTH_MASK,
            WriteMode::ForceAll,
        )
    }

    /// Get the sample depth the shadow of Main Control Register 1 selects.
    pub fn sample_depth(&self) -> u32 {
        match self.shadow.byte(Register::MainControl1) & mcr1::WORD_LENGTH_MASK {
            mcr1::WORD_LENGTH_24 => 24,
            _ => 16,
        }
    }

    /// The host's current sample frame.
    pub fn current_sample_frame(&self) -> u32 {
        self.host.frame_count()
    }

    /// Move the host's sample frame counter. Returns `false` if the host
    /// refused.
    pub fn set_current_sample_frame(&mut self, value: u32) -> bool {
        let accepted = self.host.set_frame_count(value);
        #[cfg(feature = "defmt")]
        if !accepted {
            defmt::warn!("Host refused sample frame {=u32}", value);
        }
        accepted
    }

    fn set_mixer_byte(&mut self, index: usize, value: u8) -> Result<(), Error> {
        for register in [Register::MixerLeftGain, Register::MixerRightGain] {
            let mut gains = [0u8; 9];
            self.shadow.load(register, &mut gains);
            gains[index] = value;
            self.write(register, &gains, WriteMode::All)?;
        }
        Ok(())
    }
}
