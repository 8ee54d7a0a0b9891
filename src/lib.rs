//! # TAS3004 Driver
//!
//! This is driver for the Texas Instruments TAS3004 audio CODEC with built-in
//! DSP equalizer, as found in many PowerPC Macs.
//!
//! Specifically, this driver is for setting the registers in the TAS3004 over
//! I²C - this driver does not handle the digital audio interface (I²S, or
//! similar), although the I²S clocks must be running before the codec is
//! reset.
//!
//! The TAS3004 has the following controls:
//!
//! * Stereo digital volume, from -70 dB to +18 dB in half dB steps, or mute
//! * Seven biquad filters per channel, plus a loudness biquad
//! * Dynamic range compression
//! * Bass and treble
//! * A three-input digital mixer per channel
//! * Two analog inputs (line and microphone), with analog power down
//!
//! The [`Tas3004`] object must cache the register contents because the
//! TAS3004 only has a *write-only* interface and you cannot read back any
//! register contents. Whenever the chip loses its state (a failed bus write,
//! the I²S clock stopping, waking from sleep) the driver pulses the reset line
//! and replays the whole cache.
//!
//! # Example
//!
//! You might setup the codec like this:
//!
//! ```rust
//! # struct I2c;
//! # impl embedded_hal::blocking::i2c::Write for I2c {
//! #     type Error = ();
//! #     fn write(&mut self, _address: u8, _bytes: &[u8]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct Pin;
//! # impl embedded_hal::digital::v2::OutputPin for Pin {
//! #     type Error = ();
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct Delay;
//! # impl embedded_hal::blocking::delay::DelayMs<u32> for Delay {
//! #     fn delay_ms(&mut self, _ms: u32) {}
//! # }
//! let mut codec = tas3004::Tas3004::new(I2c, Pin, Delay, (), tas3004::Config::DEFAULT, &[]);
//! if let Err(e) = codec.start() {
//!     // Codec didn't respond
//! }
//! codec.set_volume(tas3004::UNITY_VOLUME, tas3004::UNITY_VOLUME).unwrap();
//! codec.set_active_input(tas3004::InputSource::LineInputA).unwrap();
//! codec.set_mute(false).unwrap();
//! assert_eq!(codec.volume().left, 141);
//! ```

#![no_std]
#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod coefficients;
pub mod config;
pub mod drc;
pub mod guard;
pub mod interface;
pub mod platform;
pub mod registers;
pub mod shadow;
pub mod tables;

mod codec;

pub use codec::{
    AnalogPower, InitState, InputSource, MixerState, Stream, Tas3004, VolumeState, WriteMode,
    SUPPORTED_SAMPLE_RATES,
};
pub use coefficients::{Biquad, FourDotTwenty};
pub use config::{Config, EqPreset, Timings};
pub use drc::{CompressionRatio, DrcSettings};
pub use interface::BusAddress;
pub use platform::{AmpLine, AmpMute, Host, RecoverySelector};
pub use registers::{LoadMode, Register};
pub use shadow::ShadowRegisters;
pub use tables::{MAXIMUM_TABLE_VOLUME, MINIMUM_VOLUME, UNITY_VOLUME};

//
// Public Types
//

/// Everything that can go wrong talking to the TAS3004.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No TAS3004 register lives at this sub-address
    #[error("no TAS3004 register at sub-address 0x{0:02x}")]
    UnmappedRegister(u8),
    /// The I²C write to this sub-address failed
    #[error("I²C write to TAS3004 sub-address 0x{0:02x} failed")]
    TransportFailure(u8),
    /// Every attempt at replaying the registers failed
    #[error("TAS3004 did not respond after {attempts} initialisation attempts")]
    DeviceUnresponsive {
        /// How many full replays were tried
        attempts: u8,
    },
    /// A register replay is already running
    #[error("TAS3004 initialisation already in progress")]
    Busy,
    /// Only 3:1 compression is available
    #[error("unsupported compression ratio {numerator}:{denominator}")]
    UnsupportedRatio {
        /// Ratio numerator
        numerator: u32,
        /// Ratio denominator
        denominator: u32,
    },
    /// No equalizer preset with this index
    #[error("no equalizer preset {0}")]
    InvalidPresetIndex(usize),
    /// Each channel has seven biquad slots
    #[error("biquad slot {slot} out of range")]
    InvalidBiquadSlot {
        /// The slot that was asked for
        slot: usize,
    },
    /// A filter group needs at least one biquad
    #[error("empty biquad filter group")]
    EmptyFilterGroup,
    /// Only 32 kHz, 44.1 kHz and 48 kHz are supported
    #[error("unsupported sample rate {0} Hz")]
    UnsupportedSampleRate(u32),
    /// Only 16-bit and 24-bit samples are supported
    #[error("unsupported sample depth {0} bits")]
    UnsupportedSampleDepth(u32),
    /// The reset GPIO could not be driven
    #[error("could not drive the TAS3004 reset line")]
    ResetLine,
    /// An amplifier mute GPIO could not be driven
    #[error("could not drive the {0:?} mute line")]
    MuteLine(AmpLine),
}
