//! Driver configuration: bus address, settle times, retry budget and the
//! equalizer preset table.

use crate::coefficients::Biquad;
use crate::drc::DrcSettings;
use crate::interface::BusAddress;

//
// Public Types
//

/// Fixed hardware settle times, in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timings {
    /// Reset line held in "run" before the reset pulse
    pub reset_setup_ms: u32,
    /// Reset line held in "reset"
    pub reset_hold_ms: u32,
    /// Bus kept quiet after reset is released
    pub reset_release_ms: u32,
    /// Wait for the volume to ramp down before loading new equalizer filters
    pub volume_ramp_ms: u32,
    /// Wait after muting the amplifiers for sleep
    pub amp_mute_ms: u32,
    /// Wait after the first register replay at start up
    pub post_init_ms: u32,
}

/// Driver configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Which I²C address the codec answers on
    pub bus_address: BusAddress,
    /// Settle times
    pub timings: Timings,
    /// How many times the full register replay is attempted before the
    /// codec is declared unresponsive
    pub max_init_attempts: u8,
    /// If false, selecting an equalizer preset leaves the filters and
    /// compression alone
    pub custom_eq_enabled: bool,
}

/// One equalizer preset: the filters for both channels, and the compression
/// to use with them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EqPreset {
    /// Up to fourteen biquads. The first half (rounded up) are loaded into
    /// the left channel, the rest into the right channel.
    pub filters: &'static [Biquad],
    /// Compression to apply with this preset
    pub drc: DrcSettings,
}

//
// Public Data
//

impl Timings {
    /// Settle times for real hardware.
    pub const DEFAULT: Timings = Timings {
        reset_setup_ms: 5,
        reset_hold_ms: 20,
        reset_release_ms: 10,
        volume_ramp_ms: 30,
        amp_mute_ms: 50,
        post_init_ms: 1,
    };

    /// No waiting at all, for tests and simulators.
    pub const ZERO: Timings = Timings {
        reset_setup_ms: 0,
        reset_hold_ms: 0,
        reset_release_ms: 0,
        volume_ramp_ms: 0,
        amp_mute_ms: 0,
        post_init_ms: 0,
    };
}

impl Config {
    /// CS pin high, hardware timings, five replay attempts, custom
    /// equalizer enabled.
    pub const DEFAULT: Config = Config {
        bus_address: BusAddress::CsHigh,
        timings: Timings::DEFAULT,
        max_init_attempts: 5,
        custom_eq_enabled: true,
    };
}

impl Default for Timings {
    fn default() -> Self {
        Timings::DEFAULT
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::DEFAULT
    }
}
