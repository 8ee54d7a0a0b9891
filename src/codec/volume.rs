//! Digital volume and mute.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use super::{Tas3004, WriteMode};
use crate::platform::Host;
use crate::registers::Register;
use crate::tables;
use crate::Error;

/// The cached volume, as indices into the volume table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeState {
    /// Left channel volume index
    pub left: u32,
    /// Right channel volume index
    pub right: u32,
    /// Whether the output is muted
    pub muted: bool,
}

impl<I2C, RST, D, H> Tas3004<I2C, RST, D, H>
where
    I2C: Write,
    RST: OutputPin,
    D: DelayMs<u32>,
    H: Host,
{
    /// Set the volume of each channel, as an index into the volume table.
    ///
    /// Index 0 is silence, 1 is -70 dB and each step is +0.5 dB. Values above
    /// [`Tas3004::maximum_volume`] are clamped. While muted the new volume is
    /// only remembered; it reaches the chip on unmute.
    pub fn set_volume(&mut self, left: u32, right: u32) -> Result<(), Error> {
        self.volume.left = left.min(self.max_volume);
        self.volume.right = right.min(self.max_volume);
        if self.volume.muted {
            return Ok(());
        }
        self.write_cached_volume()
    }

    /// Mute or unmute both channels.
    ///
    /// Muting writes zero gain; unmuting restores the cached volume.
    pub fn set_mute(&mut self, muted: bool) -> Result<(), Error> {
        self.volume.muted = muted;
        if muted {
            self.write_volume(0, 0)
        } else {
            self.write_cached_volume()
        }
    }

    /// The cached volume and mute state.
    pub fn volume(&self) -> VolumeState {
        self.volume
    }

    /// Whether the output is muted.
    pub fn is_muted(&self) -> bool {
        self.volume.muted
    }

    /// The lowest volume index.
    pub fn minimum_volume(&self) -> u32 {
        tables::MINIMUM_VOLUME
    }

    /// The highest volume index allowed with the current compression
    /// settings.
    pub fn maximum_volume(&self) -> u32 {
        self.max_volume
    }

    /// [`Tas3004::minimum_volume`] in dB, as 16.16 fixed point.
    ///
    /// Index 0 is reported as -70.5 dB, although it is really silence.
    pub fn minimum_db_volume(&self) -> i32 {
        tables::db_for_index(tables::MINIMUM_VOLUME)
    }

    /// [`Tas3004::maximum_volume`] in dB, as 16.16 fixed point.
    pub fn maximum_db_volume(&self) -> i32 {
        tables::db_for_index(self.max_volume)
    }

    /// Work out the highest volume index from the compression settings and
    /// pull the cached volume down to it.
    ///
    /// Returns `true` if the cached volume had to come down.
    pub(super) fn recompute_max_volume(&mut self) -> bool {
        self.max_volume = tables::UNITY_VOLUME
            .saturating_add(self.drc.maximum_volume)
            .min(tables::MAXIMUM_TABLE_VOLUME);
        let left = self.volume.left.min(self.max_volume);
        let right = self.volume.right.min(self.max_volume);
        let lowered = (left, right) != (self.volume.left, self.volume.right);
        self.volume.left = left;
        self.volume.right = right;
        lowered
    }

    /// As `recompute_max_volume`, then send a lowered volume to the chip
    /// unless muted.
    pub(super) fn refresh_max_volume(&mut self) -> Result<(), Error> {
        if self.recompute_max_volume() && !self.volume.muted {
            #[cfg(feature = "defmt")]
            defmt::info!(
                "TAS3004 volume lowered to {=u32}/{=u32}",
                self.volume.left,
                self.volume.right
            );
            self.write_cached_volume()
        } else {
            Ok(())
        }
    }

    pub(super) fn write_cached_volume(&mut self) -> Result<(), Error> {
        self.write_volume(
            tables::gain_for_index(self.volume.left),
            tables::gain_for_index(self.volume.right),
        )
    }

    fn write_volume(&mut self, left_gain: u32, right_gain: u32) -> Result<(), Error> {
        self.write(
            Register::Volume,
            &tables::volume_register(left_gain, right_gain),
            WriteMode::All,
        )
    }
}
