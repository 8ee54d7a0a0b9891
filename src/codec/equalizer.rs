//! Biquad filters, equalizer presets and dynamic range compression.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use embedded_hal::digital::v2::OutputPin;

use super::{Tas3004, WriteMode};
use crate::coefficients::{Biquad, UNITY_BIQUAD};
use crate::drc::{self, DrcSettings};
use crate::platform::Host;
use crate::registers::{mcr2, Register, BIQUADS_PER_CHANNEL, LEFT_BIQUADS, RIGHT_BIQUADS};
use crate::tables;
use crate::Error;

/// Which channel a biquad goes to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stream {
    /// Just the left channel
    Left,
    /// Just the right channel
    Right,
    /// The same slot on both channels
    Stereo,
}

/// How many of `count` filters go to the left channel.
fn left_share(count: usize) -> usize {
    count.div_ceil(2)
}

/// Check a filter group fits the biquad slots, before anything is written.
fn check_group(filters: &[Biquad]) -> Result<(), Error> {
    if filters.is_empty() {
        return Err(Error::EmptyFilterGroup);
    }
    let left = left_share(filters.len());
    if left > BIQUADS_PER_CHANNEL {
        return Err(Error::InvalidBiquadSlot { slot: left - 1 });
    }
    Ok(())
}

impl<I2C, RST, D, H> Tas3004<I2C, RST, D, H>
where
    I2C: Write,
    RST: OutputPin,
    D: DelayMs<u32>,
    H: Host,
{
    /// Write one biquad into `slot` (0 to 6) of the given channel.
    ///
    /// The DSP only accepts biquads in fast load mode. This does not change
    /// the load mode for you; [`Tas3004::set_biquad_group`] does.
    pub fn set_output_biquad(&mut self, stream: Stream, slot: usize, biquad: &Biquad) -> Result<(), Error> {
        if slot >= BIQUADS_PER_CHANNEL {
            return Err(Error::InvalidBiquadSlot { slot });
        }
        let bytes = biquad.to_bytes();
        if matches!(stream, Stream::Left | Stream::Stereo) {
            self.write(LEFT_BIQUADS[slot], &bytes, WriteMode::All)?;
        }
        if matches!(stream, Stream::Right | Stream::Stereo) {
            self.write(RIGHT_BIQUADS[slot], &bytes, WriteMode::All)?;
        }
        Ok(())
    }

    /// Load a group of biquads: the first half (rounded up) into the left
    /// channel slots, the rest into the right channel slots.
    ///
    /// The filters are bypassed while they load, and the bypass is only
    /// lifted once every slot has been written. Slots past the end of the
    /// group keep their old coefficients.
    pub fn set_biquad_group(&mut self, filters: &[Biquad]) -> Result<(), Error> {
        check_group(filters)?;
        let (left, right) = filters.split_at(left_share(filters.len()));

        self.set_filter_bypass(true, WriteMode::All)?;
        self.with_fast_load(|codec| {
            for (slot, biquad) in left.iter().enumerate() {
                codec.set_output_biquad(Stream::Left, slot, biquad)?;
            }
            for (slot, biquad) in right.iter().enumerate() {
                codec.set_output_biquad(Stream::Right, slot, biquad)?;
            }
            Ok(())
        })?;
        self.set_filter_bypass(false, WriteMode::All)
    }

    /// Switch to equalizer preset `index`.
    ///
    /// The output is muted on the chip (the cached volume is untouched) for
    /// the volume ramp time while the filters and compression change, then
    /// the cached volume is put back. If the new compression settings lower
    /// [`Tas3004::maximum_volume`] below it, the lowered volume is what goes
    /// back. With
    /// [`Config::custom_eq_enabled`](crate::Config::custom_eq_enabled) off,
    /// only the mute and restore happen.
    pub fn load_equalizer_preset(&mut self, index: usize) -> Result<(), Error> {
        let preset = *self
            .presets
            .get(index)
            .ok_or(Error::InvalidPresetIndex(index))?;
        if self.config.custom_eq_enabled {
            check_group(preset.filters)?;
            preset.drc.validate()?;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("Loading TAS3004 equalizer preset {=usize}", index);

        self.write(
            Register::Volume,
            &tables::volume_register(0, 0),
            WriteMode::HardwareOnly,
        )?;
        self.delay.delay_ms(self.config.timings.volume_ramp_ms);

        let loaded = if self.config.custom_eq_enabled {
            self.set_biquad_group(preset.filters)
                .and_then(|()| self.program_drc(&preset.drc))
        } else {
            Ok(())
        };

        let restored = if self.recompute_max_volume() && !self.volume.muted {
            self.write_cached_volume()
        } else {
            let mut volume = [0u8; 6];
            self.shadow.load(Register::Volume, &mut volume);
            self.write(Register::Volume, &volume, WriteMode::HardwareOnly)
        };
        loaded.and(restored)
    }

    /// Flatten the equalizer: bypass the filters, load the unity biquad into
    /// every left and right slot and turn compression off.
    pub fn disable_equalizer(&mut self) -> Result<(), Error> {
        self.set_filter_bypass(true, WriteMode::ForceAll)?;
        let unity = UNITY_BIQUAD.to_bytes();
        self.with_fast_load(|codec| {
            for (left, right) in LEFT_BIQUADS.iter().zip(RIGHT_BIQUADS.iter()) {
                codec.write(*left, &unity, WriteMode::All)?;
                codec.write(*right, &unity, WriteMode::All)?;
            }
            Ok(())
        })?;
        self.set_drc(&drc::DISABLED)
    }

    /// Program the dynamic range compressor.
    ///
    /// The cached settings, and so [`Tas3004::maximum_volume`], follow
    /// `settings` once they pass validation, even if the bus write then
    /// fails. The shadow register already holds them and the next replay
    /// will send them.
    ///
    /// If the new maximum is below the current volume, the volume is lowered
    /// to it and, unless muted, written to the chip.
    pub fn set_drc(&mut self, settings: &DrcSettings) -> Result<(), Error> {
        settings.validate()?;
        let written = self.program_drc(settings);
        let refreshed = self.refresh_max_volume();
        written.and(refreshed)
    }

    /// The cached compression settings.
    pub fn drc(&self) -> DrcSettings {
        self.drc
    }

    /// Write the compressor register and cache already validated
    /// `settings`, leaving the volume alone.
    fn program_drc(&mut self, settings: &DrcSettings) -> Result<(), Error> {
        let written = self.write(
            Register::DynamicRange,
            &settings.to_register(),
            WriteMode::ForceAll,
        );
        self.drc = *settings;
        written
    }

    /// Whether the biquad filters are bypassed.
    pub fn filters_bypassed(&self) -> bool {
        self.shadow.byte(Register::MainControl2) & mcr2::ALL_PASS != 0
    }

    fn set_filter_bypass(&mut self, bypass: bool, mode: WriteMode) -> Result<(), Error> {
        const MASK: u8 = mcr2::ALL_PASS;
        self.update_bits(
            Register::MainControl2,
            if bypass { MASK } else { 0 },
            MASK,
            mode,
        )
    }
}
