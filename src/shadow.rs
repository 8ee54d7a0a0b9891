//! The shadow register store.
//!
//! The TAS3004 cannot be read back over I²C, so the driver keeps the last
//! value accepted for every register here.

use crate::coefficients::UNITY_BIQUAD;
use crate::drc;
use crate::registers::{acr, mcr1, mcr2, Register, MAX_REGISTER_WIDTH, NUM_REGISTERS};

//
// Public Types
//

/// One byte buffer per register, sized to the widest register.
///
/// Only the first [`Register::width`] bytes of each buffer are meaningful;
/// the rest are kept at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRegisters {
    cache: [[u8; MAX_REGISTER_WIDTH]; NUM_REGISTERS],
}

//
// Public Data
//

/// Treble and bass at 0.0 dB.
pub const TONE_UNITY: u8 = 0x72;

/// A mixer register with the main input at unity and the call-progress and
/// analog play-through inputs muted.
pub const MIXER_DEFAULT: [u8; 9] = [0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Main Control Register 1 after reset: normal load, 64 fs, I²S, 16-bit.
pub const MCR1_DEFAULT: u8 = mcr1::SCLK_64FS | mcr1::FORMAT_I2S | mcr1::WORD_LENGTH_16;

//
// impls on Public Types
//

impl ShadowRegisters {
    /// Create a store holding the driver's power-on programme.
    pub fn new() -> ShadowRegisters {
        let mut shadow = ShadowRegisters {
            cache: [[0u8; MAX_REGISTER_WIDTH]; NUM_REGISTERS],
        };
        shadow.set_register_defaults();
        shadow
    }

    /// Resets every register to the driver's power-on programme.
    ///
    /// Volume starts muted, tone controls flat, every biquad unity all-pass
    /// with the filters bypassed, compression off and the analog section
    /// powered down.
    pub fn set_register_defaults(&mut self) {
        self.store(Register::MainControl1, &[MCR1_DEFAULT]);
        self.store(Register::DynamicRange, &drc::DISABLED.to_register());
        self.store(Register::Volume, &[0; 6]);
        self.store(Register::Treble, &[TONE_UNITY]);
        self.store(Register::Bass, &[TONE_UNITY]);
        self.store(Register::MixerLeftGain, &MIXER_DEFAULT);
        self.store(Register::MixerRightGain, &MIXER_DEFAULT);
        let unity = UNITY_BIQUAD.to_bytes();
        for register in crate::registers::REGISTER_MAP
            .iter()
            .map(|d| d.register)
            .filter(|r| r.is_biquad())
        {
            self.store(register, &unity);
        }
        self.store(Register::LeftLoudnessGain, &[0; 3]);
        self.store(Register::RightLoudnessGain, &[0; 3]);
        self.store(Register::AnalogControl, &[acr::POWER_DOWN]);
        self.store(Register::MainControl2, &[mcr2::ALL_PASS]);
    }

    /// Overwrite the shadow of `register`.
    ///
    /// Takes at most [`Register::width`] bytes from `data`; if `data` is
    /// shorter, the remainder of the register is zeroed.
    pub fn store(&mut self, register: Register, data: &[u8]) {
        let width = register.width();
        let slot = &mut self.cache[register.slot()];
        let count = data.len().min(width);
        slot[..count].copy_from_slice(&data[..count]);
        slot[count..].fill(0);
    }

    /// The shadow of `register`, exactly [`Register::width`] bytes long.
    pub fn get(&self, register: Register) -> &[u8] {
        &self.cache[register.slot()][..register.width()]
    }

    /// Copy the shadow of `register` into `buffer`, up to the register width.
    ///
    /// Returns the number of bytes copied.
    pub fn load(&self, register: Register, buffer: &mut [u8]) -> usize {
        let value = self.get(register);
        let count = buffer.len().min(value.len());
        buffer[..count].copy_from_slice(&value[..count]);
        count
    }

    /// The single byte of a one-byte register (or the first byte of a wider one).
    pub fn byte(&self, register: Register) -> u8 {
        self.cache[register.slot()][0]
    }
}

impl Default for ShadowRegisters {
    fn default() -> Self {
        ShadowRegisters::new()
    }
}
