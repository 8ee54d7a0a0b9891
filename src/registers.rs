//! The TAS3004 register map.
//!
//! Every addressable register has exactly one [`RegisterDescriptor`] in
//! [`REGISTER_MAP`]. The shadow store and the replay engine index registers
//! through that table rather than switching on the address.

//
// Public Types
//

/// The set of registers in the TAS3004.
///
/// The discriminant is the sub-address sent on the I²C bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Main Control Register 1: load mode, serial clock, serial format, word length
    MainControl1 = 0x01,
    /// Dynamic Range Compression control
    DynamicRange = 0x02,
    /// Left and right volume, 24 bits each
    Volume = 0x04,
    /// Treble control
    Treble = 0x05,
    /// Bass control
    Bass = 0x06,
    /// Left output mixer gains (main, call progress, analog)
    MixerLeftGain = 0x07,
    /// Right output mixer gains (main, call progress, analog)
    MixerRightGain = 0x08,
    /// Left channel biquad 0
    LeftBiquad0 = 0x0A,
    /// Left channel biquad 1
    LeftBiquad1 = 0x0B,
    /// Left channel biquad 2
    LeftBiquad2 = 0x0C,
    /// Left channel biquad 3
    LeftBiquad3 = 0x0D,
    /// Left channel biquad 4
    LeftBiquad4 = 0x0E,
    /// Left channel biquad 5
    LeftBiquad5 = 0x0F,
    /// Left channel biquad 6
    LeftBiquad6 = 0x10,
    /// Right channel biquad 0
    RightBiquad0 = 0x13,
    /// Right channel biquad 1
    RightBiquad1 = 0x14,
    /// Right channel biquad 2
    RightBiquad2 = 0x15,
    /// Right channel biquad 3
    RightBiquad3 = 0x16,
    /// Right channel biquad 4
    RightBiquad4 = 0x17,
    /// Right channel biquad 5
    RightBiquad5 = 0x18,
    /// Right channel biquad 6
    RightBiquad6 = 0x19,
    /// Left loudness biquad
    LeftLoudnessBiquad = 0x21,
    /// Right loudness biquad
    RightLoudnessBiquad = 0x22,
    /// Left loudness biquad gain
    LeftLoudnessGain = 0x23,
    /// Right loudness biquad gain
    RightLoudnessGain = 0x24,
    /// Analog Control Register: input select, de-emphasis, analog power-down
    AnalogControl = 0x40,
    /// Main Control Register 2: filter bypass, bass/treble download
    MainControl2 = 0x43,
}

/// Static description of one register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Which register this describes
    pub register: Register,
    /// How many data bytes the register holds
    pub width: usize,
}

/// The DSP load mode, selected by the FL bit of Main Control Register 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadMode {
    /// DSP running. Required for every register except the biquads.
    Normal,
    /// DSP paused so biquad coefficients can be loaded without instability.
    Fast,
}

//
// Public Data
//

/// Number of registers in the TAS3004.
pub const NUM_REGISTERS: usize = 27;

/// The widest register (a biquad: five three-byte coefficients).
pub const MAX_REGISTER_WIDTH: usize = 15;

/// Number of equalizer biquads per channel.
pub const BIQUADS_PER_CHANNEL: usize = 7;

/// Every register, with its width.
pub const REGISTER_MAP: [RegisterDescriptor; NUM_REGISTERS] = [
    desc(Register::MainControl1, 1),
    desc(Register::DynamicRange, 6),
    desc(Register::Volume, 6),
    desc(Register::Treble, 1),
    desc(Register::Bass, 1),
    desc(Register::MixerLeftGain, 9),
    desc(Register::MixerRightGain, 9),
    desc(Register::LeftBiquad0, 15),
    desc(Register::LeftBiquad1, 15),
    desc(Register::LeftBiquad2, 15),
    desc(Register::LeftBiquad3, 15),
    desc(Register::LeftBiquad4, 15),
    desc(Register::LeftBiquad5, 15),
    desc(Register::LeftBiquad6, 15),
    desc(Register::RightBiquad0, 15),
    desc(Register::RightBiquad1, 15),
    desc(Register::RightBiquad2, 15),
    desc(Register::RightBiquad3, 15),
    desc(Register::RightBiquad4, 15),
    desc(Register::RightBiquad5, 15),
    desc(Register::RightBiquad6, 15),
    desc(Register::LeftLoudnessBiquad, 15),
    desc(Register::RightLoudnessBiquad, 15),
    desc(Register::LeftLoudnessGain, 3),
    desc(Register::RightLoudnessGain, 3),
    desc(Register::AnalogControl, 1),
    desc(Register::MainControl2, 1),
];

/// Left channel equalizer biquads, in slot order.
pub const LEFT_BIQUADS: [Register; BIQUADS_PER_CHANNEL] = [
    Register::LeftBiquad0,
    Register::LeftBiquad1,
    Register::LeftBiquad2,
    Register::LeftBiquad3,
    Register::LeftBiquad4,
    Register::LeftBiquad5,
    Register::LeftBiquad6,
];

/// Right channel equalizer biquads, in slot order.
pub const RIGHT_BIQUADS: [Register; BIQUADS_PER_CHANNEL] = [
    Register::RightBiquad0,
    Register::RightBiquad1,
    Register::RightBiquad2,
    Register::RightBiquad3,
    Register::RightBiquad4,
    Register::RightBiquad5,
    Register::RightBiquad6,
];

/// The order in which a full re-initialisation replays the shadow registers,
/// and the load mode each must be written in.
///
/// Main Control Register 1 is not listed: the replay routine drives it to
/// switch load modes and restores it as the very last write.
pub const INIT_SEQUENCE: [(Register, LoadMode); 26] = [
    (Register::LeftBiquad0, LoadMode::Fast),
    (Register::LeftBiquad1, LoadMode::Fast),
    (Register::LeftBiquad2, LoadMode::Fast),
    (Register::LeftBiquad3, LoadMode::Fast),
    (Register::LeftBiquad4, LoadMode::Fast),
    (Register::LeftBiquad5, LoadMode::Fast),
    (Register::LeftBiquad6, LoadMode::Fast),
    (Register::RightBiquad0, LoadMode::Fast),
    (Register::RightBiquad1, LoadMode::Fast),
    (Register::RightBiquad2, LoadMode::Fast),
    (Register::RightBiquad3, LoadMode::Fast),
    (Register::RightBiquad4, LoadMode::Fast),
    (Register::RightBiquad5, LoadMode::Fast),
    (Register::RightBiquad6, LoadMode::Fast),
    (Register::LeftLoudnessBiquad, LoadMode::Fast),
    (Register::RightLoudnessBiquad, LoadMode::Fast),
    (Register::DynamicRange, LoadMode::Normal),
    (Register::Volume, LoadMode::Normal),
    (Register::Treble, LoadMode::Normal),
    (Register::Bass, LoadMode::Normal),
    (Register::MixerLeftGain, LoadMode::Normal),
    (Register::MixerRightGain, LoadMode::Normal),
    (Register::LeftLoudnessGain, LoadMode::Normal),
    (Register::RightLoudnessGain, LoadMode::Normal),
    (Register::AnalogControl, LoadMode::Normal),
    (Register::MainControl2, LoadMode::Normal),
];

/// Main Control Register 1 bit fields.
pub mod mcr1 {
    /// Fast load mode
    pub const FAST_LOAD: u8 = 1 << 7;
    /// Serial clock is 64 fs (otherwise 32 fs)
    pub const SCLK_64FS: u8 = 1 << 6;
    /// Serial port format field
    pub const FORMAT_MASK: u8 = 0b11 << 4;
    /// I²S serial format
    pub const FORMAT_I2S: u8 = 0b10 << 4;
    /// Serial word length field
    pub const WORD_LENGTH_MASK: u8 = 0b11;
    /// 16-bit words
    pub const WORD_LENGTH_16: u8 = 0b00;
    /// 24-bit words (carried in the 20-bit slot)
    pub const WORD_LENGTH_24: u8 = 0b10;
}

/// Main Control Register 2 bit fields.
pub mod mcr2 {
    /// Bass/treble download
    pub const BASS_TREBLE_DOWNLOAD: u8 = 1 << 7;
    /// All-pass: bypass the equalizer biquads
    pub const ALL_PASS: u8 = 1 << 1;
}

/// Analog Control Register bit fields.
pub mod acr {
    /// Analog input mode: input B used as two monaural inputs
    pub const ADM_B_MONAURAL: u8 = 1 << 7;
    /// Monaural source is the right input
    pub const LRB_RIGHT: u8 = 1 << 6;
    /// De-emphasis field
    pub const DEEMPHASIS_MASK: u8 = 0b11 << 3;
    /// Select analog input B (otherwise A)
    pub const INPUT_B: u8 = 1 << 2;
    /// Analog power down
    pub const POWER_DOWN: u8 = 1 << 0;
}

//
// Private Functions
//

const fn desc(register: Register, width: usize) -> RegisterDescriptor {
    RegisterDescriptor { register, width }
}

//
// impls on Public Types
//

impl Register {
    /// Look up a register by its bus sub-address.
    pub fn from_address(address: u8) -> Option<Register> {
        REGISTER_MAP
            .iter()
            .map(|d| d.register)
            .find(|r| r.address() == address)
    }

    /// The sub-address sent on the bus.
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// This register's position in [`REGISTER_MAP`].
    pub const fn slot(self) -> usize {
        let mut idx = 0;
        while idx < NUM_REGISTERS {
            if REGISTER_MAP[idx].register as u8 == self as u8 {
                return idx;
            }
            idx += 1;
        }
        // Every variant appears in the map; checked by the tests below.
        0
    }

    /// This register's descriptor.
    pub const fn descriptor(self) -> RegisterDescriptor {
        REGISTER_MAP[self.slot()]
    }

    /// How many data bytes this register holds.
    pub const fn width(self) -> usize {
        self.descriptor().width
    }

    /// Whether this register holds biquad coefficients and so must only be
    /// loaded in [`LoadMode::Fast`].
    pub fn is_biquad(self) -> bool {
        LEFT_BIQUADS.contains(&self)
            || RIGHT_BIQUADS.contains(&self)
            || self == Register::LeftLoudnessBiquad
            || self == Register::RightLoudnessBiquad
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg.address()
    }
}

impl LoadMode {
    /// Apply this load mode to a Main Control Register 1 value, keeping every
    /// other bit.
    pub const fn apply(self, mcr1_value: u8) -> u8 {
        match self {
            LoadMode::Normal => mcr1_value & !mcr1::FAST_LOAD,
            LoadMode::Fast => mcr1_value | mcr1::FAST_LOAD,
        }
    }

    /// Read the load mode out of a Main Control Register 1 value.
    pub const fn of(mcr1_value: u8) -> LoadMode {
        if mcr1_value & mcr1::FAST_LOAD != 0 {
            LoadMode::Fast
        } else {
            LoadMode::Normal
        }
    }
}
