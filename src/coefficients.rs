//! Biquad filter coefficients in the TAS3004's 4.20 fixed-point format.

//
// Public Types
//

/// One filter coefficient: a signed 4.20 fixed-point number, sent
/// most-significant byte first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FourDotTwenty(pub [u8; 3]);

/// One biquad section: `b0, b1, b2, a1, a2`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Biquad(pub [FourDotTwenty; COEFFICIENTS_PER_BIQUAD]);

//
// Public Data
//

/// Each biquad has five coefficients.
pub const COEFFICIENTS_PER_BIQUAD: usize = 5;

/// Bytes in one biquad register.
pub const BIQUAD_BYTES: usize = COEFFICIENTS_PER_BIQUAD * 3;

/// 1.0 in 4.20 format.
pub const UNITY: FourDotTwenty = FourDotTwenty([0x10, 0x00, 0x00]);

/// Unity gain, all-pass: `b0 = 1.0`, everything else zero.
pub const UNITY_BIQUAD: Biquad = Biquad([
    UNITY,
    FourDotTwenty([0; 3]),
    FourDotTwenty([0; 3]),
    FourDotTwenty([0; 3]),
    FourDotTwenty([0; 3]),
]);

//
// Private Data
//

const FRACTION_BITS: u32 = 20;
const MAX_RAW: i32 = 0x7F_FFFF;
const MIN_RAW: i32 = -0x80_0000;

//
// impls on Public Types
//

impl FourDotTwenty {
    /// Build from the raw signed 24-bit value. Bits above 24 are discarded.
    pub const fn from_raw(raw: i32) -> FourDotTwenty {
        let bytes = raw.to_be_bytes();
        FourDotTwenty([bytes[1], bytes[2], bytes[3]])
    }

    /// The raw signed 24-bit value.
    pub const fn raw(self) -> i32 {
        let [a, b, c] = self.0;
        // Sign extend from 24 bits
        (i32::from_be_bytes([a, b, c, 0])) >> 8
    }

    /// Convert a float to 4.20, rounding to nearest and saturating at the
    /// ends of the representable range (just under ±8.0).
    pub fn from_f32(value: f32) -> FourDotTwenty {
        let scaled = value * (1u32 << FRACTION_BITS) as f32;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        // `as` saturates, and maps NaN to zero
        let raw = (rounded as i32).clamp(MIN_RAW, MAX_RAW);
        FourDotTwenty::from_raw(raw)
    }

    /// Convert back to a float.
    pub fn to_f32(self) -> f32 {
        self.raw() as f32 / (1u32 << FRACTION_BITS) as f32
    }
}

impl Biquad {
    /// Build a biquad from float coefficients `[b0, b1, b2, a1, a2]`.
    pub fn from_f32(coefficients: [f32; COEFFICIENTS_PER_BIQUAD]) -> Biquad {
        Biquad(coefficients.map(FourDotTwenty::from_f32))
    }

    /// The register image of this biquad.
    pub fn to_bytes(&self) -> [u8; BIQUAD_BYTES] {
        let mut out = [0u8; BIQUAD_BYTES];
        for (chunk, coefficient) in out.chunks_exact_mut(3).zip(self.0.iter()) {
            chunk.copy_from_slice(&coefficient.0);
        }
        out
    }
}
