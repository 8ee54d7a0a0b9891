//! Dynamic Range Compression settings and their register encoding.

use crate::Error;

//
// Public Types
//

/// A compression ratio, `numerator : denominator`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompressionRatio {
    /// Input level change
    pub numerator: u32,
    /// Output level change
    pub denominator: u32,
}

/// Dynamic Range Compression settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrcSettings {
    /// Compression ratio above the threshold. Only [`SUPPORTED_RATIO`] is
    /// implemented by the hardware.
    pub ratio: CompressionRatio,
    /// Threshold in dB × 1000. Valid range is 0 (0.0 dB) down to -90000
    /// (-90.0 dB); values outside are clipped.
    pub threshold: i32,
    /// Extra volume indices made available above the base maximum volume.
    pub maximum_volume: u32,
    /// Whether compression is active
    pub enabled: bool,
}

//
// Public Data
//

/// The one compression curve the TAS3004 implements.
pub const SUPPORTED_RATIO: CompressionRatio = CompressionRatio {
    numerator: 3,
    denominator: 1,
};

/// Highest threshold, in dB × 1000.
pub const THRESHOLD_MAX: i32 = 0;

/// Lowest threshold, in dB × 1000.
pub const THRESHOLD_MIN: i32 = -90_000;

/// Compression disabled, 0 dB threshold, no extra headroom.
pub const DISABLED: DrcSettings = DrcSettings {
    ratio: SUPPORTED_RATIO,
    threshold: THRESHOLD_MAX,
    maximum_volume: 0,
    enabled: false,
};

/// Bytes in the DRC register.
pub const DRC_REGISTER_BYTES: usize = 6;

//
// Private Data
//

/// Byte 0: compression above threshold
const ABOVE_THRESHOLD_3_TO_1: u8 = 0x50;
const ABOVE_THRESHOLD_DISABLED: u8 = 0x51;
/// Byte 1: compression below threshold
const BELOW_THRESHOLD_1_TO_1: u8 = 0x02;
/// Byte 2: hardware threshold value for 0.0 dB
const UNITY_THRESHOLD: i32 = 0xEF;
/// Bytes 3 to 5: energy integration, attack and decay time constants
const INTEGRATION: u8 = 0xB0;
const ATTACK: u8 = 0x60;
const DECAY: u8 = 0xA0;

/// Two hardware counts per 0.75 dB step.
const COUNTS_PER_STEP: i32 = 2;
const STEP_SIZE: i32 = 750;

//
// impls on Public Types
//

impl DrcSettings {
    /// Check these settings can be programmed into the hardware.
    pub fn validate(&self) -> Result<(), Error> {
        if self.ratio != SUPPORTED_RATIO {
            return Err(Error::UnsupportedRatio {
                numerator: self.ratio.numerator,
                denominator: self.ratio.denominator,
            });
        }
        Ok(())
    }

    /// The hardware threshold step for these settings.
    ///
    /// The hardware counts down two steps for every 0.75 dB below 0 dB, from
    /// `0xEF` at 0 dB. The bottom of the range is clipped at zero.
    pub fn threshold_register(&self) -> u8 {
        let threshold = self.threshold.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
        let value = UNITY_THRESHOLD + COUNTS_PER_STEP * (threshold / STEP_SIZE);
        value.clamp(0, UNITY_THRESHOLD) as u8
    }

    /// The full register image for these settings.
    pub fn to_register(&self) -> [u8; DRC_REGISTER_BYTES] {
        [
            if self.enabled {
                ABOVE_THRESHOLD_3_TO_1
            } else {
                ABOVE_THRESHOLD_DISABLED
            },
            BELOW_THRESHOLD_1_TO_1,
            self.threshold_register(),
            INTEGRATION,
            ATTACK,
            DECAY,
        ]
    }
}

impl Default for DrcSettings {
    fn default() -> Self {
        DISABLED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_to_one_is_accepted() {
        assert!(DISABLED.validate().is_ok());
        let two_to_one = DrcSettings {
            ratio: CompressionRatio {
                numerator: 2,
                denominator: 1,
            },
            ..DISABLED
        };
        assert_eq!(
            two_to_one.validate(),
            Err(Error::UnsupportedRatio {
                numerator: 2,
                denominator: 1
            })
        );
    }

    #[test]
    fn threshold_steps() {
        let at = |threshold| DrcSettings {
            threshold,
            ..DISABLED
        };
        assert_eq!(at(0).threshold_register(), 0xEF);
        assert_eq!(at(-750).threshold_register(), 0xED);
        assert_eq!(at(-1499).threshold_register(), 0xED);
        assert_eq!(at(-30_000).threshold_register(), 0xEF - 80);
        // Clipped at both ends
        assert_eq!(at(6_000).threshold_register(), 0xEF);
        assert_eq!(at(-90_000).threshold_register(), 0x00);
        assert_eq!(at(i32::MIN).threshold_register(), 0x00);
    }

    #[test]
    fn register_image() {
        let enabled = DrcSettings {
            threshold: -15_000,
            enabled: true,
            ..DISABLED
        };
        assert_eq!(
            enabled.to_register(),
            [0x50, 0x02, 0xEF - 40, 0xB0, 0x60, 0xA0]
        );
        assert_eq!(DISABLED.to_register()[0], 0x51);
    }
}
