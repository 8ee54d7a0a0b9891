//! Volume index to hardware gain translation.
//!
//! Index 0 is mute. Index 1 is -70.0 dB and each further index adds 0.5 dB,
//! so [`UNITY_VOLUME`] (index 141) is 0.0 dB and the top of the table is
//! +18.0 dB. Gains are unsigned 8.16 fixed point, three bytes per channel.

//
// Public Data
//

/// Number of entries in [`VOLUME_TABLE`].
pub const VOLUME_STEPS: usize = 178;

/// Lowest volume index (mute).
pub const MINIMUM_VOLUME: u32 = 0;

/// The index of 0.0 dB. This is the maximum volume when Dynamic Range
/// Compression grants no extra headroom.
pub const UNITY_VOLUME: u32 = 141;

/// Highest index in the table.
pub const MAXIMUM_TABLE_VOLUME: u32 = (VOLUME_STEPS - 1) as u32;

/// Hardware gain word for each volume index.
pub static VOLUME_TABLE: [u32; VOLUME_STEPS] = [
    0x000000, 0x000015, 0x000016, 0x000017, 0x000019, 0x00001A, 0x00001C, 0x00001D,
    0x00001F, 0x000021, 0x000023, 0x000025, 0x000027, 0x000029, 0x00002C, 0x00002E,
    0x000031, 0x000034, 0x000037, 0x00003A, 0x00003E, 0x000042, 0x000045, 0x00004A,
    0x00004E, 0x000053, 0x000057, 0x00005D, 0x000062, 0x000068, 0x00006E, 0x000075,
    0x00007B, 0x000083, 0x00008B, 0x000093, 0x00009B, 0x0000A5, 0x0000AE, 0x0000B9,
    0x0000C4, 0x0000CF, 0x0000DC, 0x0000E9, 0x0000F6, 0x000105, 0x000114, 0x000125,
    0x000136, 0x000148, 0x00015C, 0x000171, 0x000186, 0x00019E, 0x0001B6, 0x0001D0,
    0x0001EB, 0x000209, 0x000227, 0x000248, 0x00026B, 0x00028F, 0x0002B6, 0x0002DF,
    0x00030B, 0x000339, 0x00036A, 0x00039E, 0x0003D5, 0x00040F, 0x00044C, 0x00048D,
    0x0004D2, 0x00051C, 0x000569, 0x0005BB, 0x000612, 0x00066E, 0x0006D0, 0x000737,
    0x0007A5, 0x000818, 0x000893, 0x000915, 0x00099F, 0x000A31, 0x000ACC, 0x000B6F,
    0x000C1D, 0x000CD5, 0x000D97, 0x000E65, 0x000F40, 0x001027, 0x00111C, 0x001220,
    0x001333, 0x001456, 0x00158A, 0x0016D1, 0x00182B, 0x00199A, 0x001B1E, 0x001CB9,
    0x001E6D, 0x00203A, 0x002223, 0x002429, 0x00264E, 0x002893, 0x002AFA, 0x002D86,
    0x003039, 0x003314, 0x00361B, 0x003950, 0x003CB5, 0x00404E, 0x00441D, 0x004827,
    0x004C6D, 0x0050F4, 0x0055C0, 0x005AD5, 0x006037, 0x0065EA, 0x006BF4, 0x00725A,
    0x007920, 0x00804E, 0x0087E8, 0x008FF6, 0x00987D, 0x00A186, 0x00AB19, 0x00B53C,
    0x00BFF9, 0x00CB59, 0x00D766, 0x00E429, 0x00F1AE, 0x010000, 0x010F2B, 0x011F3D,
    0x013042, 0x014249, 0x015562, 0x01699C, 0x017F09, 0x0195BC, 0x01ADC6, 0x01C73D,
    0x01E237, 0x01FECA, 0x021D0E, 0x023D1D, 0x025F12, 0x02830B, 0x02A925, 0x02D182,
    0x02FC42, 0x03298B, 0x035983, 0x038C53, 0x03C225, 0x03FB28, 0x04378B, 0x047783,
    0x04BB44, 0x05030A, 0x054F10, 0x059F98, 0x05F4E5, 0x064F40, 0x06AEF6, 0x071457,
    0x077FBB, 0x07F17B,
];

//
// Public Functions
//

/// The hardware gain word for a volume index. Indices past the end of the
/// table are clamped to the loudest entry.
pub fn gain_for_index(index: u32) -> u32 {
    let idx = index.min(MAXIMUM_TABLE_VOLUME) as usize;
    VOLUME_TABLE[idx]
}

/// The level of a volume index in dB, as 16.16 fixed point.
///
/// Index 0 reports -70.5 dB, half a step below the quietest audible setting.
pub fn db_for_index(index: u32) -> i32 {
    let idx = index.min(MAXIMUM_TABLE_VOLUME) as i32;
    // 0.5 dB per step is 0x8000 in 16.16
    (idx - UNITY_VOLUME as i32) * 0x8000
}

/// Encode left and right gain words as the six-byte volume register image.
pub fn volume_register(left_gain: u32, right_gain: u32) -> [u8; 6] {
    let l = left_gain.to_be_bytes();
    let r = right_gain.to_be_bytes();
    [l[1], l[2], l[3], r[1], r[2], r[3]]
}
