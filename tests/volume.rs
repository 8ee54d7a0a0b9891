mod common;

use common::*;
use tas3004::tables::{gain_for_index, volume_register};
use tas3004::{drc, DrcSettings, Register, VolumeState};

#[test]
fn mute_and_unmute_restore_the_table_gain() {
    let (mut codec, log) = codec();
    codec.set_volume(10, 10).unwrap();
    let expected = volume_register(gain_for_index(10), gain_for_index(10)).to_vec();
    assert_eq!(last_write(&log, 0x04), Some(expected.clone()));

    codec.set_mute(true).unwrap();
    assert_eq!(last_write(&log, 0x04), Some(vec![0; 6]));
    assert!(codec.is_muted());

    codec.set_mute(false).unwrap();
    assert_eq!(last_write(&log, 0x04), Some(expected.clone()));
    assert_eq!(
        codec.volume(),
        VolumeState {
            left: 10,
            right: 10,
            muted: false
        }
    );
    assert_eq!(codec.shadow().get(Register::Volume), expected.as_slice());
}

#[test]
fn channels_are_big_endian_three_byte_words() {
    let (mut codec, log) = codec();
    codec.set_volume(141, 1).unwrap();
    assert_eq!(
        last_write(&log, 0x04),
        Some(vec![0x01, 0x00, 0x00, 0x00, 0x00, 0x15])
    );
}

#[test]
fn volume_is_only_cached_while_muted() {
    let (mut codec, log) = codec();
    codec.set_mute(true).unwrap();
    clear(&log);

    codec.set_volume(100, 90).unwrap();
    assert!(writes(&log).is_empty());
    assert_eq!(codec.shadow().get(Register::Volume), &[0u8; 6]);
    assert_eq!(codec.volume().left, 100);
    assert_eq!(codec.volume().right, 90);

    codec.set_mute(false).unwrap();
    assert_eq!(
        last_write(&log, 0x04),
        Some(volume_register(gain_for_index(100), gain_for_index(90)).to_vec())
    );
}

#[test]
fn muting_twice_still_writes_zero() {
    let (mut codec, log) = codec();
    codec.set_mute(true).unwrap();
    codec.set_mute(true).unwrap();
    assert_eq!(write_addresses(&log), [0x04, 0x04]);
    assert_eq!(last_write(&log, 0x04), Some(vec![0; 6]));
}

#[test]
fn volume_is_clamped_to_the_maximum() {
    let (mut codec, _log) = codec();
    assert_eq!(codec.maximum_volume(), 141);
    codec.set_volume(500, 150).unwrap();
    assert_eq!(codec.volume().left, 141);
    assert_eq!(codec.volume().right, 141);
}

#[test]
fn compression_headroom_raises_the_maximum() {
    let (mut codec, _log) = codec();
    let headroom = DrcSettings {
        enabled: true,
        threshold: -15_000,
        maximum_volume: 24,
        ..drc::DISABLED
    };
    codec.set_drc(&headroom).unwrap();
    assert_eq!(codec.maximum_volume(), 165);
    assert_eq!(codec.maximum_db_volume(), 12 << 16);

    codec.set_drc(&DrcSettings {
        maximum_volume: 1_000,
        ..headroom
    })
    .unwrap();
    assert_eq!(codec.maximum_volume(), 177);

    codec.set_volume(177, 177).unwrap();
    assert_eq!(codec.volume().left, 177);
}

#[test]
fn losing_headroom_pulls_the_volume_down() {
    let (mut codec, log) = codec();
    codec
        .set_drc(&DrcSettings {
            enabled: true,
            maximum_volume: 24,
            ..drc::DISABLED
        })
        .unwrap();
    codec.set_volume(165, 160).unwrap();

    codec.disable_equalizer().unwrap();
    assert_eq!(codec.maximum_volume(), 141);
    assert_eq!(codec.volume().left, 141);
    assert_eq!(codec.volume().right, 141);
    let unity = volume_register(gain_for_index(141), gain_for_index(141)).to_vec();
    assert_eq!(last_write(&log, 0x04), Some(unity.clone()));
    assert_eq!(codec.shadow().get(Register::Volume), unity.as_slice());
}

#[test]
fn volume_under_the_new_maximum_is_left_alone() {
    let (mut codec, log) = codec();
    codec
        .set_drc(&DrcSettings {
            enabled: true,
            maximum_volume: 24,
            ..drc::DISABLED
        })
        .unwrap();
    codec.set_volume(120, 120).unwrap();
    clear(&log);

    codec.set_drc(&drc::DISABLED).unwrap();
    assert_eq!(write_addresses(&log), [0x02]);
    assert_eq!(codec.volume().left, 120);
}

#[test]
fn db_range() {
    let (codec, _log) = codec();
    assert_eq!(codec.minimum_volume(), 0);
    assert_eq!(codec.minimum_db_volume(), -141 * 0x8000);
    assert_eq!(codec.maximum_db_volume(), 0);
}

#[test]
fn failed_volume_write_is_escalated() {
    let (mut codec, log) = codec();
    log.borrow_mut().fail_all = true;
    assert_eq!(
        codec.set_volume(50, 50),
        Err(tas3004::Error::TransportFailure(0x04))
    );
    assert!(events(&log).contains(&Event::Fatal(
        tas3004::RecoverySelector::ControlBusFatalError
    )));
    // Indices are still cached for the replay
    assert_eq!(codec.volume().left, 50);
}
