mod common;

use common::*;
use tas3004::{Error, InitState, LoadMode, RecoverySelector, ShadowRegisters, WriteMode};

/// Sub-addresses of one complete, successful replay.
const REPLAY: [u8; 29] = [
    0x01, // fast load
    0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, // left biquads
    0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, // right biquads
    0x21, 0x22, // loudness biquads
    0x01, // normal load
    0x02, 0x04, 0x05, 0x06, 0x07, 0x08, 0x23, 0x24, 0x40, 0x43, //
    0x01, // restore
];

#[test]
fn replay_follows_the_load_mode_order() {
    let (mut codec, log) = codec();
    codec.initialize().unwrap();

    assert_eq!(write_addresses(&log), REPLAY);
    assert_eq!(codec.init_state(), InitState::Done);

    let mcr1: Vec<Vec<u8>> = writes(&log)
        .into_iter()
        .filter(|(r, _)| *r == 0x01)
        .map(|(_, d)| d)
        .collect();
    assert_eq!(mcr1, [vec![0xE0], vec![0x60], vec![0x60]]);
}

#[test]
fn reset_pulse_comes_first() {
    let (mut codec, log) = codec();
    codec.initialize().unwrap();
    let events = events(&log);
    assert_eq!(
        &events[..6],
        &[
            Event::Reset(true),
            Event::Delay(1),
            Event::Reset(false),
            Event::Delay(2),
            Event::Reset(true),
            Event::Delay(3),
        ]
    );
}

#[test]
fn replay_sends_the_shadow_without_changing_it() {
    let (mut codec, log) = codec();
    codec
        .write_register(0x05, &[0x60], WriteMode::ShadowOnly)
        .unwrap();
    let before = codec.shadow().clone();
    codec.initialize().unwrap();
    assert_eq!(codec.shadow(), &before);
    assert_eq!(last_write(&log, 0x05), Some(vec![0x60]));
}

#[test]
fn replay_is_idempotent() {
    let (mut codec, log) = codec();
    codec.initialize().unwrap();
    let first_shadow = codec.shadow().clone();
    let first_trace = events(&log);

    clear(&log);
    codec.initialize().unwrap();
    assert_eq!(codec.shadow(), &first_shadow);
    assert_eq!(events(&log), first_trace);
}

#[test]
fn replay_restores_normal_load_mode_in_the_shadow() {
    let (mut codec, log) = codec();
    codec
        .write_register(0x01, &[0xE2], WriteMode::ShadowOnly)
        .unwrap();
    assert_eq!(codec.load_mode(), LoadMode::Fast);
    codec.initialize().unwrap();
    assert_eq!(codec.load_mode(), LoadMode::Normal);
    assert_eq!(codec.shadow().get(tas3004::Register::MainControl1), &[0x62]);
    assert_eq!(last_write(&log, 0x01), Some(vec![0x62]));
}

#[test]
fn one_failed_write_restarts_from_reset() {
    let (mut codec, log) = codec();
    log.borrow_mut().fail_attempts.insert(5);

    codec.initialize().unwrap();

    assert_eq!(reset_pulses(&log), 2);
    let events = events(&log);
    let nack = events
        .iter()
        .position(|e| *e == Event::Nack(0x0E))
        .unwrap();
    assert_eq!(
        events[nack + 1],
        Event::Fatal(RecoverySelector::ControlBusFatalError)
    );
    // The second pass starts again with the reset pulse
    assert_eq!(events[nack + 2], Event::Reset(true));
    // The second pass is a full replay
    let addresses = write_addresses(&log);
    assert_eq!(&addresses[5..], REPLAY);
    assert_eq!(codec.init_state(), InitState::Done);
}

#[test]
fn failure_late_in_the_normal_pass_also_restarts() {
    let (mut codec, log) = codec();
    log.borrow_mut().fail_register = Some((0x43, 1));
    codec.initialize().unwrap();
    assert_eq!(reset_pulses(&log), 2);
}

#[test]
fn dead_bus_gives_device_unresponsive() {
    let (mut codec, log) = codec();
    log.borrow_mut().fail_all = true;

    assert_eq!(
        codec.initialize(),
        Err(Error::DeviceUnresponsive { attempts: 5 })
    );
    assert_eq!(reset_pulses(&log), 5);
    assert_eq!(codec.init_state(), InitState::Failed);
    let fatal = events(&log)
        .iter()
        .filter(|e| matches!(e, Event::Fatal(_)))
        .count();
    assert_eq!(fatal, 5);
    assert_eq!(codec.shadow(), &ShadowRegisters::new());
}

#[test]
fn retry_budget_comes_from_the_config() {
    let (mut codec, log) = codec_with(
        tas3004::Config {
            max_init_attempts: 2,
            ..config()
        },
        &[],
    );
    log.borrow_mut().fail_all = true;
    assert_eq!(
        codec.initialize(),
        Err(Error::DeviceUnresponsive { attempts: 2 })
    );
    assert_eq!(reset_pulses(&log), 2);
}

#[test]
fn the_engine_is_usable_again_after_giving_up() {
    let (mut codec, log) = codec();
    log.borrow_mut().fail_all = true;
    assert!(codec.initialize().is_err());
    log.borrow_mut().fail_all = false;
    clear(&log);
    assert_eq!(codec.initialize(), Ok(()));
    assert_eq!(write_addresses(&log), REPLAY);
}

#[test]
fn recovery_replays_for_either_selector() {
    for selector in [
        RecoverySelector::ControlBusFatalError,
        RecoverySelector::ClockSourceInterrupted,
    ] {
        let (mut codec, log) = codec();
        codec.recover_from_fatal_error(selector).unwrap();
        assert_eq!(reset_pulses(&log), 1);
        assert_eq!(write_addresses(&log), REPLAY);
    }
}

#[test]
fn sample_rate_replays_and_rejects_odd_rates() {
    let (mut codec, log) = codec();
    assert_eq!(
        codec.set_sample_rate(22_050),
        Err(Error::UnsupportedSampleRate(22_050))
    );
    assert!(events(&log).is_empty());
    codec.set_sample_rate(48_000).unwrap();
    assert_eq!(reset_pulses(&log), 1);
}

#[test]
fn sample_depth_sets_word_length_after_replay() {
    let (mut codec, log) = codec();
    assert_eq!(
        codec.set_sample_depth(20),
        Err(Error::UnsupportedSampleDepth(20))
    );
    assert!(events(&log).is_empty());

    codec.set_sample_depth(24).unwrap();
    assert_eq!(codec.sample_depth(), 24);
    let addresses = write_addresses(&log);
    assert_eq!(&addresses[..REPLAY.len()], REPLAY);
    assert_eq!(writes(&log).last(), Some(&(0x01, vec![0x62])));

    codec.set_sample_depth(16).unwrap();
    assert_eq!(codec.sample_depth(), 16);
    assert_eq!(last_write(&log, 0x01), Some(vec![0x60]));
}
