//! Collaborators the driver calls out to: the host audio framework and the
//! amplifier mute lines.

//
// Public Types
//

/// Why the codec needs re-initialising.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoverySelector {
    /// A write on the control bus failed.
    ControlBusFatalError,
    /// The I²S clock source was interrupted and the codec lost its state.
    ClockSourceInterrupted,
}

/// An external amplifier path with its own mute GPIO.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AmpLine {
    /// Headphone amplifier
    Headphone,
    /// Internal speaker amplifier
    Speaker,
    /// Line output
    LineOut,
}

/// The audio framework hosting this driver.
pub trait Host {
    /// Called as soon as a control bus write fails.
    ///
    /// The host is expected to call
    /// [`Tas3004::recover_from_fatal_error`](crate::Tas3004::recover_from_fatal_error)
    /// later, from its own serialized context. This hook must not block.
    fn notify_fatal_error(&mut self, selector: RecoverySelector);

    /// Current sample frame of the audio stream.
    fn frame_count(&self) -> u32 {
        0
    }

    /// Move the sample frame counter. Returns `false` if the host refused.
    fn set_frame_count(&mut self, _value: u32) -> bool {
        true
    }
}

/// Something that can mute the external amplifiers.
pub trait AmpMute {
    /// Error type returned when a mute line cannot be driven.
    type Error: core::fmt::Debug;

    /// Mute or unmute one amplifier path.
    fn set_mute_state(&mut self, line: AmpLine, muted: bool) -> Result<(), Self::Error>;
}

//
// Public Data
//

/// Every amplifier path, in the order they are muted for sleep.
pub const ALL_AMP_LINES: [AmpLine; 3] = [AmpLine::Headphone, AmpLine::Speaker, AmpLine::LineOut];

//
// impls on Public Types
//

/// A host that ignores fatal error notifications.
impl Host for () {
    fn notify_fatal_error(&mut self, _selector: RecoverySelector) {}
}
