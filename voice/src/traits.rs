use anyhow::Result;
use std::sync::mpsc::Receiver;

use crate::types::{CaptureEvent, PlaybackEvent};

/// Trait for platform speech-to-text capture.
///
/// Availability is platform-dependent and must be probed, not assumed.
pub trait SpeechCapture: Send {
    fn is_available(&self) -> bool;

    /// Start capturing and return a channel for transcript events
    fn start(&mut self) -> Result<Receiver<CaptureEvent>>;

    /// Stop capturing. Safe to call when not recording.
    fn stop(&mut self);
}

/// Trait for platform text-to-speech synthesis.
///
/// At most one utterance is active; issuing a new one implicitly cancels
/// any previous.
pub trait SpeechSynthesis: Send {
    fn is_available(&self) -> bool;

    /// Begin speaking `text` and return a channel for this utterance's
    /// completion signals
    fn speak(&mut self, text: &str) -> Result<Receiver<PlaybackEvent>>;

    /// Cancel the active utterance, if any
    fn cancel(&mut self);
}
