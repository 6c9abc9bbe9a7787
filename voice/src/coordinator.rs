use crate::input::{InputUpdate, VoiceInputController};
use crate::output::VoiceOutputController;
use crate::traits::{SpeechCapture, SpeechSynthesis};

/// Owns both voice controllers and enforces their exclusion invariant:
/// starting to listen always wins over speaking. Starting playback does not
/// stop an active recording; only the reverse ordering is required.
pub struct VoiceCoordinator {
    input: VoiceInputController,
    output: VoiceOutputController,
}

impl VoiceCoordinator {
    pub fn new(capture: Box<dyn SpeechCapture>, synth: Box<dyn SpeechSynthesis>) -> Self {
        Self {
            input: VoiceInputController::new(capture),
            output: VoiceOutputController::new(synth),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.input.is_recording()
    }

    pub fn speaking(&self) -> Option<u64> {
        self.output.speaking()
    }

    /// Toggle voice input. Any active playback is cancelled synchronously
    /// before capture starts. Returns true if now recording.
    ///
    /// With capture unavailable the whole toggle is a no-op, playback
    /// included.
    pub fn toggle_recording(&mut self) -> bool {
        if !self.input.is_recording() && self.input.is_available() {
            self.output.cancel();
        }
        self.input.toggle()
    }

    /// Toggle read-aloud for one message.
    pub fn toggle_playback(&mut self, message_id: u64, text: &str) {
        self.output.toggle(message_id, text);
    }

    /// Poll both controllers; called once per UI tick.
    pub fn process(&mut self) -> Vec<InputUpdate> {
        self.output.poll();
        self.input.poll()
    }
}
