/// Events emitted by a speech capture backend while recording
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// Partial or final transcript. Carries the full cumulative text of the
    /// utterance so far, not a delta.
    Transcript { text: String, is_final: bool },
    /// The backend detected end of speech and stopped on its own
    Ended,
    /// Capture failed; recording stops
    Error(String),
}

/// Completion signals for a single synthesized utterance
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// Natural end of speech
    Ended,
    /// Synthesis or playback failed
    Error(String),
}
