use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::warn;

use crate::traits::SpeechCapture;
use crate::types::CaptureEvent;

/// Updates surfaced to the shell after polling the input controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputUpdate {
    /// Latest cumulative transcript; replaces the composer text outright
    Transcript(String),
    /// Recording stopped (end of speech, capture error, or explicit stop)
    Stopped,
}

/// Voice input controller: Idle when no event channel is held, Recording
/// while one is.
pub struct VoiceInputController {
    capture: Box<dyn SpeechCapture>,
    events: Option<Receiver<CaptureEvent>>,
    unavailable_reported: bool,
}

impl VoiceInputController {
    pub fn new(capture: Box<dyn SpeechCapture>) -> Self {
        Self {
            capture,
            events: None,
            unavailable_reported: false,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.events.is_some()
    }

    pub fn is_available(&self) -> bool {
        self.capture.is_available()
    }

    /// Toggle recording. Returns true if now recording.
    ///
    /// When the capture backend is unavailable this reports once and every
    /// further toggle is a no-op.
    pub fn toggle(&mut self) -> bool {
        if self.is_recording() {
            self.stop();
            return false;
        }

        if !self.capture.is_available() {
            if !self.unavailable_reported {
                warn!("speech capture unavailable on this platform; voice input disabled");
                self.unavailable_reported = true;
            }
            return false;
        }

        match self.capture.start() {
            Ok(events) => {
                self.events = Some(events);
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to start speech capture");
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if self.events.take().is_some() {
            self.capture.stop();
        }
    }

    /// Drain pending capture events, in arrival order.
    pub fn poll(&mut self) -> Vec<InputUpdate> {
        let mut updates = Vec::new();
        let Some(events) = &self.events else {
            return updates;
        };

        let mut stopped = false;
        loop {
            match events.try_recv() {
                Ok(CaptureEvent::Transcript { text, .. }) => {
                    updates.push(InputUpdate::Transcript(text));
                }
                Ok(CaptureEvent::Ended) => {
                    stopped = true;
                    break;
                }
                Ok(CaptureEvent::Error(e)) => {
                    warn!(error = %e, "speech capture error");
                    stopped = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stopped = true;
                    break;
                }
            }
        }

        if stopped {
            self.stop();
            updates.push(InputUpdate::Stopped);
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCapture;

    #[test]
    fn toggle_starts_and_stops_recording() {
        let (capture, handle) = MockCapture::available();
        let mut input = VoiceInputController::new(Box::new(capture));

        assert!(!input.is_recording());
        assert!(input.toggle());
        assert!(input.is_recording());
        assert_eq!(handle.starts(), 1);

        assert!(!input.toggle());
        assert!(!input.is_recording());
        assert_eq!(handle.stops(), 1);
    }

    #[test]
    fn transcripts_arrive_as_cumulative_overwrites() {
        let (capture, handle) = MockCapture::available();
        let mut input = VoiceInputController::new(Box::new(capture));
        input.toggle();

        handle.emit(CaptureEvent::Transcript {
            text: "plant".into(),
            is_final: false,
        });
        handle.emit(CaptureEvent::Transcript {
            text: "plant wheat".into(),
            is_final: true,
        });

        let updates = input.poll();
        assert_eq!(
            updates,
            vec![
                InputUpdate::Transcript("plant".into()),
                InputUpdate::Transcript("plant wheat".into()),
            ]
        );
        assert!(input.is_recording());
    }

    #[test]
    fn end_of_speech_returns_to_idle() {
        let (capture, handle) = MockCapture::available();
        let mut input = VoiceInputController::new(Box::new(capture));
        input.toggle();

        handle.emit(CaptureEvent::Ended);
        let updates = input.poll();
        assert_eq!(updates, vec![InputUpdate::Stopped]);
        assert!(!input.is_recording());
    }

    #[test]
    fn capture_error_stops_recording() {
        let (capture, handle) = MockCapture::available();
        let mut input = VoiceInputController::new(Box::new(capture));
        input.toggle();

        handle.emit(CaptureEvent::Error("mic lost".into()));
        let updates = input.poll();
        assert_eq!(updates, vec![InputUpdate::Stopped]);
        assert!(!input.is_recording());
    }

    #[test]
    fn unavailable_backend_makes_toggle_a_noop() {
        let capture = MockCapture::unavailable();
        let mut input = VoiceInputController::new(Box::new(capture));

        assert!(!input.toggle());
        assert!(!input.toggle());
        assert!(!input.is_recording());
    }
}
