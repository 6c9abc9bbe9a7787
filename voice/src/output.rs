use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{trace, warn};

use crate::traits::SpeechSynthesis;
use crate::types::PlaybackEvent;

struct ActivePlayback {
    message_id: u64,
    generation: u64,
    events: Receiver<PlaybackEvent>,
}

/// Voice output controller. Tracks which single message (if any) is being
/// read aloud; only one utterance plays system-wide.
pub struct VoiceOutputController {
    synth: Box<dyn SpeechSynthesis>,
    current: Option<ActivePlayback>,
    next_generation: u64,
    unavailable_reported: bool,
}

impl VoiceOutputController {
    pub fn new(synth: Box<dyn SpeechSynthesis>) -> Self {
        Self {
            synth,
            current: None,
            next_generation: 0,
            unavailable_reported: false,
        }
    }

    /// Id of the message currently being spoken, if any.
    pub fn speaking(&self) -> Option<u64> {
        self.current.as_ref().map(|p| p.message_id)
    }

    /// Toggle playback of message `message_id`.
    ///
    /// Toggling the message already playing stops it; any other message
    /// supersedes the current utterance unconditionally.
    pub fn toggle(&mut self, message_id: u64, text: &str) {
        if self.current.as_ref().is_some_and(|p| p.message_id == message_id) {
            self.cancel();
            return;
        }

        self.cancel();

        if !self.synth.is_available() {
            if !self.unavailable_reported {
                warn!("speech synthesis unavailable on this platform; voice output disabled");
                self.unavailable_reported = true;
            }
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        match self.synth.speak(text) {
            Ok(events) => {
                trace!(message_id, generation, "playback started");
                self.current = Some(ActivePlayback {
                    message_id,
                    generation,
                    events,
                });
            }
            Err(e) => warn!(error = %e, "failed to start speech synthesis"),
        }
    }

    pub fn cancel(&mut self) {
        if self.current.take().is_some() {
            self.synth.cancel();
        }
    }

    /// Drain completion signals for the active utterance.
    ///
    /// Each playback request carries its own generation-tagged channel, so
    /// a late signal from a superseded utterance lands on a dropped
    /// receiver and can never clear a newer playback.
    pub fn poll(&mut self) {
        let Some(playback) = &self.current else {
            return;
        };

        let finished = loop {
            match playback.events.try_recv() {
                Ok(PlaybackEvent::Ended) => {
                    trace!(
                        message_id = playback.message_id,
                        generation = playback.generation,
                        "playback finished"
                    );
                    break true;
                }
                Ok(PlaybackEvent::Error(e)) => {
                    warn!(error = %e, "speech synthesis error");
                    break true;
                }
                Err(TryRecvError::Empty) => break false,
                Err(TryRecvError::Disconnected) => break true,
            }
        };

        if finished {
            // Natural completion; no cancel call to the backend.
            self.current = None;
        }
    }
}
