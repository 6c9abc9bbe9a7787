//! Scripted speech backends for tests.
//!
//! Each mock hands out a handle that drives events from the outside, the
//! way a platform backend would signal asynchronously.

use anyhow::{Result, anyhow};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

use crate::traits::{SpeechCapture, SpeechSynthesis};
use crate::types::{CaptureEvent, PlaybackEvent};

#[derive(Default)]
struct CaptureState {
    sender: Option<Sender<CaptureEvent>>,
    starts: usize,
    stops: usize,
}

pub struct MockCapture {
    available: bool,
    state: Arc<Mutex<CaptureState>>,
}

#[derive(Clone)]
pub struct MockCaptureHandle(Arc<Mutex<CaptureState>>);

impl MockCapture {
    pub fn available() -> (Self, MockCaptureHandle) {
        let state = Arc::new(Mutex::new(CaptureState::default()));
        (
            Self {
                available: true,
                state: Arc::clone(&state),
            },
            MockCaptureHandle(state),
        )
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            state: Arc::new(Mutex::new(CaptureState::default())),
        }
    }
}

impl MockCaptureHandle {
    /// Emit a capture event; returns false if nothing is recording.
    pub fn emit(&self, event: CaptureEvent) -> bool {
        let state = self.0.lock().unwrap();
        match &state.sender {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    pub fn starts(&self) -> usize {
        self.0.lock().unwrap().starts
    }

    pub fn stops(&self) -> usize {
        self.0.lock().unwrap().stops
    }
}

impl SpeechCapture for MockCapture {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self) -> Result<Receiver<CaptureEvent>> {
        if !self.available {
            return Err(anyhow!("mock capture configured unavailable"));
        }
        let (tx, rx) = channel();
        let mut state = self.state.lock().unwrap();
        state.sender = Some(tx);
        state.starts += 1;
        Ok(rx)
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.sender = None;
        state.stops += 1;
    }
}

struct Utterance {
    text: String,
    sender: Sender<PlaybackEvent>,
}

#[derive(Default)]
struct SynthState {
    utterances: Vec<Utterance>,
    cancels: usize,
}

pub struct MockSynthesis {
    available: bool,
    state: Arc<Mutex<SynthState>>,
}

#[derive(Clone)]
pub struct MockSynthesisHandle(Arc<Mutex<SynthState>>);

impl MockSynthesis {
    pub fn available() -> (Self, MockSynthesisHandle) {
        let state = Arc::new(Mutex::new(SynthState::default()));
        (
            Self {
                available: true,
                state: Arc::clone(&state),
            },
            MockSynthesisHandle(state),
        )
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            state: Arc::new(Mutex::new(SynthState::default())),
        }
    }
}

impl MockSynthesisHandle {
    pub fn spoken_texts(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .utterances
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }

    pub fn cancels(&self) -> usize {
        self.0.lock().unwrap().cancels
    }

    /// Signal natural completion of the `index`-th utterance ever spoken.
    /// Delivery to a superseded utterance silently lands on a dropped
    /// receiver, mimicking a stale platform callback.
    pub fn finish(&self, index: usize) {
        let state = self.0.lock().unwrap();
        if let Some(utterance) = state.utterances.get(index) {
            let _ = utterance.sender.send(PlaybackEvent::Ended);
        }
    }

    /// Signal a playback error for the `index`-th utterance.
    pub fn fail(&self, index: usize, message: &str) {
        let state = self.0.lock().unwrap();
        if let Some(utterance) = state.utterances.get(index) {
            let _ = utterance.sender.send(PlaybackEvent::Error(message.to_string()));
        }
    }
}

impl SpeechSynthesis for MockSynthesis {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, text: &str) -> Result<Receiver<PlaybackEvent>> {
        if !self.available {
            return Err(anyhow!("mock synthesis configured unavailable"));
        }
        let (tx, rx) = channel();
        self.state.lock().unwrap().utterances.push(Utterance {
            text: text.to_string(),
            sender: tx,
        });
        Ok(rx)
    }

    fn cancel(&mut self) {
        self.state.lock().unwrap().cancels += 1;
    }
}
