use anyhow::{Result, anyhow};
use std::sync::mpsc::Receiver;

use crate::traits::{SpeechCapture, SpeechSynthesis};
use crate::types::{CaptureEvent, PlaybackEvent};

/// Stand-ins for platforms without speech support. The probe reports
/// unavailable, so controllers degrade to warn-once no-ops.
pub struct DummyCapture;

impl SpeechCapture for DummyCapture {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<Receiver<CaptureEvent>> {
        Err(anyhow!("Speech capture is not available on this platform"))
    }

    fn stop(&mut self) {}
}

pub struct DummySynthesis;

impl SpeechSynthesis for DummySynthesis {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str) -> Result<Receiver<PlaybackEvent>> {
        Err(anyhow!("Speech synthesis is not available on this platform"))
    }

    fn cancel(&mut self) {}
}
