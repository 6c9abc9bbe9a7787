pub mod coordinator;
pub mod dummy_backend;
pub mod input;
pub mod mock;
pub mod output;
pub mod traits;
pub mod types;

pub use coordinator::VoiceCoordinator;
pub use dummy_backend::{DummyCapture, DummySynthesis};
pub use input::{InputUpdate, VoiceInputController};
pub use output::VoiceOutputController;
pub use traits::{SpeechCapture, SpeechSynthesis};
pub use types::{CaptureEvent, PlaybackEvent};
