//! UI-side application state.
//!
//! The shell owns every piece of state the terminal renders and is the
//! only writer of it. It never blocks: model calls, subscriptions, and
//! location lookups all go over the channel to the backend worker, and
//! their outcomes come back as [`CoreEvent`]s drained once per tick.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::debug;
use tui_input::Input;
use voice::coordinator::VoiceCoordinator;
use voice::input::InputUpdate;

use crate::events::{AppCommand, CoreEvent, FALLBACK_REPLY, GREETING};
use crate::notify::NotificationController;
use crate::store::{Author, MessageStore};
use crate::subscribe::SubscribeForm;

pub struct ChatShell {
    pub store: MessageStore,
    pub composer: Input,
    pub loading: bool,
    pub voice: VoiceCoordinator,
    pub notifications: NotificationController,
    pub form: SubscribeForm,
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    session_generation: u64,
    commands: Sender<AppCommand>,
    events: Receiver<CoreEvent>,
}

impl ChatShell {
    pub fn new(
        commands: Sender<AppCommand>,
        events: Receiver<CoreEvent>,
        voice: VoiceCoordinator,
    ) -> Self {
        let mut store = MessageStore::new();
        store.append(Author::Bot, GREETING);

        Self {
            store,
            composer: Input::default(),
            loading: false,
            voice,
            notifications: NotificationController::new(),
            form: SubscribeForm::new(),
            selected: None,
            scroll_offset: 0,
            session_generation: 0,
            commands,
            events,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submit the composer text as a user turn.
    ///
    /// No-op while a previous send is still in flight or when the composer
    /// is blank; turns are strictly serialized. An active recording is
    /// stopped so the committed text cannot be overwritten by a late
    /// transcript.
    pub fn send(&mut self) {
        if self.loading {
            return;
        }
        let text = self.composer.value().trim().to_string();
        if text.is_empty() {
            return;
        }

        if self.voice.is_recording() {
            self.voice.toggle_recording();
        }

        self.store.append(Author::User, &text);
        self.composer = Input::default();
        self.loading = true;
        let _ = self.commands.send(AppCommand::SendMessage(text));
    }

    /// Toggle voice input. Starting a recording clears the composer, since
    /// transcripts replace its contents wholesale.
    pub fn toggle_recording(&mut self) {
        if self.voice.toggle_recording() {
            self.composer = Input::default();
        }
    }

    /// Toggle read-aloud for the selected turn (latest turn by default).
    pub fn toggle_play_selected(&mut self) {
        let index = match self.selected {
            Some(i) => i,
            None if !self.store.is_empty() => self.store.len() - 1,
            None => return,
        };
        if let Some(turn) = self.store.get(index) {
            let (id, text) = (turn.id.as_u64(), turn.text.clone());
            self.voice.toggle_playback(id, &text);
        }
    }

    pub fn select_prev(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        });
    }

    pub fn select_next(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let last = self.store.len() - 1;
        self.selected = Some(match self.selected {
            None => last,
            Some(i) => (i + 1).min(last),
        });
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn open_form(&mut self) {
        self.form.open();
    }

    pub fn close_form(&mut self) {
        self.form.close();
    }

    /// Validate the form; on success hand the record to the backend and
    /// close. On failure the form stays open with its inline error.
    pub fn submit_form(&mut self) {
        if let Some(subscription) = self.form.submit() {
            let _ = self.commands.send(AppCommand::Subscribe(subscription));
            self.form.close();
        }
    }

    pub fn request_location(&mut self) {
        if self.form.locating {
            return;
        }
        self.form.locating = true;
        let _ = self.commands.send(AppCommand::Locate);
    }

    /// Ask the backend for a fresh conversation context. The display log
    /// keeps its history; only the bot's memory is discarded.
    pub fn reset_session(&mut self) {
        let _ = self.commands.send(AppCommand::ResetSession);
    }

    /// Advance all asynchronous state by one tick: voice controllers first,
    /// then the backend event queue.
    pub fn tick(&mut self) {
        for update in self.voice.process() {
            match update {
                InputUpdate::Transcript(text) => {
                    self.composer = Input::new(text);
                }
                InputUpdate::Stopped => {}
            }
        }

        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        if self.store.take_scroll_hint() {
            self.scroll_offset = 0;
        }
    }

    fn apply(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::BotReply { generation, text } => {
                if generation != self.session_generation {
                    // The outstanding send has settled; only its text is stale.
                    debug!(generation, "dropping reply from a superseded session");
                    self.loading = false;
                    return;
                }
                self.store.append(Author::Bot, text);
                self.loading = false;
            }
            CoreEvent::SendFailed { generation } => {
                if generation != self.session_generation {
                    debug!(generation, "dropping failure from a superseded session");
                    self.loading = false;
                    return;
                }
                self.store.append(Author::Bot, FALLBACK_REPLY);
                self.loading = false;
            }
            CoreEvent::Notification(payload) => {
                self.notifications.show(payload);
            }
            CoreEvent::Location(Ok(coords)) => {
                self.form.location_received(coords);
            }
            CoreEvent::Location(Err(reason)) => {
                debug!(%reason, "device location lookup failed");
                self.form.location_failed();
            }
            // The loading flag is untouched here: a send issued after the
            // reset command is tagged with the new generation and is still
            // in flight when this event drains. Its reply (current or
            // stale) is what settles the flag.
            CoreEvent::SessionReset { generation } => {
                self.session_generation = generation;
            }
        }
    }
}
