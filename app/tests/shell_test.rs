//! End-to-end shell behavior with scripted voice backends and a hand-fed
//! backend event channel.

use agrichat::events::{AppCommand, CoreEvent, FALLBACK_REPLY, GREETING};
use agrichat::notify::NotificationPayload;
use agrichat::shell::ChatShell;
use agrichat::store::Author;
use agrichat::subscribe::Coordinates;
use crossbeam_channel::{Receiver, Sender, unbounded};
use tui_input::Input;
use voice::VoiceCoordinator;
use voice::mock::{MockCapture, MockCaptureHandle, MockSynthesis, MockSynthesisHandle};
use voice::types::CaptureEvent;

struct Harness {
    shell: ChatShell,
    commands: Receiver<AppCommand>,
    events: Sender<CoreEvent>,
    capture: MockCaptureHandle,
    synth: MockSynthesisHandle,
}

fn harness() -> Harness {
    let (cmd_tx, cmd_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();
    let (capture, capture_handle) = MockCapture::available();
    let (synth, synth_handle) = MockSynthesis::available();
    let voice = VoiceCoordinator::new(Box::new(capture), Box::new(synth));

    Harness {
        shell: ChatShell::new(cmd_tx, event_rx, voice),
        commands: cmd_rx,
        events: event_tx,
        capture: capture_handle,
        synth: synth_handle,
    }
}

#[test]
fn greeting_is_the_first_turn() {
    let h = harness();
    let turns = h.shell.store.all();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].author, Author::Bot);
    assert_eq!(turns[0].text, GREETING);
}

#[test]
fn sends_are_serialized_by_the_loading_flag() {
    let mut h = harness();

    h.shell.composer = Input::new("when should I plant wheat?".to_string());
    h.shell.send();

    assert!(h.shell.is_loading());
    assert!(h.shell.composer.value().is_empty());
    assert_eq!(h.shell.store.len(), 2);
    assert!(matches!(
        h.commands.try_recv(),
        Ok(AppCommand::SendMessage(text)) if text == "when should I plant wheat?"
    ));

    // A second send while the first is in flight does nothing.
    h.shell.composer = Input::new("ignored".to_string());
    h.shell.send();
    assert_eq!(h.shell.store.len(), 2);
    assert!(h.commands.try_recv().is_err());

    // The reply unlocks the composer again.
    h.events
        .send(CoreEvent::BotReply {
            generation: 0,
            text: "Sow in early November.".to_string(),
        })
        .unwrap();
    h.shell.tick();

    assert!(!h.shell.is_loading());
    assert_eq!(h.shell.store.len(), 3);
    assert_eq!(h.shell.store.all()[2].text, "Sow in early November.");

    h.shell.send();
    assert!(matches!(
        h.commands.try_recv(),
        Ok(AppCommand::SendMessage(text)) if text == "ignored"
    ));
}

#[test]
fn blank_composer_never_sends() {
    let mut h = harness();
    h.shell.composer = Input::new("   ".to_string());
    h.shell.send();

    assert!(!h.shell.is_loading());
    assert_eq!(h.shell.store.len(), 1);
    assert!(h.commands.try_recv().is_err());
}

#[test]
fn failed_send_falls_back_to_the_apology_turn() {
    let mut h = harness();
    h.shell.composer = Input::new("hello".to_string());
    h.shell.send();

    h.events
        .send(CoreEvent::SendFailed { generation: 0 })
        .unwrap();
    h.shell.tick();

    assert!(!h.shell.is_loading());
    let last = h.shell.store.all().last().unwrap();
    assert_eq!(last.author, Author::Bot);
    assert_eq!(last.text, FALLBACK_REPLY);
}

#[test]
fn transcripts_overwrite_the_composer() {
    let mut h = harness();
    h.shell.composer = Input::new("typed draft".to_string());

    h.shell.toggle_recording();
    assert!(h.shell.voice.is_recording());
    assert!(h.shell.composer.value().is_empty());

    h.capture.emit(CaptureEvent::Transcript {
        text: "pest".to_string(),
        is_final: false,
    });
    h.capture.emit(CaptureEvent::Transcript {
        text: "pesticide schedule for cotton".to_string(),
        is_final: true,
    });
    h.shell.tick();

    assert_eq!(h.shell.composer.value(), "pesticide schedule for cotton");
}

#[test]
fn starting_to_listen_always_stops_playback() {
    let mut h = harness();
    h.shell.toggle_play_selected(); // reads the greeting aloud
    assert!(h.shell.voice.speaking().is_some());

    h.shell.toggle_recording();
    assert!(h.shell.voice.is_recording());
    assert!(h.shell.voice.speaking().is_none());
    assert_eq!(h.synth.cancels(), 1);
}

#[test]
fn sending_stops_an_active_recording() {
    let mut h = harness();
    h.shell.toggle_recording();
    h.capture.emit(CaptureEvent::Transcript {
        text: "market prices for maize".to_string(),
        is_final: true,
    });
    h.shell.tick();

    h.shell.send();
    assert!(!h.shell.voice.is_recording());
    assert_eq!(h.capture.stops(), 1);
}

#[test]
fn replies_from_a_superseded_session_are_dropped() {
    let mut h = harness();
    h.shell.composer = Input::new("slow question".to_string());
    h.shell.send();

    // Session reset completes while the send is still in flight.
    h.shell.reset_session();
    h.events
        .send(CoreEvent::SessionReset { generation: 1 })
        .unwrap();
    h.events
        .send(CoreEvent::BotReply {
            generation: 0,
            text: "stale answer".to_string(),
        })
        .unwrap();
    h.shell.tick();

    assert!(!h.shell.is_loading());
    assert!(h.shell.store.all().iter().all(|t| t.text != "stale answer"));

    // Replies for the new generation land normally.
    h.shell.composer = Input::new("fresh question".to_string());
    h.shell.send();
    h.events
        .send(CoreEvent::BotReply {
            generation: 1,
            text: "fresh answer".to_string(),
        })
        .unwrap();
    h.shell.tick();
    assert_eq!(h.shell.store.all().last().unwrap().text, "fresh answer");
}

#[test]
fn reset_does_not_release_the_guard_while_a_send_is_outstanding() {
    let mut h = harness();

    // Backend handles commands serially: the reset completes first, so the
    // send that follows it is tagged with the new generation and is still
    // in flight when SessionReset drains on the UI side.
    h.shell.reset_session();
    h.shell.composer = Input::new("first".to_string());
    h.shell.send();
    assert!(h.shell.is_loading());
    assert!(matches!(h.commands.try_recv(), Ok(AppCommand::ResetSession)));

    h.events
        .send(CoreEvent::SessionReset { generation: 1 })
        .unwrap();
    h.shell.tick();

    // Still exactly one outstanding send; a second one must not slip through.
    assert!(h.shell.is_loading());
    h.shell.composer = Input::new("second".to_string());
    h.shell.send();
    assert!(matches!(
        h.commands.try_recv(),
        Ok(AppCommand::SendMessage(text)) if text == "first"
    ));
    assert!(h.commands.try_recv().is_err());

    // Only the reply settles the guard.
    h.events
        .send(CoreEvent::BotReply {
            generation: 1,
            text: "answer".to_string(),
        })
        .unwrap();
    h.shell.tick();
    assert!(!h.shell.is_loading());
}

#[test]
fn dropped_stale_reply_still_settles_the_outstanding_send() {
    let mut h = harness();
    h.shell.composer = Input::new("question".to_string());
    h.shell.send();

    h.events
        .send(CoreEvent::SessionReset { generation: 1 })
        .unwrap();
    h.events
        .send(CoreEvent::SendFailed { generation: 0 })
        .unwrap();
    h.shell.tick();

    // The stale failure is not shown, but the send it belonged to is over.
    assert!(h.shell.store.all().iter().all(|t| t.text != FALLBACK_REPLY));
    assert!(!h.shell.is_loading());
}

#[test]
fn notification_slot_holds_only_the_newest() {
    let mut h = harness();
    h.events
        .send(CoreEvent::Notification(NotificationPayload::weather_alert()))
        .unwrap();
    h.events
        .send(CoreEvent::Notification(
            NotificationPayload::subscription_confirmed("maize"),
        ))
        .unwrap();
    h.shell.tick();

    let active = h.shell.notifications.active().unwrap();
    assert_eq!(active.title, "Subscription Successful!");
    assert_eq!(active.message, "You've subscribed to alerts for maize.");

    h.shell.notifications.dismiss();
    assert!(h.shell.notifications.active().is_none());
}

#[test]
fn valid_form_submission_reaches_the_backend_and_closes() {
    let mut h = harness();
    h.shell.open_form();
    h.shell.form.crop_index = 3; // cotton
    h.shell.form.lat = "21.1458".to_string();
    h.shell.form.lon = "79.0882".to_string();

    h.shell.submit_form();
    assert!(!h.shell.form.open);
    match h.commands.try_recv() {
        Ok(AppCommand::Subscribe(sub)) => {
            assert_eq!(sub.crop.label(), "cotton");
            assert!(sub.planting_date.is_none());
        }
        other => panic!("expected Subscribe command, got {other:?}"),
    }
}

#[test]
fn invalid_form_submission_stays_open_with_an_error() {
    let mut h = harness();
    h.shell.open_form();

    h.shell.submit_form();
    assert!(h.shell.form.open);
    assert_eq!(
        h.shell.form.error.as_deref(),
        Some("Latitude and Longitude are required.")
    );
    assert!(h.commands.try_recv().is_err());
}

#[test]
fn location_lookup_round_trips_through_the_backend() {
    let mut h = harness();
    h.shell.open_form();

    h.shell.request_location();
    assert!(h.shell.form.locating);
    assert!(matches!(h.commands.try_recv(), Ok(AppCommand::Locate)));

    // A second request while one is pending is ignored.
    h.shell.request_location();
    assert!(h.commands.try_recv().is_err());

    h.events
        .send(CoreEvent::Location(Ok(Coordinates {
            lat: 26.9124,
            lon: 75.7873,
        })))
        .unwrap();
    h.shell.tick();

    assert!(!h.shell.form.locating);
    assert_eq!(h.shell.form.lat, "26.9124");
    assert_eq!(h.shell.form.lon, "75.7873");
}

#[test]
fn denied_location_degrades_to_manual_entry() {
    let mut h = harness();
    h.shell.open_form();
    h.shell.request_location();

    h.events
        .send(CoreEvent::Location(Err("permission denied".to_string())))
        .unwrap();
    h.shell.tick();

    assert_eq!(
        h.shell.form.error.as_deref(),
        Some("Could not get location. Please enter it manually.")
    );
    assert!(!h.shell.form.locating);
}
