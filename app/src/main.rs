use std::io;
use std::sync::Arc;
use std::time::Duration;

use agrichat::backend::{DEFAULT_MODEL, SYSTEM_INSTRUCTION, spawn_backend};
use agrichat::shell::ChatShell;
use agrichat::ui;
use anyhow::Result;
use clap::Parser;
use config::{Settings, load_env_file};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use llm::{ChatSession, GeminiProvider};
use ratatui::{Terminal, backend::CrosstermBackend};
#[cfg(not(debug_assertions))]
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tui_input::backend::crossterm::EventHandler;
use voice::{DummyCapture, DummySynthesis, VoiceCoordinator};

#[derive(Parser, Debug)]
#[command(name = "agrichat", about = "Farmer support chat TUI with voice and alerts")]
struct Args {
    /// Gemini model ID
    #[arg(short, long)]
    model: Option<String>,

    /// Override the Gemini API base URL (e.g. a local proxy)
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds before the demo weather alert fires
    #[arg(long)]
    notify_after: Option<u64>,
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Logs always go to a file: stderr would corrupt the raw-mode screen.
    // Dev runs get a fresh local file, release runs roll daily under the
    // platform data dir.
    #[cfg(debug_assertions)]
    let (non_blocking, guard) = {
        let path = std::path::PathBuf::from("./agrichat.log");
        let _ = std::fs::remove_file(&path);
        let file = std::fs::File::create(&path)?;
        tracing_appender::non_blocking(file)
    };

    #[cfg(not(debug_assertions))]
    let (non_blocking, guard) = {
        let log_dir = config::PathManager::logs_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine log directory"))?;
        config::PathManager::ensure_dirs_exist()?;
        let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "agrichat.log");
        tracing_appender::non_blocking(appender)
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();
    Ok(guard)
}

fn main() -> Result<()> {
    load_env_file();
    let args = Args::parse();
    let settings = Settings::load();
    let _log_guard = init_logging()?;
    tracing::info!("starting agrichat");

    // No key means no chatbot; fail before touching the terminal.
    let api_key = config::gemini_api_key()?;

    let model_name = args
        .model
        .or(settings.default_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let base_url = args.base_url.or(settings.gemini_base_url);
    let notify_after = Duration::from_secs(
        args.notify_after
            .or(settings.notify_after_secs)
            .unwrap_or(15),
    );

    let provider = match &base_url {
        Some(url) => GeminiProvider::new(url, &api_key),
        None => GeminiProvider::default(&api_key),
    };
    let model = provider.create_chat_model(&model_name);
    let session = ChatSession::new(model, SYSTEM_INSTRUCTION);

    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let backend_handle = spawn_backend(
        cmd_rx,
        event_tx,
        session,
        Arc::new(agrichat::subscribe::UnavailableLocator),
        notify_after,
    );

    let voice = VoiceCoordinator::new(Box::new(DummyCapture), Box::new(DummySynthesis));
    let mut shell = ChatShell::new(cmd_tx, event_rx, voice);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut shell);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    drop(shell); // closes the command channel so the backend thread exits
    let _ = backend_handle.join();

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    shell: &mut ChatShell,
) -> Result<()> {
    loop {
        shell.tick();
        terminal.draw(|f| ui::draw(f, shell))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !handle_key(shell, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => shell.scroll_up(3),
                MouseEventKind::ScrollDown => shell.scroll_down(3),
                _ => {}
            },
            _ => {}
        }
    }
}

/// Handle one key press. Returns false to quit.
fn handle_key(shell: &mut ChatShell, key: crossterm::event::KeyEvent) -> bool {
    // Global bindings first.
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return false,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
            shell.toggle_recording();
            return true;
        }
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
            shell.toggle_play_selected();
            return true;
        }
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            shell.open_form();
            return true;
        }
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
            shell.reset_session();
            return true;
        }
        _ => {}
    }

    if shell.form.open {
        return handle_form_key(shell, key);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => shell.send(),
        (KeyCode::Esc, _) => {
            if shell.notifications.active().is_some() {
                shell.notifications.dismiss();
            } else {
                shell.selected = None;
            }
        }
        (KeyCode::Up, KeyModifiers::ALT) => shell.select_prev(),
        (KeyCode::Down, KeyModifiers::ALT) => shell.select_next(),
        (KeyCode::Up, _) => shell.scroll_up(1),
        (KeyCode::Down, _) => shell.scroll_down(1),
        _ => {
            shell.composer.handle_event(&Event::Key(key));
        }
    }
    true
}

fn handle_form_key(shell: &mut ChatShell, key: crossterm::event::KeyEvent) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => shell.close_form(),
        (KeyCode::Enter, _) => shell.submit_form(),
        (KeyCode::Tab, _) | (KeyCode::Down, _) => shell.form.next_field(),
        (KeyCode::Char('g'), KeyModifiers::CONTROL) => shell.request_location(),
        (KeyCode::Left, _) => {
            if shell.form.focus == agrichat::subscribe::FormField::Crop {
                shell.form.cycle_crop(false);
            }
        }
        (KeyCode::Right, _) => {
            if shell.form.focus == agrichat::subscribe::FormField::Crop {
                shell.form.cycle_crop(true);
            }
        }
        (KeyCode::Backspace, _) => {
            if let Some(text) = shell.form.focused_text() {
                text.pop();
            }
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            if let Some(text) = shell.form.focused_text() {
                text.push(c);
            }
        }
        _ => {}
    }
    true
}
