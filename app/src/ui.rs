//! Terminal rendering. Pure view over [`ChatShell`] state.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::shell::ChatShell;
use crate::store::Author;
use crate::subscribe::FormField;

pub fn draw(f: &mut Frame, shell: &mut ChatShell) {
    let screen = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Chat area
            Constraint::Length(3), // Input area
            Constraint::Length(1), // Status bar
        ])
        .split(screen);

    draw_chat(f, shell, chunks[0]);
    draw_input(f, shell, chunks[1]);
    draw_status(f, shell, chunks[2]);

    if let Some(toast) = shell.notifications.active() {
        let title = toast.title.clone();
        let message = toast.message.clone();
        draw_toast(f, &title, &message, chunks[1]);
    }

    if shell.form.open {
        draw_form(f, shell, screen);
    }
}

fn draw_chat(f: &mut Frame, shell: &mut ChatShell, area: Rect) {
    let speaking = shell.voice.speaking();

    let mut all_lines: Vec<Line> = Vec::new();
    for (index, turn) in shell.store.all().iter().enumerate() {
        let (name, style) = match turn.author {
            Author::User => ("You", Style::default().fg(Color::Cyan)),
            Author::Bot => ("Assistant", Style::default().fg(Color::Green)),
        };

        let mut header = format!("[{}]", name);
        if speaking == Some(turn.id.as_u64()) {
            header.push_str(" (speaking)");
        }
        let mut header_style = style.add_modifier(Modifier::BOLD);
        if shell.selected == Some(index) {
            header_style = header_style.add_modifier(Modifier::REVERSED);
        }
        all_lines.push(Line::from(Span::styled(header, header_style)));

        for line in turn.text.lines() {
            all_lines.push(Line::from(line.to_string()));
        }
        all_lines.push(Line::from(""));
    }

    if shell.is_loading() {
        all_lines.push(Line::from(Span::styled(
            "Assistant is typing...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    // scroll_offset=0 means pinned to the bottom; larger values scroll up.
    let total_lines = all_lines.len();
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = total_lines.saturating_sub(visible_height);
    if shell.scroll_offset > max_scroll {
        shell.scroll_offset = max_scroll;
    }
    let effective_scroll = max_scroll.saturating_sub(shell.scroll_offset);

    let chat = Paragraph::new(all_lines)
        .block(Block::default().borders(Borders::ALL).title("Farming Assistant"))
        .scroll((effective_scroll as u16, 0));
    f.render_widget(chat, area);

    if total_lines > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut state = ScrollbarState::new(max_scroll).position(effective_scroll);
        let inner = area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        });
        f.render_stateful_widget(scrollbar, inner, &mut state);
    }
}

fn draw_input(f: &mut Frame, shell: &ChatShell, area: Rect) {
    let title = if shell.voice.is_recording() {
        "Listening..."
    } else {
        "Message"
    };
    let style = if shell.voice.is_recording() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };

    let input = Paragraph::new(shell.composer.value())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);

    if !shell.form.open {
        f.set_cursor_position((
            area.x + shell.composer.visual_cursor() as u16 + 1,
            area.y + 1,
        ));
    }
}

fn draw_status(f: &mut Frame, shell: &ChatShell, area: Rect) {
    let mode = if shell.is_loading() {
        "Sending..."
    } else if shell.voice.is_recording() {
        "Recording"
    } else if shell.voice.speaking().is_some() {
        "Speaking"
    } else {
        "Ready"
    };
    let status = format!(
        " {} | {} messages | ^R voice  ^P read aloud  ^S subscribe  ^N new session  ^C quit ",
        mode,
        shell.store.len()
    );
    let bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}

fn draw_toast(f: &mut Frame, title: &str, message: &str, input_area: Rect) {
    let height = 4u16;
    let area = Rect {
        x: input_area.x,
        y: input_area.y.saturating_sub(height),
        width: input_area.width,
        height,
    };

    let toast = Paragraph::new(message.to_string())
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (Esc to dismiss)", title))
                .style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(Clear, area);
    f.render_widget(toast, area);
}

fn draw_form(f: &mut Frame, shell: &ChatShell, screen: Rect) {
    let width = screen.width.min(52);
    let height = 11u16.min(screen.height);
    let area = Rect {
        x: screen.x + (screen.width.saturating_sub(width)) / 2,
        y: screen.y + (screen.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let field_line = |label: &str, value: &str, field: FormField| {
        let marker = if shell.form.focus == field { "> " } else { "  " };
        let style = if shell.form.focus == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(Span::styled(format!("{marker}{label}: {value}"), style))
    };

    let mut lines = vec![
        field_line("Crop (←/→)", shell.form.crop().label(), FormField::Crop),
        field_line("Latitude", &shell.form.lat, FormField::Latitude),
        field_line("Longitude", &shell.form.lon, FormField::Longitude),
        field_line(
            "Planting date (YYYY-MM-DD)",
            &shell.form.planting_date,
            FormField::PlantingDate,
        ),
        Line::from(""),
    ];

    if shell.form.locating {
        lines.push(Line::from(Span::styled(
            "Locating...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(error) = &shell.form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Tab: next field  ^G: use my location  Enter: subscribe",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Subscribe to Alerts (Esc to close)"),
    );
    f.render_widget(Clear, area);
    f.render_widget(form, area);
}
