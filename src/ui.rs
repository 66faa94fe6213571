use ratatui::{prelude::*, widgets::*};

use crate::session::Phase;

/// Green or red dot next to the title
pub fn connection_indicator(connected: bool) -> Span<'static> {
    if connected {
        Span::styled("●", Style::default().fg(Color::Green))
    } else {
        Span::styled("●", Style::default().fg(Color::Red))
    }
}

/// `[k] label`, dimmed when the action is unavailable
pub fn key_hint(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Yellow).bold(),
            Style::default().fg(Color::White),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    vec![
        Span::styled(format!("[{}]", key), key_style),
        Span::styled(format!(" {}  ", label), label_style),
    ]
}

/// Short label for the status bar
pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Disconnected => "disconnected",
        Phase::Loading => "loading",
        Phase::Uninitialized => "no counter",
        Phase::Active => "active",
        Phase::Error => "error",
    }
}

pub fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Disconnected => Color::Red,
        Phase::Loading => Color::Cyan,
        Phase::Uninitialized => Color::Yellow,
        Phase::Active => Color::Green,
        Phase::Error => Color::Magenta,
    }
}

/// Red banner for the error message
pub fn error_banner(message: &str) -> Paragraph<'_> {
    Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
