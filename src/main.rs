//! Aptos Counter - Actor-based terminal client for the counter module
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Session Layer (Tokio) - wallet signing and ledger calls

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use aptos_counter_tui::constants::{counter_resource_type, APP_NAME, APP_VERSION, LOG_FILE_NAME, NETWORK};
use aptos_counter_tui::messages::ui_events::key_to_ui_event;
use aptos_counter_tui::messages::{RenderState, SessionCommand, SessionEvent, UiEvent};
use aptos_counter_tui::session::{CounterAction, SessionActor, Synchronizer};
use aptos_counter_tui::storage::Storage;
use aptos_counter_tui::ui::{centered_rect, connection_indicator, error_banner, key_hint, phase_color, phase_label};
use aptos_counter_tui::{AppActor, KeyfileWallet, RestClient};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Settings and last session
    let storage = Storage::new();
    let settings = storage.load_settings()?;
    let memory = storage.load_session().unwrap_or_default();
    let wallets: Vec<String> = settings.wallets.iter().map(|w| w.name.clone()).collect();
    let auto_connect = memory
        .last_wallet
        .filter(|name| settings.auto_connect && wallets.contains(name));
    tracing::info!(
        network = NETWORK.as_str(),
        resource = %counter_resource_type(),
        wallets = wallets.len(),
        "Starting"
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (session_cmd_tx, session_cmd_rx) = mpsc::unbounded_channel::<SessionCommand>();
    let (session_event_tx, session_event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn session actor
    let client = RestClient::new(NETWORK);
    let wallet = KeyfileWallet::new(settings.wallets, client.clone());
    let session_actor = SessionActor::new(Synchronizer::new(wallet, client), session_event_tx)
        .with_storage(storage);
    let view_rx = session_actor.view();
    tokio::spawn(session_actor.run(session_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(wallets, session_cmd_tx, render_tx).with_auto_connect(auto_connect);
    tokio::spawn(app_actor.run(ui_rx, session_event_rx, view_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) =
                    key_to_ui_event(key, current_state.connected(), current_state.show_help)
                {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title bar
            Constraint::Min(0),     // Card
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    let card = centered_rect(60, 80, main_chunks[1]);
    if state.connected() {
        draw_counter_card(f, state, card);
    } else {
        draw_wallet_card(f, state, card);
    }

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(" "),
        connection_indicator(state.connected()),
        Span::styled(
            format!("  {}  {}", state.network, state.module),
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_wallet_card(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Wallet ");

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Connect your wallet to interact with the Aptos blockchain.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    if let Some(name) = &state.connecting {
        lines.push(Line::from(Span::styled(
            format!("Connecting {}...", name),
            Style::default().fg(Color::Cyan),
        )));
    } else if state.wallets.is_empty() {
        lines.push(Line::from(Span::styled(
            "No compatible wallets found. Add one to ~/.aptos-counter/settings.yaml.",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        for (i, name) in state.wallets.iter().enumerate().take(9) {
            lines.push(Line::from(key_hint(&(i + 1).to_string(), &format!("Connect {}", name), true)));
        }
    }

    if let Some(error) = &state.view.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_counter_card(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Counter ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let error_height = if state.view.error.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Account
            Constraint::Length(error_height),  // Error banner
            Constraint::Min(3),                // Counter
            Constraint::Length(2),             // Actions
        ])
        .split(inner);

    // Account line
    let account = state.account.map(|a| a.short()).unwrap_or_default();
    let mut spans = vec![Span::styled(account, Style::default().fg(Color::Gray))];
    if let Some(name) = &state.wallet_name {
        spans.push(Span::styled(format!(" ({})  ", name), Style::default().fg(Color::DarkGray)));
    }
    spans.extend(key_hint("d", "Disconnect", true));
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    if let Some(error) = &state.view.error {
        f.render_widget(error_banner(error), chunks[1]);
    }

    let view = &state.view;
    let (body, actions): (Vec<Line>, Vec<Span>) = if view.is_loading {
        (
            vec![Line::from(Span::styled("Loading...", Style::default().fg(Color::Cyan)))],
            Vec::new(),
        )
    } else {
        match view.count {
            None => {
                let initializing = state.pending_action == Some(CounterAction::Initialize);
                let label = if initializing { "Initializing..." } else { "Initialize Counter" };
                (
                    vec![Line::from(Span::styled(
                        "No counter found for this account.",
                        Style::default().fg(Color::Gray),
                    ))],
                    key_hint("i", label, state.action_enabled(CounterAction::Initialize)),
                )
            }
            Some(count) => {
                let mut actions = key_hint("-", "Decrement", state.action_enabled(CounterAction::Decrement));
                actions.extend(key_hint("+", "Increment", state.action_enabled(CounterAction::Increment)));
                actions.extend(key_hint("r", "Reset", state.action_enabled(CounterAction::Reset)));
                (
                    vec![Line::from(Span::styled(
                        count.to_string(),
                        Style::default().fg(Color::LightBlue).bold(),
                    ))],
                    actions,
                )
            }
        }
    };

    let counter_area = chunks[2];
    let top_pad = counter_area.height.saturating_sub(1) / 2;
    let mut body_lines = vec![Line::from(""); top_pad as usize];
    body_lines.extend(body);
    f.render_widget(Paragraph::new(body_lines).alignment(Alignment::Center), counter_area);

    let mut action_spans = actions;
    if state.pending_action.is_some() {
        action_spans.push(Span::styled(" waiting for confirmation", Style::default().fg(Color::Cyan)));
    }
    f.render_widget(
        Paragraph::new(Line::from(action_spans)).alignment(Alignment::Center),
        chunks[3],
    );
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = match &state.notice {
        Some(notice) => format!(" {} ", notice),
        None if state.connected() => String::from(" +/-:change | r:reset | f:refresh | d:disconnect | ?:help | q:quit "),
        None => String::from(" 1-9:connect wallet | ?:help | q:quit "),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", phase_label(state.phase)),
            Style::default().fg(phase_color(state.phase)).bold(),
        ),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = format!(
        r#"
 {} v{} - Keyboard Shortcuts

 WALLET
   1-9 / Enter        Connect a listed wallet
   d                  Disconnect

 COUNTER
   i                  Initialize counter
   + / k / ↑          Increment
   - / j / ↓          Decrement
   r                  Reset to zero
   f                  Refresh from chain

 GENERAL
   ?                  Toggle this help
   q / Esc / Ctrl+C   Quit

 Press any key to close...
"#,
        APP_NAME, APP_VERSION
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
