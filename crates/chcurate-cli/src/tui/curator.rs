//! Curator TUI main loop.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use chcurate_core::{Session, ToggleClick};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{CuratorState, Focus, Screen};
use super::ui;

/// Runs the curator TUI and returns the session as left by the user.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_curator(session: Session) -> Result<Session> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = CuratorState::new(session);

    let result = run_event_loop(&mut terminal, &mut state);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result?;
    Ok(state.session)
}

/// Outcome of handling one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    /// Keep running.
    Continue,
    /// Leave the TUI.
    Quit,
}

/// Main event loop. All key events pending at poll time form one batch.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut CuratorState,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if !event::poll(Duration::from_millis(100)).context("failed to poll events")? {
            continue;
        }

        let mut keys = Vec::new();
        loop {
            if let Event::Key(key) = event::read().context("failed to read event")? {
                keys.push(key);
            }
            if !event::poll(Duration::ZERO).context("failed to poll events")? {
                break;
            }
        }

        let now = chrono::Utc::now().timestamp_millis();
        if process_batch(state, &keys, now) == KeyOutcome::Quit {
            return Ok(());
        }
    }
}

/// Handles one batch of key events in order.
///
/// Consecutive expand clicks are coalesced with the most-recent-click rule;
/// pending clicks are applied before any other key runs. Clicks are stamped
/// `clicked_at`, `clicked_at + 1`, ... in arrival order.
fn process_batch(state: &mut CuratorState, keys: &[KeyEvent], clicked_at: i64) -> KeyOutcome {
    let mut clicks: Vec<ToggleClick> = Vec::new();
    let mut stamp = clicked_at;

    for key in keys.iter().filter(|key| key.kind == KeyEventKind::Press) {
        if let Some(click) = expand_click(state, key.code, stamp) {
            clicks.push(click);
            stamp = stamp.saturating_add(1);
            continue;
        }
        state.apply_expand_clicks(&clicks);
        clicks.clear();
        if handle_key(state, key.code, key.modifiers) == KeyOutcome::Quit {
            return KeyOutcome::Quit;
        }
    }

    state.apply_expand_clicks(&clicks);
    state.clamp_cursors();
    KeyOutcome::Continue
}

/// Returns the expand click a key produces, if it is one.
///
/// Enter/`l` on a card toggles its panel; Enter in the panel collapses it.
fn expand_click(state: &CuratorState, key: KeyCode, clicked_at: i64) -> Option<ToggleClick> {
    if state.screen != Screen::Modal {
        return None;
    }
    match (state.focus, key) {
        (Focus::Gallery, KeyCode::Enter | KeyCode::Char('l')) => state.expand_click(clicked_at),
        (Focus::Panel, KeyCode::Enter) => {
            state
                .session
                .open_group()
                .group_id()
                .map(|group_id| ToggleClick {
                    group_id: String::from(group_id),
                    clicked_at: Some(clicked_at),
                })
        }
        _ => None,
    }
}

/// Dispatches a key by screen and focus.
fn handle_key(state: &mut CuratorState, key: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }
    match state.screen {
        Screen::Main => handle_main_input(state, key),
        Screen::Modal => {
            handle_modal_input(state, key);
            KeyOutcome::Continue
        }
    }
}

/// Handles key input on the main screen.
fn handle_main_input(state: &mut CuratorState, key: KeyCode) -> KeyOutcome {
    match key {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Char('o') | KeyCode::Enter => state.open_modal(),
        KeyCode::Char(']') | KeyCode::PageDown => state.output_next_page(),
        KeyCode::Char('[') | KeyCode::PageUp => state.output_prev_page(),
        _ => {}
    }
    KeyOutcome::Continue
}

/// Handles key input inside the modal.
fn handle_modal_input(state: &mut CuratorState, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Char('c') => state.close_modal(),
        KeyCode::Tab | KeyCode::BackTab => state.cycle_focus(),
        KeyCode::Char('o') => open_focused_url(state),
        _ => match state.focus {
            Focus::Filters => handle_filters_input(state, key),
            Focus::Gallery => handle_gallery_input(state, key),
            Focus::Panel => handle_panel_input(state, key),
        },
    }
}

/// Handles key input with the filter selectors focused.
fn handle_filters_input(state: &mut CuratorState, key: KeyCode) {
    match key {
        KeyCode::Left | KeyCode::Char('h') => state.prev_dimension(),
        KeyCode::Right | KeyCode::Char('l') => state.next_dimension(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char(' ') => state.toggle_filter_value(),
        KeyCode::Char('x') => state.clear_filter_dimension(),
        KeyCode::Enter => state.close_modal(),
        _ => {}
    }
}

/// Handles key input with the card gallery focused.
fn handle_gallery_input(state: &mut CuratorState, key: KeyCode) {
    match key {
        KeyCode::Left => state.move_left(),
        KeyCode::Right => state.move_right(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char(' ') => state.toggle_current_card_inclusion(),
        _ => {}
    }
}

/// Handles key input with the expansion panel focused.
fn handle_panel_input(state: &mut CuratorState, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char(' ') => state.toggle_current_panel_row(),
        KeyCode::Char('a') => state.set_panel_all(true),
        KeyCode::Char('A') => state.set_panel_all(false),
        KeyCode::Char(']') | KeyCode::PageDown => state.panel_next_page(),
        KeyCode::Char('[') | KeyCode::PageUp => state.panel_prev_page(),
        _ => {}
    }
}

/// Opens the click-through or channel URL of the focused item.
fn open_focused_url(state: &CuratorState) {
    let Some(url) = state.focused_url() else {
        return;
    };
    if let Err(e) = open::that(&url) {
        tracing::debug!("failed to open {url}: {e}");
    }
}
