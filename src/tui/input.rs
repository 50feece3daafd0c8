//! Input handling for the TUI.
//!
//! Maps keyboard events to wizard actions for the current step.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Step;
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Global shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return app.quit(),
            KeyCode::Char('r') => return app.reset(),
            _ => {}
        }
    }

    match app.step() {
        Step::Intro => handle_intro(key, app),
        Step::Face => handle_face(key, app),
        Step::Deconstruct => handle_deconstruct(key, app),
        Step::Release => handle_release(key, app),
        Step::Cope => handle_cope(key, app),
    }
}

fn handle_intro(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.start(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

/// Text entry. Typing is ignored while the analysis is in flight.
fn handle_face(key: KeyEvent, app: &mut App) {
    if app.is_busy() {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            app.enter_char('\n');
        }
        KeyCode::Enter => {
            if !app.input.trim().is_empty() {
                app.submit_input();
            }
        }
        KeyCode::Char('j') if ctrl => app.enter_char('\n'),
        KeyCode::Char('u') if ctrl => app.clear_input(),
        KeyCode::Char(c) if !ctrl => app.enter_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        _ => {}
    }
}

fn handle_deconstruct(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => app.next(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_release(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.request_plan(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_cope(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Enter | KeyCode::Char('r') => app.reset(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}
