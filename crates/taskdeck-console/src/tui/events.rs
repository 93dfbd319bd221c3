/*
[INPUT]:  Key presses forwarded by the terminal input pump
[OUTPUT]: AppState intents (navigation, search, form edits, store operations)
[POS]:    TUI key routing
[UPDATE]: When changing keybindings or modal precedence
*/

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::AppState;

/// Route a key press. Overlays take precedence in the order they are drawn
/// on top: form, delete confirmation, history, search line, then the table.
pub(super) fn handle_key_event(app: &mut AppState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.form.is_open() {
        handle_form_key(app, key.code);
    } else if app.pending_delete.is_some() {
        handle_confirm_key(app, key.code);
    } else if app.viewer.is_visible() {
        handle_history_key(app, key.code);
    } else if app.search.editing {
        handle_search_key(app, key.code);
    } else {
        handle_table_key(app, key.code);
    }
}

fn handle_table_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('/') | KeyCode::Char('f') => app.begin_search(),
        KeyCode::Esc => {
            if app.snapshot.last_query.is_some() || !app.search.input.is_empty() {
                app.clear_search();
            }
        }
        KeyCode::Char('n') => app.open_create(),
        KeyCode::Char('e') => app.open_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('x') => app.execute_selected(),
        KeyCode::Char('h') | KeyCode::Enter => app.open_history(),
        KeyCode::Char('l') => app.show_logs = !app.show_logs,
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Left | KeyCode::PageUp => app.prev_page(),
        KeyCode::Right | KeyCode::PageDown => app.next_page(),
        _ => {}
    }
}

fn handle_search_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.search.editing = false,
        KeyCode::Backspace => {
            app.search.input.pop();
        }
        KeyCode::Char(ch) => app.search.input.push(ch),
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Esc => app.form.close(),
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),
        KeyCode::Backspace => app.form.pop_char(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Char(ch) => app.form.push_char(ch),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => app.pending_delete = None,
        _ => {}
    }
}

fn handle_history_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => app.viewer.close(),
        KeyCode::Left | KeyCode::PageUp => app.viewer.prev_page(),
        KeyCode::Right | KeyCode::PageDown => app.viewer.next_page(),
        _ => {}
    }
}
