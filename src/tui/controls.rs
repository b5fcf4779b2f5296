//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::{App, Mode};

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }
    match app.mode {
        Mode::Normal => handle_normal(app, key.code),
        Mode::Input => handle_input(app, key.code),
    }
}

fn handle_normal(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.adjust(1.0),
        KeyCode::Char('-') | KeyCode::Left => app.adjust(-1.0),
        KeyCode::PageUp => app.adjust(10.0),
        KeyCode::PageDown => app.adjust(-10.0),
        KeyCode::Char('1') => app.switch_preset("default"),
        KeyCode::Char('2') => app.switch_preset("mountain_intake"),
        KeyCode::Char('3') => app.switch_preset("aqueduct"),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('e') => app.export_report(),
        KeyCode::Char('i') | KeyCode::Enter => app.start_input(),
        _ => {}
    }
}

fn handle_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.queue_question(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::runtime::Field;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn arrows_edit_selected_field() {
        let mut app = App::from_preset("default").unwrap();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, Field::Head);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.plant.head_m(), 85.0);
    }

    #[test]
    fn typing_q_in_input_mode_does_not_quit() {
        let mut app = App::from_preset("default").unwrap();
        press(&mut app, KeyCode::Char('i'));
        for c in "q?".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!app.quit);
        assert_eq!(app.input, "q?");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.input.is_empty());
    }

    #[test]
    fn enter_queues_question() {
        let mut app = App::from_preset("default").unwrap();
        press(&mut app, KeyCode::Enter);
        for c in "why".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.pending);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn preset_keys_switch_plant() {
        let mut app = App::from_preset("default").unwrap();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.preset_name, "aqueduct");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }
}
