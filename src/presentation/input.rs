use crate::application::{App, AppMode};
use crate::domain::StepId;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        // the confirmation modal swallows everything until it is closed
        if app.engine.is_confirmation_open() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                app.close_confirmation();
            }
            return;
        }

        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::StepPicker => Self::handle_step_picker_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Records => Self::handle_records_mode(app, key),
            AppMode::RecordEditing => Self::handle_record_editing_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => {
                    if app.engine.active_step() == StepId::Payment {
                        app.submit();
                    } else {
                        app.save();
                    }
                }
                KeyCode::Char('n') => app.advance(),
                KeyCode::Char('p') => app.open_step_picker(),
                _ => {}
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_field(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_field(),
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(),
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Up => app.cycle_dropdown(false),
            KeyCode::Down => app.cycle_dropdown(true),
            _ => Self::handle_text_key(app, key),
        }
    }

    fn handle_record_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_record_edit(),
            KeyCode::Esc => app.cancel_record_edit(),
            _ => Self::handle_text_key(app, key),
        }
    }

    /// Cursor movement and typing shared by both editing modes. Dropdowns
    /// take ←→ as option cycling instead.
    fn handle_text_key(app: &mut App, key: KeyCode) {
        let dropdown = app.mode == AppMode::Editing
            && app
                .selected_definition()
                .is_some_and(|f| !f.options().is_empty());
        match key {
            KeyCode::Left if dropdown => app.cycle_dropdown(false),
            KeyCode::Right if dropdown => app.cycle_dropdown(true),
            _ if dropdown => {}
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_step_picker_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_step_picker(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_step_picker(true),
            KeyCode::Enter => app.choose_step(),
            KeyCode::Esc => app.close_popup(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_popup();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_records_mode(app: &mut App, key: KeyCode) {
        app.status_message = None;
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_record(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_record(),
            KeyCode::Char('e') | KeyCode::Enter => app.start_record_edit(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_record(),
            KeyCode::Char('s') => app.resubmit(),
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::FormEngine;
    use crate::domain::SchemaRegistry;

    fn app() -> App {
        App::new(FormEngine::new(SchemaRegistry::standard().unwrap()))
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn ctrl(app: &mut App, c: char) {
        InputHandler::handle_key_event(app, KeyCode::Char(c), KeyModifiers::CONTROL);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_type_into_field() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Editing);
        type_text(&mut app, "Anm");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "n");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.engine.value("firstName"), Some("Ann"));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_save_and_next_bindings() {
        let mut app = app();
        ctrl(&mut app, 's');
        assert_eq!(app.engine.message("save"), Some("Saved Personal Data"));

        ctrl(&mut app, 'n');
        assert_eq!(app.engine.active_step(), StepId::Address);
        ctrl(&mut app, 'n');
        ctrl(&mut app, 'n');
        assert_eq!(app.engine.active_step(), StepId::Payment);
    }

    #[test]
    fn test_ctrl_s_on_payment_submits() {
        let mut app = app();
        app.engine.select_step(StepId::Payment);
        ctrl(&mut app, 's');
        assert!(!app.engine.is_submitted());
        assert!(app.status_message.is_some());

        for name in ["cardNumber", "expiryDate", "cvv", "cardholderName"] {
            app.engine.set_value(name, "x");
        }
        ctrl(&mut app, 's');
        assert!(app.engine.is_confirmation_open());

        // keys other than Enter/Esc are ignored by the modal
        press(&mut app, KeyCode::Char('j'));
        assert!(app.engine.is_confirmation_open());
        press(&mut app, KeyCode::Enter);
        assert!(!app.engine.is_confirmation_open());
        assert_eq!(app.mode, AppMode::Records);
    }

    #[test]
    fn test_step_picker_keys() {
        let mut app = app();
        ctrl(&mut app, 'p');
        assert_eq!(app.mode, AppMode::StepPicker);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine.active_step(), StepId::Address);

        ctrl(&mut app, 'p');
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.engine.active_step(), StepId::Address);
    }

    #[test]
    fn test_dropdown_arrow_keys() {
        let mut app = app();
        app.engine.select_step(StepId::Address);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        // typing is ignored on a dropdown
        type_text(&mut app, "zz");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine.value("state"), Some("Texas"));
    }

    #[test]
    fn test_record_table_keys() {
        let mut app = app();
        app.engine.set_value("firstName", "Ann");
        app.engine.set_value("lastName", "Lee");
        app.engine.submit_final();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Records);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        assert!(app.engine.value("lastName").is_none());
        assert_eq!(
            app.engine.message("lastName"),
            Some("Field \"lastName\" has been deleted.")
        );

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, AppMode::RecordEditing);
        press(&mut app, KeyCode::End);
        type_text(&mut app, "e");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine.value("firstName"), Some("Anne"));

        press(&mut app, KeyCode::Char('s'));
        assert!(app.engine.is_confirmation_open());
    }

    #[test]
    fn test_help_opens_and_closes() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.help_scroll, 1);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Normal);
    }
}
