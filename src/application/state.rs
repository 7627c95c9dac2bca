//! Application state for the terminal form.
//!
//! `App` wraps the [`FormEngine`] with the bits only the terminal needs:
//! which field or record row is highlighted, the text being typed, and
//! which popup is open.

use crate::application::FormEngine;
use crate::domain::{FieldDefinition, FieldType, StepId};

/// Determines how key presses are interpreted and what is drawn on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Moving between the fields of the active step
    Normal,
    /// Typing into the selected field
    Editing,
    /// Step picker popup is open
    StepPicker,
    /// Help screen is displayed
    Help,
    /// Moving between rows of the record table
    Records,
    /// Typing a new value for a record row
    RecordEditing,
}

/// Terminal-side state around a form session.
#[derive(Debug)]
pub struct App {
    pub engine: FormEngine,
    pub mode: AppMode,
    /// Highlighted field of the active step (zero-based)
    pub selected_field: usize,
    /// Highlighted row of the record table (zero-based)
    pub selected_record: usize,
    /// Highlighted entry of the step picker
    pub step_picker_index: usize,
    /// Text being typed while editing
    pub input: String,
    /// Cursor position in `input`, counted in characters
    pub cursor_position: usize,
    /// Position in `""` followed by the options, while editing a dropdown
    pub dropdown_index: usize,
    pub help_scroll: usize,
    /// Persistent status line, cleared by the next navigation key
    pub status_message: Option<String>,
}

impl App {
    pub fn new(engine: FormEngine) -> Self {
        Self {
            engine,
            mode: AppMode::Normal,
            selected_field: 0,
            selected_record: 0,
            step_picker_index: 0,
            input: String::new(),
            cursor_position: 0,
            dropdown_index: 0,
            help_scroll: 0,
            status_message: None,
        }
    }

    pub fn selected_definition(&self) -> Option<&FieldDefinition> {
        self.engine
            .schema()
            .and_then(|schema| schema.fields().get(self.selected_field))
    }

    /// Once submitted, values can only be changed from the record table.
    pub fn form_frozen(&self) -> bool {
        self.engine.is_submitted()
    }

    pub fn select_next_field(&mut self) {
        let count = self.engine.schema().map(|s| s.len()).unwrap_or(0);
        if self.selected_field + 1 < count {
            self.selected_field += 1;
        }
    }

    pub fn select_previous_field(&mut self) {
        self.selected_field = self.selected_field.saturating_sub(1);
    }

    /// Opens the highlighted field for typing, or for option cycling if it
    /// is a dropdown.
    pub fn start_editing(&mut self) {
        if self.form_frozen() {
            self.status_message =
                Some("Form submitted. Edit values from the record table (Tab).".to_string());
            return;
        }
        let Some(field) = self.selected_definition() else {
            return;
        };
        let current = self.engine.value(field.name()).unwrap_or_default().to_string();
        self.dropdown_index = if field.field_type() == FieldType::Dropdown {
            field
                .options()
                .iter()
                .position(|o| *o == current)
                .map(|i| i + 1)
                .unwrap_or(0)
        } else {
            0
        };
        self.load_input(current);
        self.mode = AppMode::Editing;
    }

    /// Steps through `""` and the dropdown options, wrapping at both ends.
    pub fn cycle_dropdown(&mut self, forward: bool) {
        let options = match self.selected_definition() {
            Some(field) if field.field_type() == FieldType::Dropdown => field.options().to_vec(),
            _ => return,
        };
        let choices = options.len() + 1;
        self.dropdown_index = if forward {
            (self.dropdown_index + 1) % choices
        } else {
            (self.dropdown_index + choices - 1) % choices
        };
        let value = match self.dropdown_index {
            0 => String::new(),
            i => options[i - 1].clone(),
        };
        self.load_input(value);
    }

    /// Stores the typed value and moves to the next field.
    pub fn finish_editing(&mut self) {
        if let Some(name) = self.selected_definition().map(|f| f.name().to_string()) {
            let value = std::mem::take(&mut self.input);
            self.engine.set_value(&name, value);
        }
        self.select_next_field();
        self.mode = AppMode::Normal;
        self.clear_input();
    }

    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.clear_input();
    }

    pub fn open_step_picker(&mut self) {
        self.step_picker_index = self.engine.active_step().index();
        self.mode = AppMode::StepPicker;
    }

    pub fn move_step_picker(&mut self, forward: bool) {
        let last = StepId::ALL.len() - 1;
        self.step_picker_index = if forward {
            (self.step_picker_index + 1).min(last)
        } else {
            self.step_picker_index.saturating_sub(1)
        };
    }

    pub fn choose_step(&mut self) {
        if let Some(step) = StepId::ALL.get(self.step_picker_index) {
            self.engine.select_step(*step);
        }
        self.selected_field = 0;
        self.mode = AppMode::Normal;
    }

    pub fn close_popup(&mut self) {
        self.mode = if self.engine.record_table_visible() && self.form_frozen() {
            AppMode::Records
        } else {
            AppMode::Normal
        };
    }

    pub fn save(&mut self) {
        self.engine.save();
    }

    pub fn advance(&mut self) {
        if self.engine.advance_step() {
            self.selected_field = 0;
        }
    }

    /// Submits from the payment step once every required field there is
    /// filled; otherwise names the missing fields on the status line.
    pub fn submit(&mut self) {
        if self.engine.active_step() != StepId::Payment {
            return;
        }
        let missing: Vec<&str> = self
            .engine
            .missing_required()
            .into_iter()
            .map(|f| f.label())
            .collect();
        if !missing.is_empty() {
            self.status_message = Some(format!("Please fill in: {}", missing.join(", ")));
            return;
        }
        self.status_message = None;
        self.engine.submit_final();
    }

    pub fn close_confirmation(&mut self) {
        self.engine.close_confirmation();
        if self.engine.record_table_visible() {
            self.mode = AppMode::Records;
            self.clamp_record_selection();
        }
    }

    /// Switches focus between the step form and the record table.
    pub fn toggle_focus(&mut self) {
        if !self.engine.record_table_visible() {
            return;
        }
        self.mode = match self.mode {
            AppMode::Records => AppMode::Normal,
            _ => AppMode::Records,
        };
        self.clamp_record_selection();
    }

    pub fn select_next_record(&mut self) {
        if self.selected_record + 1 < self.engine.values().len() {
            self.selected_record += 1;
        }
    }

    pub fn select_previous_record(&mut self) {
        self.selected_record = self.selected_record.saturating_sub(1);
    }

    fn selected_record_name(&self) -> Option<String> {
        self.engine
            .values()
            .into_iter()
            .nth(self.selected_record)
            .map(|(name, _)| name)
    }

    pub fn start_record_edit(&mut self) {
        let Some(name) = self.selected_record_name() else {
            return;
        };
        if self.engine.edit_field(&name) {
            let value = self.engine.value(&name).unwrap_or_default().to_string();
            self.load_input(value);
            self.mode = AppMode::RecordEditing;
        }
    }

    pub fn finish_record_edit(&mut self) {
        if let Some(name) = self.engine.editing_record().map(str::to_string) {
            let value = std::mem::take(&mut self.input);
            self.engine.set_value(&name, value);
        }
        self.engine.finish_record_edit();
        self.mode = AppMode::Records;
        self.clear_input();
    }

    pub fn cancel_record_edit(&mut self) {
        self.engine.finish_record_edit();
        self.mode = AppMode::Records;
        self.clear_input();
    }

    pub fn delete_selected_record(&mut self) {
        if let Some(name) = self.selected_record_name() {
            self.engine.delete_value(&name);
            self.clamp_record_selection();
        }
    }

    pub fn resubmit(&mut self) {
        self.engine.resubmit();
    }

    pub fn tick(&mut self) {
        self.engine.tick();
    }

    fn clamp_record_selection(&mut self) {
        let rows = self.engine.values().len();
        self.selected_record = self.selected_record.min(rows.saturating_sub(1));
    }

    fn load_input(&mut self, value: String) {
        self.cursor_position = value.chars().count();
        self.input = value;
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            let at = self.byte_offset(self.cursor_position - 1);
            self.input.remove(at);
            self.cursor_position -= 1;
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            let at = self.byte_offset(self.cursor_position);
            self.input.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SchemaRegistry;

    fn app() -> App {
        App::new(FormEngine::new(SchemaRegistry::standard().unwrap()))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    fn fill_payment(app: &mut App) {
        app.engine.select_step(StepId::Payment);
        for (name, value) in [
            ("cardNumber", "4111111111111111"),
            ("expiryDate", "2030-01-01"),
            ("cvv", "123"),
            ("cardholderName", "Ann Lee"),
        ] {
            app.engine.set_value(name, value);
        }
    }

    #[test]
    fn test_app_default_state() {
        let app = app();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.selected_field, 0);
        assert_eq!(app.selected_definition().unwrap().name(), "firstName");
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_edit_field_and_move_down() {
        let mut app = app();
        app.start_editing();
        assert_eq!(app.mode, AppMode::Editing);
        type_text(&mut app, "Ann");
        app.finish_editing();

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.engine.value("firstName"), Some("Ann"));
        assert_eq!(app.selected_field, 1);
        assert_eq!(app.engine.progress(), 33);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_start_editing_loads_existing_value() {
        let mut app = app();
        app.engine.set_value("firstName", "Zoë");
        app.start_editing();
        assert_eq!(app.input, "Zoë");
        assert_eq!(app.cursor_position, 3);

        app.delete_before_cursor();
        app.insert_char('e');
        assert_eq!(app.input, "Zoe");
    }

    #[test]
    fn test_cancel_editing_keeps_value() {
        let mut app = app();
        app.engine.set_value("firstName", "Ann");
        app.start_editing();
        type_text(&mut app, "xyz");
        app.cancel_editing();
        assert_eq!(app.engine.value("firstName"), Some("Ann"));
        assert_eq!(app.selected_field, 0);
    }

    #[test]
    fn test_cursor_editing() {
        let mut app = app();
        app.start_editing();
        type_text(&mut app, "Ann");
        app.move_cursor_home();
        app.delete_at_cursor();
        assert_eq!(app.input, "nn");
        app.insert_char('A');
        app.move_cursor_end();
        app.move_cursor_right();
        assert_eq!(app.cursor_position, 3);
        app.move_cursor_left();
        app.delete_before_cursor();
        assert_eq!(app.input, "An");
    }

    #[test]
    fn test_dropdown_cycles_through_blank_and_options() {
        let mut app = app();
        app.engine.select_step(StepId::Address);
        app.selected_field = 2;
        app.start_editing();
        assert_eq!(app.input, "");

        app.cycle_dropdown(true);
        assert_eq!(app.input, "California");
        app.cycle_dropdown(false);
        app.cycle_dropdown(false);
        assert_eq!(app.input, "New York");
        app.finish_editing();
        assert_eq!(app.engine.value("state"), Some("New York"));

        app.selected_field = 2;
        app.start_editing();
        assert_eq!(app.dropdown_index, 3);
    }

    #[test]
    fn test_field_selection_is_clamped() {
        let mut app = app();
        app.select_previous_field();
        assert_eq!(app.selected_field, 0);
        for _ in 0..10 {
            app.select_next_field();
        }
        assert_eq!(app.selected_field, 2);
    }

    #[test]
    fn test_step_picker() {
        let mut app = app();
        app.selected_field = 2;
        app.open_step_picker();
        assert_eq!(app.mode, AppMode::StepPicker);
        assert_eq!(app.step_picker_index, 0);
        app.move_step_picker(true);
        app.move_step_picker(true);
        app.move_step_picker(true);
        assert_eq!(app.step_picker_index, 2);
        app.choose_step();
        assert_eq!(app.engine.active_step(), StepId::Payment);
        assert_eq!(app.selected_field, 0);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_submit_requires_payment_fields() {
        let mut app = app();
        app.submit();
        assert!(!app.engine.is_submitted());

        app.engine.select_step(StepId::Payment);
        app.engine.set_value("cardNumber", "4111");
        app.submit();
        assert!(!app.engine.is_submitted());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Please fill in: Expiry Date, CVV, Cardholder Name")
        );
    }

    #[test]
    fn test_submit_confirm_then_records() {
        let mut app = app();
        app.engine.set_value("firstName", "Ann");
        fill_payment(&mut app);
        app.submit();
        assert!(app.engine.is_submitted());
        assert!(app.engine.is_confirmation_open());
        assert!(app.status_message.is_none());

        app.close_confirmation();
        assert_eq!(app.mode, AppMode::Records);
        assert!(app.engine.record_table_visible());

        // the step form is frozen now
        app.toggle_focus();
        assert_eq!(app.mode, AppMode::Normal);
        app.start_editing();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_record_edit_and_delete() {
        let mut app = app();
        app.engine.set_value("firstName", "Ann");
        fill_payment(&mut app);
        app.submit();
        app.close_confirmation();

        app.start_record_edit();
        assert_eq!(app.mode, AppMode::RecordEditing);
        assert_eq!(app.input, "Ann");
        assert_eq!(
            app.engine.message("firstName"),
            Some("Field \"firstName\" is now editable.")
        );
        type_text(&mut app, "e");
        app.finish_record_edit();
        assert_eq!(app.mode, AppMode::Records);
        assert_eq!(app.engine.value("firstName"), Some("Anne"));

        for _ in 0..10 {
            app.select_next_record();
        }
        assert_eq!(app.selected_record, 4);
        app.delete_selected_record();
        assert!(app.engine.value("cardholderName").is_none());
        assert_eq!(app.selected_record, 3);
        assert_eq!(app.engine.record_notices().len(), 1);
    }

    #[test]
    fn test_resubmit_reopens_confirmation() {
        let mut app = app();
        fill_payment(&mut app);
        app.submit();
        app.close_confirmation();
        app.resubmit();
        assert!(app.engine.is_confirmation_open());
        app.close_confirmation();
        assert_eq!(app.mode, AppMode::Records);
    }
}
