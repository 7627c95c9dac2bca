use crate::application::{App, AppMode};
use crate::domain::{FieldDefinition, FieldType, SAVE_KEY, StepId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Tabs},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let error_height = if app.engine.load_error().is_some() { 3 } else { 0 };
    let save_height = if app.engine.message(SAVE_KEY).is_some() { 1 } else { 0 };

    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(error_height),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(save_height),
    ];
    if app.engine.record_table_visible() {
        constraints.push(Constraint::Min(6));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    render_step_tabs(f, app, chunks[0]);
    if let Some(error) = app.engine.load_error() {
        render_load_error(f, error, chunks[1]);
    }
    render_progress(f, app, chunks[2]);
    render_fields(f, app, chunks[3]);
    if let Some(text) = app.engine.message(SAVE_KEY) {
        let save = Paragraph::new(text).style(Style::default().fg(Color::Green));
        f.render_widget(save, chunks[4]);
    }
    if app.engine.record_table_visible() {
        render_records(f, app, chunks[5]);
    }
    render_status_bar(f, app, chunks[chunks.len() - 1]);

    if app.engine.is_confirmation_open() {
        render_confirmation(f);
    }
    match app.mode {
        AppMode::StepPicker => render_step_picker(f, app.step_picker_index),
        AppMode::Help => render_help_popup(f, app.help_scroll),
        _ => {}
    }
}

fn render_step_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = StepId::ALL.iter().map(|s| Line::from(s.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.engine.active_step().index())
        .block(Block::default().borders(Borders::ALL).title("Dynamic Form"))
        .style(Style::default().fg(Color::Yellow))
        .highlight_style(Style::default().bg(Color::LightBlue).fg(Color::Black));
    f.render_widget(tabs, area);
}

fn render_load_error(f: &mut Frame, error: &str, area: Rect) {
    let banner = Paragraph::new(error)
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    f.render_widget(banner, area);
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(u16::from(app.engine.progress()));
    f.render_widget(gauge, area);
}

fn display_value(field: &FieldDefinition, value: Option<&str>) -> String {
    match (field.field_type(), value) {
        (FieldType::Dropdown, None | Some("")) => format!("Select {}", field.label()),
        (FieldType::Password, Some(v)) => "*".repeat(v.chars().count()),
        (_, Some(v)) => v.to_string(),
        (_, None) => String::new(),
    }
}

fn render_fields(f: &mut Frame, app: &App, area: Rect) {
    let step = app.engine.active_step();
    let title = format!("{} (step: {})", step.title(), step);
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(schema) = app.engine.schema() else {
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let focused = matches!(app.mode, AppMode::Normal | AppMode::Editing);
    let items: Vec<ListItem> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let marker = if field.is_required() { "*" } else { " " };
            let value = display_value(field, app.engine.value(field.name()));
            let style = if focused && i == app.selected_field {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if app.form_frozen() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<18}", format!("{}{}", field.label(), marker)), style),
                Span::styled(value, style),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_records(f: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.mode, AppMode::Records | AppMode::RecordEditing);
    let message_style = Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC);

    let mut rows = Vec::new();
    for (i, record) in app.engine.record_rows().into_iter().enumerate() {
        let style = if focused && i == app.selected_record {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };
        let value = if app.engine.editing_record() == Some(record.name.as_str())
            && app.mode == AppMode::RecordEditing
        {
            format!("{}▏", app.input)
        } else {
            record.value
        };
        rows.push(Row::new(vec![Cell::from(record.name), Cell::from(value)]).style(style));
        if let Some(message) = record.message {
            rows.push(Row::new(vec![Cell::from(""), Cell::from(message)]).style(message_style));
        }
    }
    for (_, notice) in app.engine.record_notices() {
        rows.push(Row::new(vec![Cell::from(""), Cell::from(notice)]).style(message_style));
    }

    let header = Row::new(vec!["Field", "Value"]).style(Style::default().fg(Color::Yellow));
    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Form Data"))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let label = app
        .selected_definition()
        .map(|d| d.label().to_string())
        .unwrap_or_default();
    let step_keys = match app.engine.active_step() {
        StepId::Payment => "Ctrl+S: submit",
        _ => "Ctrl+S: save | Ctrl+N: next",
    };
    let text = match app.mode {
        AppMode::Normal => match app.status_message {
            Some(ref status) => status.clone(),
            None => format!(
                "↑↓: field | Enter: edit | {step_keys} | Ctrl+P: pick step | F1/?: help | q: quit"
            ),
        },
        AppMode::Editing => {
            format!("Editing {}: {} (Enter to save, Esc to cancel)", label, app.input)
        }
        AppMode::StepPicker => "↑↓: choose step | Enter: select | Esc: cancel".to_string(),
        AppMode::Help => "↑↓/jk: scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::Records => match app.status_message {
            Some(ref status) => status.clone(),
            None => {
                "↑↓: row | e: edit | d: delete | s: submit again | Tab: form | q: quit".to_string()
            }
        },
        AppMode::RecordEditing => "Enter to save, Esc to cancel".to_string(),
    };
    let style = match app.mode {
        AppMode::Editing | AppMode::RecordEditing => Style::default().fg(Color::Green),
        AppMode::Help | AppMode::StepPicker => Style::default().fg(Color::Cyan),
        AppMode::Normal | AppMode::Records => Style::default(),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_step_picker(f: &mut Frame, selected: usize) {
    let popup_area = centered(f.area(), 30, 5);
    f.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = StepId::ALL
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let style = if i == selected {
                Style::default().bg(Color::LightBlue).fg(Color::Black)
            } else {
                Style::default()
            };
            ListItem::new(step.title()).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Select Form Type")
            .style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, popup_area);
}

fn render_confirmation(f: &mut Frame) {
    let popup_area = centered(f.area(), 48, 7);
    f.render_widget(Clear, popup_area);

    let body = vec![
        Line::from(""),
        Line::from("Your form has been successfully submitted!"),
        Line::from(""),
        Line::from(Span::styled("[Enter] Close", Style::default().fg(Color::Yellow))),
    ];
    let modal = Paragraph::new(body).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Sign Up Successful")
            .style(Style::default().fg(Color::Green)),
    );
    f.render_widget(modal, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let help_widget = Paragraph::new(help_lines[start_line..end_line].join("\n"))
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("stepform Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"STEPFORM KEY REFERENCE

=== STEPS ===
The form has three steps: Personal Info, Address and Payment Info.
Values you enter are kept when you move between steps.
The progress bar shows how much of the current step is filled in.
Fields marked * are required before the form can be submitted.

=== FORM ===
↑↓ or j/k       Move between fields
Enter/F2        Edit the selected field
←→              Cycle dropdown options while editing
Ctrl+S          Save (Personal, Address) or submit (Payment)
Ctrl+N          Next step
Ctrl+P          Pick any step
Tab             Switch to the record table (after submitting)

=== EDITING ===
Enter           Keep the typed value
Esc             Discard the typed value
←→ Home End     Move the cursor
Backspace/Del   Delete characters

=== RECORD TABLE ===
↑↓ or j/k       Move between rows
e               Edit the selected value
d               Delete the selected value
s               Submit again
Tab             Back to the step form

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll this text
Home            Jump to top
Esc/F1/?/q      Close this help window

Save, edit and delete notices disappear after a few seconds."#;
