use crate::app::state::App;
use crossterm::event::KeyCode;
use firewatch_core::Severity;

const PAGE: usize = 5;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::PageUp => app.selected_row = app.selected_row.saturating_sub(PAGE),
        KeyCode::PageDown => {
            for _ in 0..PAGE {
                app.select_next();
            }
        }
        KeyCode::Home => app.selected_row = 0,
        KeyCode::End => app.selected_row = app.list_rows().len().saturating_sub(1),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char('h') => app.toggle_tier(Severity::High),
        KeyCode::Char('m') => app.toggle_tier(Severity::Medium),
        KeyCode::Char('l') => app.toggle_tier(Severity::Low),
        KeyCode::Char('a') => app.alerts_expanded = !app.alerts_expanded,
        KeyCode::Char('/') => app.filter_editing = true,
        KeyCode::Esc => {
            if !app.filter.is_empty() {
                app.set_filter(String::new());
            }
        }
        _ => {}
    }
}

pub fn handle_filter_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.filter_editing = false;
            app.set_filter(String::new());
        }
        KeyCode::Enter => app.filter_editing = false,
        KeyCode::Backspace => {
            let mut filter = app.filter.clone();
            filter.pop();
            app.set_filter(filter);
        }
        KeyCode::Char(ch) => {
            let mut filter = app.filter.clone();
            filter.push(ch);
            app.set_filter(filter);
        }
        _ => {}
    }
}
