use crate::app::input::helpers::cycle;
use crate::app::input::InputAction;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod dashboard;
mod help;
mod predict;
mod stats;

pub fn dispatch_input(app: &mut App, key: KeyCode) -> InputAction {
    if help::handle_help_toggle(app, key) {
        return InputAction::None;
    }

    // Text entry owns the keyboard until it is closed.
    if app.filter_editing {
        dashboard::handle_filter_input(app, key);
        return InputAction::None;
    }
    if app.screen == AppScreen::Predict {
        return predict::handle_predict_input(app, key);
    }

    if app.detail_open {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace) {
            app.detail_open = false;
        }
        return InputAction::None;
    }

    if let Some(action) = handle_global_input(app, key) {
        return action;
    }

    match app.screen {
        AppScreen::Dashboard => dashboard::handle_dashboard_input(app, key),
        AppScreen::Statistics => stats::handle_stats_input(app, key),
        AppScreen::Predict => {}
    }
    InputAction::None
}

/// Keys shared by the map/list and statistics screens.
fn handle_global_input(app: &mut App, key: KeyCode) -> Option<InputAction> {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('r') => {
            app.refresh_requested = true;
            app.status_message = "Refreshing...".to_string();
            return Some(InputAction::Refresh);
        }
        KeyCode::Tab => switch_screen(app, cycle(app.screen.index(), AppScreen::ALL.len(), true)),
        KeyCode::BackTab => {
            switch_screen(app, cycle(app.screen.index(), AppScreen::ALL.len(), false));
        }
        KeyCode::Char('1') => switch_screen(app, 0),
        KeyCode::Char('2') => switch_screen(app, 1),
        KeyCode::Char('3') => switch_screen(app, 2),
        _ => return None,
    }
    Some(InputAction::None)
}

fn switch_screen(app: &mut App, index: usize) {
    if let Some(screen) = AppScreen::from_index(index) {
        app.screen = screen;
        app.detail_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewatch_core::Severity;

    #[test]
    fn tab_cycles_screens() {
        let mut app = App::new(None);
        dispatch_input(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, AppScreen::Statistics);
        dispatch_input(&mut app, KeyCode::BackTab);
        dispatch_input(&mut app, KeyCode::BackTab);
        assert_eq!(app.screen, AppScreen::Predict);
    }

    #[test]
    fn digits_type_into_the_form_on_predict() {
        let mut app = App::new(None);
        dispatch_input(&mut app, KeyCode::Char('3'));
        assert_eq!(app.screen, AppScreen::Predict);

        app.predict.fields[0].clear();
        dispatch_input(&mut app, KeyCode::Char('1'));
        assert_eq!(app.screen, AppScreen::Predict);
        assert_eq!(app.predict.fields[0], "1");

        dispatch_input(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Dashboard);
    }

    #[test]
    fn refresh_key_requests_refresh() {
        let mut app = App::new(None);
        assert_eq!(dispatch_input(&mut app, KeyCode::Char('r')), InputAction::Refresh);
        assert!(app.refresh_requested);
        assert!(app.is_busy());
    }

    #[test]
    fn help_swallows_keys() {
        let mut app = App::new(None);
        dispatch_input(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn tier_keys_collapse_sections() {
        let mut app = App::new(None);
        dispatch_input(&mut app, KeyCode::Char('m'));
        assert!(app.toggles.is_collapsed(Severity::Medium));
        dispatch_input(&mut app, KeyCode::Char('m'));
        assert!(!app.toggles.is_collapsed(Severity::Medium));
    }

    #[test]
    fn filter_editing_captures_letters() {
        let mut app = App::new(None);
        dispatch_input(&mut app, KeyCode::Char('/'));
        assert!(app.filter_editing);
        dispatch_input(&mut app, KeyCode::Char('q'));
        dispatch_input(&mut app, KeyCode::Enter);
        assert!(app.running);
        assert_eq!(app.filter, "q");
        assert!(!app.filter_editing);
    }
}
