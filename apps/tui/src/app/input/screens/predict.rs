use crate::app::input::InputAction;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_predict_input(app: &mut App, key: KeyCode) -> InputAction {
    let form = &mut app.predict;
    match key {
        KeyCode::Esc => app.screen = AppScreen::Dashboard,
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter => form.submit(),
        KeyCode::Backspace => form.pop(),
        KeyCode::Delete => form.reset(),
        KeyCode::Char(ch) => form.push(ch),
        _ => {}
    }
    InputAction::None
}
