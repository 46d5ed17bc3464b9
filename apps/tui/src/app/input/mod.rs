mod helpers;
pub mod screens;

use crate::app::state::App;
use crossterm::event::KeyCode;

/// Work the event loop has to do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Refresh,
}

pub fn handle_input(app: &mut App, key: KeyCode) -> InputAction {
    screens::dispatch_input(app, key)
}
