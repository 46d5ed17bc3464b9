use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_stats_input(app: &mut App, key: KeyCode) {
    let total_rows = app.stats_len();

    match key {
        KeyCode::Up => app.stats_row = app.stats_row.saturating_sub(1),
        KeyCode::Down => {
            if total_rows > 0 && app.stats_row + 1 < total_rows {
                app.stats_row += 1;
            }
        }
        KeyCode::PageUp => app.stats_row = app.stats_row.saturating_sub(10),
        KeyCode::PageDown => {
            app.stats_row = (app.stats_row + 10).min(total_rows.saturating_sub(1));
        }
        KeyCode::Home => app.stats_row = 0,
        KeyCode::End => app.stats_row = total_rows.saturating_sub(1),
        _ => {}
    }
}
