pub mod map;
pub mod popup;
pub mod status;
pub mod tables;

use firewatch_core::Swatch;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

pub const fn swatch_color(swatch: Swatch) -> Color {
    let (r, g, b) = swatch.rgb;
    Color::Rgb(r, g, b)
}

/// Highlighted key name for the hint lines.
pub fn key_span(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}
