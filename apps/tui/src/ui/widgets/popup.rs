use crate::ui::widgets::{key_span, swatch_color};
use firewatch_core::views::fire_details;
use firewatch_core::ClassifiedFire;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Detail card for the selected fire.
pub fn render_fire_popup(fire: &ClassifiedFire, f: &mut Frame<'_>) {
    let area = centered_rect(50, 50, f.area());
    let color = swatch_color(fire.swatch());

    let mut lines: Vec<TextLine<'_>> = fire_details(fire)
        .into_iter()
        .map(|(label, value)| {
            TextLine::from(vec![
                Span::styled(
                    format!("{label:<12}"),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(value),
            ])
        })
        .collect();
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(vec![key_span("Esc"), Span::raw(": Close")]));

    let block = Block::default()
        .title(format!(" {} Fire {} ", fire.icon(), fire.id()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_sits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 10);
    }
}
