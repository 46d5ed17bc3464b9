use crate::ui::widgets::popup::centered_rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const KEYS: [(&str, &str); 14] = [
    ("Tab / Shift+Tab", "Next / previous screen"),
    ("1 2 3", "Map & List, Statistics, Predict Risk"),
    ("↑ ↓ PgUp PgDn", "Move the selection"),
    ("Home / End", "First / last row"),
    ("Enter", "Fold a tier or open fire details"),
    ("h m l", "Fold HIGH, MEDIUM or LOW"),
    ("a", "Show or hide alert details"),
    ("/", "Filter the list by location"),
    ("Esc", "Close popup or clear filter"),
    ("r", "Refresh now"),
    ("F1 / ?", "Toggle this help"),
    ("q", "Quit"),
    ("Predict: Tab ↑ ↓", "Move between fields"),
    ("Predict: Enter / Del", "Estimate / reset the form"),
];

pub fn render_help(f: &mut Frame<'_>) {
    let area = centered_rect(60, 70, f.area());

    let lines: Vec<TextLine<'_>> = KEYS
        .iter()
        .map(|(key, action)| {
            TextLine::from(vec![
                Span::styled(
                    format!("{key:>22}  "),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
