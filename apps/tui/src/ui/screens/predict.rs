use crate::app::{App, PredictForm};
use crate::ui::widgets::{key_span, swatch_color};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_predict(app: &App, f: &mut Frame<'_>, area: Rect) {
    let form = &app.predict;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let field_lines = PredictForm::labels()
        .iter()
        .zip(form.fields.iter())
        .enumerate()
        .flat_map(|(index, ((label, hint), value))| {
            let focused = index == form.focus;
            let style = if focused {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if focused { "► " } else { "  " };
            let cursor = if focused { "_" } else { "" };
            [
                TextLine::from(vec![
                    Span::styled(format!("{prefix}{label}: "), style),
                    Span::styled(format!("{value}{cursor}"), style),
                ]),
                TextLine::from(Span::styled(
                    format!("    {hint}"),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        })
        .chain([
            TextLine::from(""),
            TextLine::from(vec![
                key_span("Tab/↑/↓"),
                Span::raw(": Field  "),
                key_span("Enter"),
                Span::raw(": Predict Risk  "),
                key_span("Del"),
                Span::raw(": Reset  "),
                key_span("Esc"),
                Span::raw(": Back"),
            ]),
        ])
        .collect::<Vec<_>>();

    let form_block = Block::default()
        .title(" 🔮 Fire Risk Prediction ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(
        Paragraph::new(field_lines).block(form_block).wrap(Wrap { trim: false }),
        columns[0],
    );

    render_result(form, f, columns[1]);
}

fn render_result(form: &PredictForm, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default().title(" Result ").borders(Borders::ALL);

    let (lines, color) = match (&form.result, &form.error) {
        (_, Some(error)) => (
            vec![TextLine::from(""), TextLine::from(format!("⚠ {error}"))],
            Color::Red,
        ),
        (Some(result), None) => {
            let color = swatch_color(result.swatch());
            (
                vec![
                    TextLine::from(""),
                    TextLine::from(Span::styled(
                        format!("{} RISK", result.tier.label().to_uppercase()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    TextLine::from(format!("Probability: {}", result.percent())),
                ],
                color,
            )
        }
        (None, None) => (
            vec![
                TextLine::from(""),
                TextLine::from("Enter values and press Enter to estimate the risk."),
            ],
            Color::Gray,
        ),
    };

    f.render_widget(
        Paragraph::new(lines)
            .block(block.border_style(Style::default().fg(color)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
