// Terminal rendering: one screen body between a tab bar and a status bar,
// with the help and fire detail popups drawn on top.

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Tabs};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(f.area());

    render_tabs(app, f, chunks[0]);

    match app.screen {
        AppScreen::Dashboard => screens::dashboard::render_dashboard(app, f, chunks[1]),
        AppScreen::Statistics => screens::stats::render_statistics(app, f, chunks[1]),
        AppScreen::Predict => screens::predict::render_predict(app, f, chunks[1]),
    }

    widgets::status::render_status_bar(app, f, chunks[2]);

    if app.detail_open {
        if let Some(fire) = app.selected_fire() {
            widgets::popup::render_fire_popup(fire, f);
        }
    }

    if app.show_help {
        screens::help::render_help(f);
    }
}

fn render_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = AppScreen::ALL
        .iter()
        .enumerate()
        .map(|(index, screen)| TextLine::from(format!("{} {}", index + 1, screen.label())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" 🔥 Uttarakhand Forest Fire Monitor ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(255, 102, 0))),
        )
        .select(app.screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(255, 102, 0))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}
