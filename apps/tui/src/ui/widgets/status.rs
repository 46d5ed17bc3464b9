use crate::app::App;
use crate::ui::widgets::key_span;
use firewatch_core::FeedStatus;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

pub fn render_status_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [left, right] = Layout::horizontal([Constraint::Min(20), Constraint::Length(44)]).areas(inner);

    let status_style = match app.feed.status() {
        FeedStatus::Loading => Style::default().fg(Color::Gray),
        FeedStatus::Live(_) => Style::default().fg(Color::Green),
        FeedStatus::Stale(_) => Style::default().fg(Color::Yellow),
        FeedStatus::Unavailable(_) => Style::default().fg(Color::Red),
    };

    if app.is_busy() {
        let [spinner, text] = Layout::horizontal([Constraint::Length(2), Constraint::Min(1)]).areas(left);
        let throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .throbber_style(Style::default().fg(Color::Cyan));
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, spinner, &mut state);
        f.render_widget(Paragraph::new(status_text(app)).style(status_style), text);
    } else {
        f.render_widget(Paragraph::new(status_text(app)).style(status_style), left);
    }

    let hints = TextLine::from(vec![
        key_span("r"),
        Span::raw(": Refresh  "),
        key_span("Tab"),
        Span::raw(": Screen  "),
        key_span("F1"),
        Span::raw(": Help  "),
        key_span("q"),
        Span::raw(": Quit"),
    ]);
    f.render_widget(Paragraph::new(hints).right_aligned(), right);
}

fn status_text(app: &App) -> String {
    if app.status_message.is_empty() {
        app.feed.status_line()
    } else {
        app.status_message.clone()
    }
}
