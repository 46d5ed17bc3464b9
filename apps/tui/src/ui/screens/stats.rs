use crate::app::App;
use crate::ui::widgets::swatch_color;
use crate::ui::widgets::tables::scroll_offset;
use firewatch_core::views::{last_updated_label, StatsRow, StatsView};
use firewatch_core::{SnapshotStats, Swatch};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_statistics(app: &App, f: &mut Frame<'_>, area: Rect) {
    let view = StatsView::build(app.snapshot());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    let Some(cards) = view.cards() else {
        let paragraph = Paragraph::new("Loading statistics...")
            .block(Block::default().title(" Statistics ").borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[0]);
    for ((title, icon, value, swatch), card_area) in cards.into_iter().zip(card_areas.iter()) {
        render_card(title, icon, value, swatch, f, *card_area);
    }

    match &view {
        StatsView::Loading => {}
        StatsView::NoFires { last_updated, .. } => {
            let green = swatch_color(Swatch::GREEN);
            let paragraph = Paragraph::new(vec![
                TextLine::from(""),
                TextLine::from(Span::styled(
                    "✅ No active fires detected",
                    Style::default().fg(green).add_modifier(Modifier::BOLD),
                )),
                TextLine::from("All clear! No fire activity in the monitored region."),
                TextLine::from(Span::styled(
                    format!("Last updated: {}", last_updated_label(*last_updated)),
                    Style::default().fg(Color::Gray),
                )),
            ])
            .block(
                Block::default()
                    .title(" Fire Details ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(green)),
            )
            .alignment(Alignment::Center);
            f.render_widget(paragraph, chunks[1]);
        }
        StatsView::Table { rows, .. } => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(60), Constraint::Length(30)])
                .split(chunks[1]);
            render_fire_table(rows, app.stats_row, f, body[0]);
            if let Some(snapshot) = app.snapshot() {
                render_satellite_chart(&SnapshotStats::from_snapshot(snapshot), f, body[1]);
            }
        }
    }
}

fn render_card(
    title: &str,
    icon: &str,
    value: usize,
    swatch: Swatch,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let color = swatch_color(swatch);
    let paragraph = Paragraph::new(vec![
        TextLine::from(Span::styled(
            format!("{icon} {value}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(title.to_string(), Style::default().fg(Color::Gray))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
    .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_fire_table(rows: &[StatsRow], selected: usize, f: &mut Frame<'_>, area: Rect) {
    let header = Row::new(StatsRow::HEADERS.iter().map(|title| Cell::from(*title))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = rows.len();
    let max_visible_rows = usize::from(area.height.saturating_sub(4));
    let offset = scroll_offset(total_rows, max_visible_rows, selected);

    let table_rows = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, row)| {
            let style = if index == selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(swatch_color(row.severity.swatch()))
            };
            Row::new(row.cells().map(Cell::from)).style(style)
        });

    let widths = [
        Constraint::Length(9),
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(17),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(16),
        Constraint::Length(9),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " Fire Details ({} of {}) ",
                    selected.saturating_add(1).min(total_rows),
                    total_rows
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_satellite_chart(stats: &SnapshotStats, f: &mut Frame<'_>, area: Rect) {
    let bars: Vec<Bar<'_>> = stats
        .by_satellite
        .iter()
        .map(|(satellite, count)| {
            Bar::default()
                .value(u64::try_from(*count).unwrap_or(u64::MAX))
                .label(TextLine::from(satellite.clone()))
                .style(Style::default().fg(Color::Cyan))
                .value_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" By Satellite ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_gap(1)
        .bar_width(6);

    f.render_widget(chart, area);
}
