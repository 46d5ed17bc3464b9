use crate::app::App;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::swatch_color;
use crate::ui::widgets::tables::scroll_offset;
use firewatch_core::views::{tier_summary, AlertPanel, ListRow, MapFrame, DEMO_NOTICE};
use firewatch_core::{Swatch, TierCounts};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

const SELECTED_BG: Color = Color::Rgb(0, 0, 238);

pub fn render_dashboard(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(area);

    render_fire_list(app, f, columns[0]);

    let panel = app
        .snapshot()
        .and_then(|snapshot| AlertPanel::build(snapshot, app.alerts_expanded));
    let map = MapFrame::build(
        app.snapshot(),
        app.boundary.as_ref(),
        app.selected_id().as_deref(),
    );

    match panel {
        Some(panel) => {
            let alert_height = if panel.expanded { 45 } else { 20 };
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(100 - alert_height),
                    Constraint::Percentage(alert_height),
                ])
                .split(columns[1]);
            render_map(&map, app.boundary.as_ref(), f, rows[0]);
            render_alert_panel(&panel, f, rows[1]);
        }
        None => render_map(&map, app.boundary.as_ref(), f, columns[1]),
    }
}

fn render_fire_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Active Fires ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let Some(snapshot) = app.snapshot() else {
        let paragraph = Paragraph::new("Loading fire data...")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    if snapshot.is_empty() {
        let paragraph = Paragraph::new(vec![
            TextLine::from(""),
            TextLine::from(Span::styled(
                "✅ No active fires detected",
                Style::default()
                    .fg(swatch_color(Swatch::GREEN))
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(inner);

    let mut header_lines = vec![TextLine::from(tier_summary(TierCounts::of(snapshot)))];
    if app.filter_editing || !app.filter.is_empty() {
        let cursor = if app.filter_editing { "_" } else { "" };
        header_lines.push(TextLine::from(vec![
            Span::styled("Filter: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{}{cursor}", app.filter)),
        ]));
    }
    f.render_widget(Paragraph::new(header_lines), chunks[0]);

    let rows = app.list_rows();
    if rows.is_empty() {
        let paragraph = Paragraph::new("No fires match the filter.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, chunks[1]);
        return;
    }

    let max_visible_rows = usize::from(chunks[1].height);
    let offset = scroll_offset(rows.len(), max_visible_rows, app.selected_row);

    let table_rows = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, row)| {
            let selected = index == app.selected_row;
            let table_row = match row {
                ListRow::Header {
                    severity,
                    count,
                    collapsed,
                } => {
                    let arrow = if *collapsed { "▶" } else { "▼" };
                    Row::new(vec![
                        Cell::from(format!("{arrow} {} {} SEVERITY", severity.icon(), severity.as_str())),
                        Cell::from(format!("({count})")),
                    ])
                    .style(
                        Style::default()
                            .fg(swatch_color(severity.swatch()))
                            .add_modifier(Modifier::BOLD),
                    )
                }
                ListRow::Fire(fire) => {
                    let alert = if fire.alert { " ⚠" } else { "" };
                    Row::new(vec![
                        Cell::from(format!("  {}{alert}", fire.record.place())),
                        Cell::from(fire.local_time.clone()),
                        Cell::from(format!("{:.0}K", fire.record.brightness)),
                    ])
                    .style(Style::default().fg(swatch_color(fire.swatch())))
                }
            };
            if selected {
                table_row.style(
                    Style::default()
                        .bg(SELECTED_BG)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                table_row
            }
        });

    let widths = [
        Constraint::Min(16),
        Constraint::Length(18),
        Constraint::Length(6),
    ];
    f.render_widget(Table::new(table_rows, widths).column_spacing(1), chunks[1]);
}

fn render_alert_panel(panel: &AlertPanel, f: &mut Frame<'_>, area: Rect) {
    let red = swatch_color(Swatch::RED);
    let block = Block::default()
        .title(format!(" 🚨 {} ", panel.headline))
        .title_bottom(TextLine::from(format!(" [a] {} ", panel.toggle_label())).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(red).add_modifier(Modifier::BOLD));

    let mut lines = Vec::new();
    for entry in panel.visible_entries() {
        lines.push(TextLine::from(vec![
            Span::styled(entry.title(), Style::default().fg(red).add_modifier(Modifier::BOLD)),
            Span::raw(format!(" {}", entry.message)),
        ]));
        lines.push(TextLine::from(format!(
            "  📍 {} ({})  🕐 {}",
            entry.location, entry.coordinates, entry.detected_at
        )));
        lines.push(TextLine::from(format!(
            "  🔥 {}  ⚡ {}  priority {}",
            entry.brightness, entry.frp, entry.priority
        )));
        lines.push(TextLine::from(format!(
            "  📨 {}",
            entry.recipients.join(", ")
        )));
    }
    lines.push(TextLine::from(Span::styled(
        DEMO_NOTICE,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
