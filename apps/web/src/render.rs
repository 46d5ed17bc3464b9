use firewatch_core::views::{
    fire_details, last_updated_label, list_sections, tier_summary, AlertPanel, ListRow, MapFrame,
    StatsRow, StatsView, DEMO_NOTICE,
};
use firewatch_core::{FeedStatus, Severity, Swatch, TierCounts};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        Block, Borders, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, Tabs, Wrap,
    },
    Frame,
};

use crate::state::{RiskForm, Tab, WebState};

const SELECTED_BG: Color = Color::Rgb(0, 0, 238);

const fn swatch_color(swatch: Swatch) -> Color {
    let (r, g, b) = swatch.rgb;
    Color::Rgb(r, g, b)
}

pub fn draw(state: &WebState, f: &mut Frame<'_>) {
    let area = f.area();
    let block = Block::default()
        .title("🔥 Uttarakhand Forest Fire Detection")
        .title_style(
            Style::default()
                .fg(swatch_color(Swatch::ORANGE))
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(inner);

    render_status(state, f, layout[0]);
    render_tabs(state, f, layout[1]);

    match state.tab {
        Tab::MapList => render_map_list(state, f, layout[2]),
        Tab::Statistics => render_statistics(state, f, layout[2]),
        Tab::Predict => render_predict(&state.form, f, layout[2]),
    }

    let hints = match state.tab {
        Tab::MapList => "Tab/1-3 switch • ↑/↓ select • Enter open/fold • h/m/l fold tier • a alerts • r refresh",
        Tab::Statistics => "Tab/1-3 switch • ↑/↓ PgUp/PgDn scroll • r refresh",
        Tab::Predict => "Tab/↑/↓ field • Enter predict • Del reset • Esc back",
    };
    f.render_widget(
        Paragraph::new(hints)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        layout[3],
    );

    if state.detail_open {
        render_detail_popup(state, f, area);
    }
}

fn render_status(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let color = match state.feed.status() {
        FeedStatus::Loading => Color::Gray,
        FeedStatus::Live(_) => Color::Green,
        FeedStatus::Stale(_) => Color::Yellow,
        FeedStatus::Unavailable(_) => Color::Red,
    };
    let mut spans = vec![Span::styled(state.feed.status_line(), Style::default().fg(color))];
    if let Some(snapshot) = state.snapshot() {
        spans.push(Span::raw("  •  "));
        spans.push(Span::raw(tier_summary(TierCounts::of(snapshot))));
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_tabs(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let titles = Tab::ALL
        .iter()
        .map(|tab| TextLine::from(tab.label()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(SELECTED_BG)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, area);
}

fn loading(f: &mut Frame<'_>, area: Rect) {
    let paragraph = Paragraph::new(Text::from(TextLine::from("Loading fire data...")))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(paragraph, area);
}

fn render_map_list(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    let selected = state.selected_fire().map(|fire| fire.id().to_string());
    let map = MapFrame::build(state.snapshot(), state.boundary.as_ref(), selected.as_deref());
    render_map(state, &map, f, content[0]);

    let panel = state
        .snapshot()
        .and_then(|snapshot| AlertPanel::build(snapshot, state.alerts_expanded));
    match panel {
        Some(panel) => {
            let side = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(content[1]);
            render_list(state, f, side[0]);
            render_alerts(&panel, f, side[1]);
        }
        None => render_list(state, f, content[1]),
    }
}

fn render_map(state: &WebState, map: &MapFrame, f: &mut Frame<'_>, area: Rect) {
    let bounds = map.bounds;
    let layers: Vec<(Color, Vec<(f64, f64)>)> = Severity::ALL
        .iter()
        .rev()
        .map(|severity| {
            let coords = map
                .markers
                .iter()
                .filter(|marker| marker.severity == *severity)
                .map(|marker| (marker.lon, marker.lat))
                .collect();
            (swatch_color(severity.swatch()), coords)
        })
        .collect();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(format!("Fire Map ({} detections)", map.markers.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds([bounds.min_lon, bounds.max_lon])
        .y_bounds([bounds.min_lat, bounds.max_lat])
        .paint(|ctx| {
            if let Some(boundary) = &state.boundary {
                for ((x1, y1), (x2, y2)) in boundary.segments() {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: Color::Rgb(0, 102, 204),
                    });
                }
                ctx.layer();
            }
            for (color, coords) in &layers {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }
            if let Some(marker) = map.selected() {
                ctx.draw(&Circle {
                    x: marker.lon,
                    y: marker.lat,
                    radius: (bounds.max_lon - bounds.min_lon) / 60.0,
                    color: Color::White,
                });
            }
        });
    f.render_widget(canvas, area);
}

fn render_list(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Active Fires")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(snapshot) = state.snapshot() else {
        loading(f, inner);
        return;
    };
    if snapshot.is_empty() {
        let paragraph = Paragraph::new("✅ No active fires detected")
            .alignment(Alignment::Center)
            .style(Style::default().fg(swatch_color(Swatch::GREEN)));
        f.render_widget(paragraph, inner);
        return;
    }

    let sections = list_sections(snapshot, state.toggles);
    let rows = state.rows();
    let visible = usize::from(inner.height);
    let offset = state.selected_row.saturating_sub(visible.saturating_sub(1));

    let lines = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, row)| {
            let line = match row {
                ListRow::Header {
                    severity,
                    collapsed,
                    ..
                } => {
                    let arrow = if *collapsed { "▶" } else { "▼" };
                    let header = sections
                        .iter()
                        .find(|section| section.severity == *severity)
                        .map(|section| section.header())
                        .unwrap_or_default();
                    TextLine::from(Span::styled(
                        format!("{arrow} {header}"),
                        Style::default()
                            .fg(swatch_color(severity.swatch()))
                            .add_modifier(Modifier::BOLD),
                    ))
                }
                ListRow::Fire(fire) => TextLine::from(Span::styled(
                    format!(
                        "   {} • {} • {:.0}K",
                        fire.record.place(),
                        fire.local_time,
                        fire.record.brightness
                    ),
                    Style::default().fg(swatch_color(fire.swatch())),
                )),
            };
            if index == state.selected_row {
                line.style(Style::default().bg(SELECTED_BG).fg(Color::White))
            } else {
                line
            }
        })
        .collect::<Vec<_>>();

    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_alerts(panel: &AlertPanel, f: &mut Frame<'_>, area: Rect) {
    let red = swatch_color(Swatch::RED);
    let block = Block::default()
        .title(format!("🚨 {} [a: {}]", panel.headline, panel.toggle_label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(red));

    let mut lines = Vec::new();
    for entry in panel.visible_entries() {
        lines.push(TextLine::from(Span::styled(
            entry.title(),
            Style::default().fg(red).add_modifier(Modifier::BOLD),
        )));
        lines.push(TextLine::from(entry.message.clone()));
        lines.push(TextLine::from(format!(
            "📍 {} ({}) • {}",
            entry.location, entry.coordinates, entry.detected_at
        )));
        lines.push(TextLine::from(format!(
            "🔥 {} • ⚡ {} • {} priority",
            entry.brightness, entry.frp, entry.priority
        )));
        lines.push(TextLine::from(format!("📨 {}", entry.recipients.join(", "))));
    }
    lines.push(TextLine::from(Span::styled(
        DEMO_NOTICE,
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    )));

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_statistics(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let view = StatsView::build(state.snapshot());
    let Some(cards) = view.cards() else {
        loading(f, area);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)])
        .split(area);

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(layout[0]);
    for ((title, icon, value, swatch), card_area) in cards.into_iter().zip(card_areas.iter()) {
        let color = swatch_color(swatch);
        let paragraph = Paragraph::new(Text::from(vec![
            TextLine::from(Span::styled(
                format!("{icon} {value}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            TextLine::from(Span::styled(title, Style::default().fg(Color::Gray))),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)))
        .alignment(Alignment::Center);
        f.render_widget(paragraph, *card_area);
    }

    match &view {
        StatsView::Loading => {}
        StatsView::NoFires { last_updated, .. } => {
            let paragraph = Paragraph::new(Text::from(vec![
                TextLine::from(Span::styled(
                    "✅ No active fires detected",
                    Style::default()
                        .fg(swatch_color(Swatch::GREEN))
                        .add_modifier(Modifier::BOLD),
                )),
                TextLine::from("All clear! No fire activity in the monitored region."),
                TextLine::from(format!("Last updated: {}", last_updated_label(*last_updated))),
            ]))
            .block(Block::default().title("Fire Details").borders(Borders::ALL))
            .alignment(Alignment::Center);
            f.render_widget(paragraph, layout[1]);
        }
        StatsView::Table { rows, .. } => render_stats_table(rows, state.stats_offset, f, layout[1]),
    }
}

fn render_stats_table(rows: &[StatsRow], offset: usize, f: &mut Frame<'_>, area: Rect) {
    let header = Row::new(StatsRow::HEADERS.iter().map(|title| Cell::from(*title))).style(
        Style::default()
            .fg(SELECTED_BG)
            .bg(Color::Rgb(200, 200, 200))
            .add_modifier(Modifier::BOLD),
    );

    let max_rows = usize::from(area.height.saturating_sub(3));
    let table_rows = rows.iter().skip(offset).take(max_rows).map(|row| {
        Row::new(row.cells().map(Cell::from))
            .style(Style::default().fg(swatch_color(row.severity.swatch())))
    });

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(9),
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(17),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(16),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!("Fire Details ({})", rows.len()))
            .borders(Borders::ALL),
    )
    .column_spacing(1);

    f.render_widget(table, area);

    let mut scrollbar_state = ScrollbarState::new(rows.len())
        .position(offset)
        .viewport_content_length(max_rows);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_style(Style::default().fg(SELECTED_BG));
    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin::new(0, 1)),
        &mut scrollbar_state,
    );
}

fn render_predict(form: &RiskForm, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut lines = Vec::new();
    for (index, ((label, hint), value)) in RiskForm::labels().iter().zip(&form.fields).enumerate() {
        let focused = index == form.focus;
        let style = if focused {
            Style::default()
                .fg(Color::White)
                .bg(SELECTED_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(TextLine::from(vec![
            Span::styled(format!("{label}: "), style),
            Span::styled(format!("{value}{}", if focused { "_" } else { "" }), style),
        ]));
        lines.push(TextLine::from(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )));
    }

    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title("Fire Risk Prediction")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        layout[0],
    );

    let (text, color) = if let Some(error) = &form.error {
        (vec![TextLine::from(format!("⚠ {error}"))], Color::Red)
    } else if let Some(result) = &form.result {
        let color = swatch_color(result.swatch());
        (
            vec![
                TextLine::from(Span::styled(
                    format!("{} RISK", result.tier.label().to_uppercase()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                TextLine::from(format!("Probability: {}", result.percent())),
            ],
            color,
        )
    } else {
        (
            vec![TextLine::from("Press Enter to predict the risk.")],
            Color::Gray,
        )
    };

    f.render_widget(
        Paragraph::new(Text::from(text))
            .block(
                Block::default()
                    .title("Result")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        layout[1],
    );
}

fn render_detail_popup(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let Some(fire) = state.selected_fire() else {
        return;
    };
    let details = fire_details(fire);
    let height = u16::try_from(details.len() + 3).unwrap_or(u16::MAX).min(area.height);
    let width = 56.min(area.width);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines = details
        .into_iter()
        .map(|(label, value)| {
            TextLine::from(vec![
                Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
                Span::raw(value),
            ])
        })
        .chain(std::iter::once(TextLine::from(Span::styled(
            "Esc to close",
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        ))))
        .collect::<Vec<_>>();

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(format!("{} Fire {}", fire.icon(), fire.id()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(swatch_color(fire.swatch()))),
        ),
        popup,
    );
}
