use crate::ui::widgets::swatch_color;
use firewatch_core::views::MapFrame;
use firewatch_core::{Boundary, Severity};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

const BOUNDARY_COLOR: Color = Color::Rgb(0, 102, 204);

/// Plots the fires in lon/lat space over the region outline.
pub fn render_map(
    map: &MapFrame,
    boundary: Option<&Boundary>,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let bounds = map.bounds;
    let title = TextLine::from(vec![
        Span::raw(format!(" Map · {} fires ", map.markers.len())),
        legend_span(Severity::High),
        legend_span(Severity::Medium),
        legend_span(Severity::Low),
    ]);

    // Points per tier, drawn LOW first so HIGH ends up on top.
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
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds([bounds.min_lon, bounds.max_lon])
        .y_bounds([bounds.min_lat, bounds.max_lat])
        .paint(|ctx| {
            if let Some(boundary) = boundary {
                for ((x1, y1), (x2, y2)) in boundary.segments() {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: BOUNDARY_COLOR,
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
                let radius = (bounds.max_lon - bounds.min_lon) / 60.0;
                ctx.draw(&Circle {
                    x: marker.lon,
                    y: marker.lat,
                    radius,
                    color: Color::White,
                });
                ctx.print(
                    marker.lon + radius,
                    marker.lat + radius,
                    Span::styled(marker.id.clone(), Style::default().fg(Color::White)),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn legend_span(severity: Severity) -> Span<'static> {
    Span::styled(
        format!("● {} ", severity.label()),
        Style::default().fg(swatch_color(severity.swatch())),
    )
}
