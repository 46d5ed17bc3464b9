use std::fmt::Write as _;
use std::io::Stdout;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use firewatch_core::views::last_updated_label;
use firewatch_core::{FeedState, FeedStatus, SnapshotStats};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;

use crate::app::{handle_input, App, InputAction};
use crate::config::AppConfig;
use crate::feed::{FeedRefresher, FireClient};
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Run the dashboard until the user quits.
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    refresher: &FeedRefresher,
) -> Result<()> {
    let mut feed_rx = refresher.subscribe();

    while app.running {
        if feed_rx.has_changed().unwrap_or(false) {
            let feed = feed_rx.borrow_and_update().clone();
            app.apply_feed(feed);
        }

        app.update();

        terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| eyre!("Terminal draw error: {e}"))?;

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            // Let the refresher publish between frames.
            tokio::task::yield_now().await;
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_input(app, key.code) == InputAction::Refresh
                    && !refresher.request_refresh()
                {
                    app.status_message = "Refresh already queued".to_string();
                }
            }
            Event::Resize(_, _) => terminal.autoresize()?,
            _ => {}
        }
    }

    Ok(())
}

/// Fetch once and print the summary instead of drawing the dashboard.
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let client = FireClient::new(config)?;
    let mut feed = FeedState::new();
    feed.apply(client.fetch().await, Utc::now());

    let report = HeadlessReport::from_feed(&feed)
        .ok_or_else(|| eyre!("{}", feed.status_line()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report)?);
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct HeadlessReport {
    source: String,
    status: String,
    #[serde(flatten)]
    stats: SnapshotStats,
}

impl HeadlessReport {
    fn from_feed(feed: &FeedState) -> Option<Self> {
        let snapshot = feed.snapshot()?;
        let source = match feed.status() {
            FeedStatus::Live(source) => source.label().to_string(),
            FeedStatus::Loading | FeedStatus::Stale(_) | FeedStatus::Unavailable(_) => {
                "unknown".to_string()
            }
        };
        Some(Self {
            source,
            status: feed.status_line(),
            stats: SnapshotStats::from_snapshot(snapshot),
        })
    }
}

fn render_report(report: &HeadlessReport) -> std::result::Result<String, std::fmt::Error> {
    let stats = &report.stats;
    let counts = stats.counts;
    let mut out = String::new();

    writeln!(out, "\nActive Fire Stats")?;
    writeln!(out, "=================")?;
    writeln!(out, "Source: {}", report.source)?;
    writeln!(out, "Last updated: {}", last_updated_label(stats.last_updated))?;
    writeln!(out, "Total fires: {}", counts.total)?;
    writeln!(out, "High: {} | Medium: {} | Low: {}", counts.high, counts.medium, counts.low)?;
    writeln!(out, "Alerts: {} ({} fires flagged)", stats.alerts, stats.flagged)?;

    writeln!(out, "\nBy Satellite:")?;
    for (satellite, count) in &stats.by_satellite {
        writeln!(out, "- {satellite}: {count}")?;
    }

    writeln!(out, "\nBy Confidence:")?;
    for (confidence, count) in &stats.by_confidence {
        writeln!(out, "- {confidence}: {count}")?;
    }

    if let Some(fire) = &stats.strongest {
        writeln!(
            out,
            "\nStrongest: {} | {} | {:.1} MW | {}",
            fire.id,
            fire.place,
            fire.frp,
            fire.severity.as_str()
        )?;
    }

    writeln!(out, "\nRecent Detections:")?;
    for fire in &stats.recent {
        writeln!(
            out,
            "- {} | {} | {} | {:.1}K | {}",
            fire.local_time,
            fire.place,
            fire.severity.as_str(),
            fire.brightness,
            fire.id
        )?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use firewatch_core::{Classifier, Confidence, FetchError, FetchOutcome, FireRecord, SourceKind};

    fn record(id: &str, brightness: f64, frp: f64) -> FireRecord {
        FireRecord {
            id: id.to_string(),
            latitude: 30.1,
            longitude: 79.2,
            brightness,
            frp,
            acq_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap_or_default(),
            acq_time: Some("0834".to_string()),
            datetime_utc: None,
            satellite: Some("N20".to_string()),
            confidence: Confidence::High,
            location: Some("Chamoli".to_string()),
        }
    }

    fn fed(outcome: FetchOutcome) -> FeedState {
        let mut feed = FeedState::new();
        feed.apply(outcome, Utc::now());
        feed
    }

    #[test]
    fn report_lists_counts_and_strongest() -> color_eyre::Result<()> {
        let snapshot = Classifier::new().classify(vec![
            record("a", 350.0, 40.0),
            record("b", 300.0, 3.0),
        ]);
        let feed = fed(FetchOutcome::Fetched {
            snapshot,
            source: SourceKind::Fallback,
        });

        let report = HeadlessReport::from_feed(&feed).ok_or_else(|| eyre!("no report"))?;
        let text = render_report(&report)?;
        assert!(text.contains("Total fires: 2"));
        assert!(text.contains("- N20: 2"));
        assert!(text.contains("Strongest: a | Chamoli | 40.0 MW | HIGH"));
        assert!(text.contains(&format!("Source: {}", SourceKind::Fallback.label())));

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["counts"]["total"], 2);
        assert_eq!(json["recent"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn no_report_without_snapshot() {
        let feed = fed(FetchOutcome::Failed {
            primary: Some(FetchError::Status(502)),
            fallback: FetchError::NotConfigured,
        });
        assert!(HeadlessReport::from_feed(&feed).is_none());
    }
}
