//! View models shared by the terminal and web dashboards.
//!
//! Everything here is a pure function of the current snapshot and the
//! caller's toggle state, so both front ends draw the same thing.

use chrono::{DateTime, Utc};

use crate::boundary::{Boundary, Bounds};
use crate::domain::{Severity, Swatch};
use crate::model::{Alert, ClassifiedFire, Snapshot};
use crate::stats::TierCounts;

/// Centre of the monitored region, `(lat, lon)`.
pub const DEFAULT_CENTRE: (f64, f64) = (30.0, 79.3);
const DEFAULT_SPAN: f64 = 1.5;
const MARKER_PADDING: f64 = 0.25;

pub const DEMO_NOTICE: &str = "Demo Mode: alerts are shown as received. A production deployment \
would forward them to forest officials by email or SMS.";

/// Which tier sections of the list are collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierToggles {
    collapsed: [bool; 3],
}

impl TierToggles {
    pub fn toggle(&mut self, severity: Severity) {
        let slot = &mut self.collapsed[severity.index()];
        *slot = !*slot;
    }

    pub const fn is_collapsed(&self, severity: Severity) -> bool {
        self.collapsed[severity.index()]
    }
}

#[derive(Debug, Clone)]
pub struct ListSection<'a> {
    pub severity: Severity,
    pub collapsed: bool,
    pub fires: Vec<&'a ClassifiedFire>,
}

impl ListSection<'_> {
    pub fn header(&self) -> String {
        format!(
            "{} {} SEVERITY ({})",
            self.severity.icon(),
            self.severity.as_str(),
            self.fires.len()
        )
    }
}

/// One line of the flattened list: a tier header or a fire under it.
#[derive(Debug, Clone, Copy)]
pub enum ListRow<'a> {
    Header {
        severity: Severity,
        count: usize,
        collapsed: bool,
    },
    Fire(&'a ClassifiedFire),
}

/// Tier sections in HIGH, MEDIUM, LOW order. Empty tiers are omitted.
pub fn list_sections<'a>(snapshot: &'a Snapshot, toggles: TierToggles) -> Vec<ListSection<'a>> {
    list_sections_where(snapshot, toggles, |_| true)
}

/// Like [`list_sections`], keeping only fires accepted by `keep`.
pub fn list_sections_where<'a, F>(
    snapshot: &'a Snapshot,
    toggles: TierToggles,
    keep: F,
) -> Vec<ListSection<'a>>
where
    F: Fn(&ClassifiedFire) -> bool,
{
    Severity::ALL
        .into_iter()
        .filter_map(|severity| {
            let fires: Vec<_> = snapshot.tier(severity).filter(|fire| keep(fire)).collect();
            (!fires.is_empty()).then(|| ListSection {
                severity,
                collapsed: toggles.is_collapsed(severity),
                fires,
            })
        })
        .collect()
}

pub fn list_rows<'a>(sections: &[ListSection<'a>]) -> Vec<ListRow<'a>> {
    let mut rows = Vec::new();
    for section in sections {
        rows.push(ListRow::Header {
            severity: section.severity,
            count: section.fires.len(),
            collapsed: section.collapsed,
        });
        if !section.collapsed {
            rows.extend(section.fires.iter().copied().map(ListRow::Fire));
        }
    }
    rows
}

/// `🔴 2 High · 🟠 3 Medium · 🟡 1 Low`
pub fn tier_summary(counts: TierCounts) -> String {
    Severity::ALL
        .iter()
        .map(|severity| format!("{} {} {}", severity.icon(), counts.get(*severity), severity.label()))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Label/value pairs for the fire detail popup.
pub fn fire_details(fire: &ClassifiedFire) -> Vec<(&'static str, String)> {
    let record = &fire.record;
    let mut details = vec![
        ("Severity", format!("{} {}", fire.icon(), fire.severity.as_str())),
        ("Location", record.place()),
        ("Coordinates", record.coordinates()),
        ("Detected", fire.local_time.clone()),
        ("Date", record.acq_date.to_string()),
        ("Brightness", format!("{:.1} K", record.brightness)),
        ("Fire power", format!("{:.1} MW", record.frp)),
        (
            "Satellite",
            record.satellite.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
        ("Confidence", record.confidence.as_str().to_string()),
    ];
    if fire.alert {
        details.push(("Alert", "Sent to authorities".to_string()));
    }
    details
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertEntry {
    pub number: usize,
    pub status: String,
    pub message: String,
    pub location: String,
    pub coordinates: String,
    pub detected_at: String,
    pub brightness: String,
    pub frp: String,
    pub recipients: Vec<String>,
    pub priority: String,
}

impl AlertEntry {
    fn new(number: usize, alert: &Alert) -> Self {
        Self {
            number,
            status: alert.status.clone(),
            message: alert.message.clone(),
            location: alert.location.clone(),
            coordinates: alert.coordinates.clone(),
            detected_at: alert.detected_at.clone(),
            brightness: format!("{}K", alert.brightness),
            frp: format!("{} MW", alert.frp),
            recipients: alert.recipients.clone(),
            priority: alert.priority.clone(),
        }
    }

    pub fn title(&self) -> String {
        format!("ALERT #{} [{}]", self.number, self.status)
    }
}

/// Banner plus one entry per alert, in received order.
///
/// Collapsing only hides the entries; they are always built.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPanel {
    pub headline: String,
    pub entries: Vec<AlertEntry>,
    pub expanded: bool,
}

impl AlertPanel {
    /// `None` when the snapshot carries no alerts.
    pub fn build(snapshot: &Snapshot, expanded: bool) -> Option<Self> {
        let alerts = snapshot.alerts();
        if alerts.is_empty() {
            return None;
        }
        let suffix = if alerts.len() > 1 { "S" } else { "" };
        Some(Self {
            headline: format!("{} HIGH SEVERITY ALERT{suffix}", alerts.len()),
            entries: alerts
                .iter()
                .enumerate()
                .map(|(index, alert)| AlertEntry::new(index + 1, alert))
                .collect(),
            expanded,
        })
    }

    pub fn visible_entries(&self) -> &[AlertEntry] {
        if self.expanded {
            &self.entries
        } else {
            &[]
        }
    }

    pub const fn toggle_label(&self) -> &'static str {
        if self.expanded {
            "Hide Details"
        } else {
            "Show Details"
        }
    }
}

/// One row of the statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    pub severity: Severity,
    pub alert: bool,
    pub location: String,
    pub satellite: String,
    pub coordinates: String,
    pub date: String,
    pub time: String,
    pub brightness: String,
    pub frp: String,
}

impl From<&ClassifiedFire> for StatsRow {
    fn from(fire: &ClassifiedFire) -> Self {
        let record = &fire.record;
        Self {
            severity: fire.severity,
            alert: fire.alert,
            location: record.location.clone().unwrap_or_else(|| "Unknown".to_string()),
            satellite: record.satellite.clone().unwrap_or_else(|| "-".to_string()),
            coordinates: format!("{:.4}, {:.4}", record.latitude, record.longitude),
            date: record.acq_date.to_string(),
            time: fire.local_time.clone(),
            brightness: format!("{:.1}K ({})", record.brightness, record.confidence.as_str()),
            frp: format!("{:.1} MW", record.frp),
        }
    }
}

impl StatsRow {
    pub const HEADERS: [&'static str; 8] = [
        "Severity",
        "Location",
        "Satellite",
        "Coordinates",
        "Date",
        "Time",
        "Brightness",
        "FRP",
    ];

    pub fn severity_cell(&self) -> String {
        let marker = if self.alert { " ⚠" } else { "" };
        format!("{} {}{marker}", self.severity.icon(), self.severity.as_str())
    }

    pub fn cells(&self) -> [String; 8] {
        [
            self.severity_cell(),
            self.location.clone(),
            self.satellite.clone(),
            self.coordinates.clone(),
            self.date.clone(),
            self.time.clone(),
            self.brightness.clone(),
            self.frp.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsView {
    Loading,
    NoFires {
        counts: TierCounts,
        last_updated: Option<DateTime<Utc>>,
    },
    Table {
        counts: TierCounts,
        rows: Vec<StatsRow>,
    },
}

impl StatsView {
    pub fn build(snapshot: Option<&Snapshot>) -> Self {
        let Some(snapshot) = snapshot else {
            return Self::Loading;
        };
        let counts = TierCounts::of(snapshot);
        if snapshot.is_empty() {
            Self::NoFires {
                counts,
                last_updated: snapshot.last_updated(),
            }
        } else {
            Self::Table {
                counts,
                rows: snapshot.fires().iter().map(StatsRow::from).collect(),
            }
        }
    }

    /// `(title, icon, value, swatch)` for the four summary cards.
    pub fn cards(&self) -> Option<[(&'static str, &'static str, usize, Swatch); 4]> {
        let counts = match self {
            Self::Loading => return None,
            Self::NoFires { counts, .. } | Self::Table { counts, .. } => *counts,
        };
        Some([
            ("Total Fires", "🔥", counts.total, Swatch::ORANGE),
            ("High Severity", Severity::High.icon(), counts.high, Severity::High.swatch()),
            (
                "Medium Severity",
                Severity::Medium.icon(),
                counts.medium,
                Severity::Medium.swatch(),
            ),
            ("Low Severity", Severity::Low.icon(), counts.low, Severity::Low.swatch()),
        ])
    }
}

/// Text for a "last updated" line.
pub fn last_updated_label(last_updated: Option<DateTime<Utc>>) -> String {
    last_updated.map_or_else(
        || "Just now".to_string(),
        |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    pub severity: Severity,
    pub selected: bool,
}

impl MapMarker {
    pub const fn swatch(&self) -> Swatch {
        self.severity.swatch()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapFrame {
    pub bounds: Bounds,
    pub markers: Vec<MapMarker>,
}

impl MapFrame {
    /// Markers sorted so HIGH is drawn last, on top.
    pub fn build(snapshot: Option<&Snapshot>, boundary: Option<&Boundary>, selected: Option<&str>) -> Self {
        let mut markers: Vec<MapMarker> = snapshot
            .map(|snapshot| {
                snapshot
                    .fires()
                    .iter()
                    .map(|fire| MapMarker {
                        id: fire.id().to_string(),
                        lon: fire.record.longitude,
                        lat: fire.record.latitude,
                        severity: fire.severity,
                        selected: selected == Some(fire.id()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        markers.sort_by_key(|marker| std::cmp::Reverse(marker.severity.index()));

        let bounds = boundary.map_or_else(
            || {
                Bounds::around(markers.iter().map(|marker| (marker.lon, marker.lat))).map_or_else(
                    || Bounds::centred(DEFAULT_CENTRE.1, DEFAULT_CENTRE.0, DEFAULT_SPAN),
                    |bounds| bounds.padded(MARKER_PADDING),
                )
            },
            Boundary::bounds,
        );

        Self { bounds, markers }
    }

    pub fn selected(&self) -> Option<&MapMarker> {
        self.markers.iter().find(|marker| marker.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::domain::Confidence;
    use crate::model::FireRecord;
    use chrono::NaiveDate;

    fn record(id: &str, lat: f64, brightness: f64, confidence: Confidence) -> FireRecord {
        FireRecord {
            id: id.to_string(),
            latitude: lat,
            longitude: 79.0,
            brightness,
            frp: 8.0,
            acq_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap_or_default(),
            acq_time: Some("0834".to_string()),
            datetime_utc: None,
            satellite: Some("N".to_string()),
            confidence,
            location: Some(format!("Site {id}")),
        }
    }

    fn snapshot() -> Snapshot {
        Classifier::new().classify(vec![
            record("a", 30.1, 350.0, Confidence::High),
            record("b", 30.4, 330.0, Confidence::Low),
            record("c", 29.8, 345.0, Confidence::High),
        ])
    }

    fn alert(id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            message: format!("Fire {id}"),
            location: "Almora".to_string(),
            coordinates: "29.5971°N, 79.6591°E".to_string(),
            detected_at: "2:04 PM IST".to_string(),
            brightness: 350.0,
            frp: 12.0,
            priority: "HIGH".to_string(),
            status: "SENT".to_string(),
            recipients: vec!["dfo@example.org".to_string()],
        }
    }

    #[test]
    fn sections_skip_empty_tiers() {
        let snapshot = snapshot();
        let sections = list_sections(&snapshot, TierToggles::default());
        let tiers: Vec<_> = sections.iter().map(|section| section.severity).collect();
        assert_eq!(tiers, [Severity::High, Severity::Medium]);
        assert_eq!(sections[0].header(), "🔴 HIGH SEVERITY (2)");
    }

    #[test]
    fn collapsed_sections_hide_rows_only() {
        let snapshot = snapshot();
        let mut toggles = TierToggles::default();
        toggles.toggle(Severity::High);
        let sections = list_sections(&snapshot, toggles);
        assert_eq!(sections[0].fires.len(), 2);
        let rows = list_rows(&sections);
        assert_eq!(rows.len(), 3);
        assert!(matches!(rows[0], ListRow::Header { collapsed: true, count: 2, .. }));
    }

    #[test]
    fn filter_applies_before_grouping() {
        let snapshot = snapshot();
        let sections = list_sections_where(&snapshot, TierToggles::default(), |fire| fire.id() == "b");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].severity, Severity::Medium);
    }

    #[test]
    fn alert_panel_always_builds_every_entry() {
        let with_alerts = snapshot().with_alerts(vec![alert("1"), alert("2"), alert("3")]);
        let collapsed = AlertPanel::build(&with_alerts, false);
        let Some(panel) = collapsed else {
            panic!("alerts present");
        };
        assert_eq!(panel.headline, "3 HIGH SEVERITY ALERTS");
        assert_eq!(panel.entries.len(), 3);
        assert!(panel.visible_entries().is_empty());
        assert_eq!(panel.entries[2].title(), "ALERT #3 [SENT]");

        let expanded = AlertPanel::build(&with_alerts, true);
        let Some(panel) = expanded else {
            panic!("alerts present");
        };
        let numbers: Vec<usize> = panel.visible_entries().iter().map(|entry| entry.number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert_eq!(panel.toggle_label(), "Hide Details");
    }

    #[test]
    fn single_alert_headline_is_singular() {
        let with_alert = snapshot().with_alerts(vec![alert("1")]);
        let panel = AlertPanel::build(&with_alert, true);
        assert_eq!(panel.map(|panel| panel.headline), Some("1 HIGH SEVERITY ALERT".to_string()));
        assert!(AlertPanel::build(&snapshot(), true).is_none());
    }

    #[test]
    fn stats_view_states() {
        assert_eq!(StatsView::build(None), StatsView::Loading);
        assert!(StatsView::build(None).cards().is_none());

        let empty = Snapshot::default();
        let view = StatsView::build(Some(&empty));
        assert!(matches!(view, StatsView::NoFires { counts, .. } if counts.total == 0));
        assert_eq!(view.cards().map(|cards| cards[0].2), Some(0));

        let full = snapshot();
        let view = StatsView::build(Some(&full));
        assert!(matches!(&view, StatsView::Table { rows, .. } if rows.len() == 3));
    }

    #[test]
    fn stats_row_marks_alerts() {
        let snapshot = snapshot();
        let row = StatsRow::from(&snapshot.fires()[0]);
        assert_eq!(row.severity_cell(), "🔴 HIGH ⚠");
        assert_eq!(row.brightness, "350.0K (high)");
    }

    #[test]
    fn map_uses_default_centre_without_data() {
        let frame = MapFrame::build(None, None, None);
        assert!(frame.markers.is_empty());
        assert!(frame.bounds.contains(DEFAULT_CENTRE.1, DEFAULT_CENTRE.0));
    }

    #[test]
    fn map_frames_markers_and_highlights_selection() {
        let snapshot = snapshot();
        let frame = MapFrame::build(Some(&snapshot), None, Some("b"));
        assert_eq!(frame.markers.len(), 3);
        assert_eq!(frame.markers.last().map(|m| m.severity), Some(Severity::High));
        assert_eq!(frame.selected().map(|m| m.id.as_str()), Some("b"));
        for marker in &frame.markers {
            assert!(frame.bounds.contains(marker.lon, marker.lat));
        }
    }

    #[test]
    fn detail_popup_lists_record_fields() {
        let snapshot = snapshot();
        let details = fire_details(&snapshot.fires()[0]);
        assert!(details.contains(&("Detected", "2:04 PM IST".to_string())));
        assert!(details.iter().any(|(label, _)| *label == "Alert"));
    }

    #[test]
    fn summary_lists_every_tier() {
        let summary = tier_summary(TierCounts::of(&snapshot()));
        assert_eq!(summary, "🔴 2 High · 🟠 1 Medium · 🟡 0 Low");
    }
}
