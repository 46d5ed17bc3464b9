//! Aggregate figures for the statistics view and the headless report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Severity;
use crate::model::{ClassifiedFire, Snapshot};

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    pub fn of(snapshot: &Snapshot) -> Self {
        Self {
            total: snapshot.total(),
            high: snapshot.count(Severity::High),
            medium: snapshot.count(Severity::Medium),
            low: snapshot.count(Severity::Low),
        }
    }

    pub const fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Short description of one detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireBrief {
    pub id: String,
    pub severity: Severity,
    pub place: String,
    pub local_time: String,
    pub acq_date: String,
    pub brightness: f64,
    pub frp: f64,
}

impl From<&ClassifiedFire> for FireBrief {
    fn from(fire: &ClassifiedFire) -> Self {
        Self {
            id: fire.id().to_string(),
            severity: fire.severity,
            place: fire.record.place(),
            local_time: fire.local_time.clone(),
            acq_date: fire.record.acq_date.to_string(),
            brightness: fire.record.brightness,
            frp: fire.record.frp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotStats {
    pub counts: TierCounts,
    pub alerts: usize,
    pub flagged: usize,
    pub by_satellite: BTreeMap<String, usize>,
    pub by_confidence: BTreeMap<String, usize>,
    pub strongest: Option<FireBrief>,
    pub recent: Vec<FireBrief>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl SnapshotStats {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut by_satellite = BTreeMap::new();
        let mut by_confidence = BTreeMap::new();
        for fire in snapshot.fires() {
            let satellite = fire
                .record
                .satellite
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            *by_satellite.entry(satellite).or_insert(0) += 1;
            *by_confidence
                .entry(fire.record.confidence.as_str().to_string())
                .or_insert(0) += 1;
        }

        let strongest = snapshot
            .fires()
            .iter()
            .max_by(|a, b| a.record.frp.total_cmp(&b.record.frp))
            .map(FireBrief::from);

        // Undated records sort last; ties keep source order.
        let mut dated: Vec<&ClassifiedFire> = snapshot.fires().iter().collect();
        dated.sort_by_key(|fire| {
            std::cmp::Reverse(
                fire.record
                    .acquired_at()
                    .or_else(|| fire.record.acq_date.and_hms_opt(0, 0, 0)),
            )
        });
        let recent = dated.into_iter().take(RECENT_LIMIT).map(FireBrief::from).collect();

        Self {
            counts: TierCounts::of(snapshot),
            alerts: snapshot.alerts().len(),
            flagged: snapshot.fires().iter().filter(|fire| fire.alert).count(),
            by_satellite,
            by_confidence,
            strongest,
            recent,
            last_updated: snapshot.last_updated(),
        }
    }
}
