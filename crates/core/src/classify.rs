//! Severity classification: turns raw detections into a [`Snapshot`].

use std::collections::HashSet;

use crate::acquisition::LocalClock;
use crate::domain::{Confidence, Severity};
use crate::error::SnapshotError;
use crate::model::{ClassifiedFire, FireRecord, Snapshot, WireFire, WireSnapshot};

/// Decides which tier a record belongs to.
pub trait SeverityPolicy {
    fn severity(&self, record: &FireRecord) -> Severity;

    fn raises_alert(&self, severity: Severity) -> bool {
        severity == Severity::High
    }
}

/// Brightness and confidence thresholds used by the detection backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    /// Kelvin above which a high-confidence detection is HIGH.
    pub high_brightness: f64,
    /// Kelvin above which any detection is at least MEDIUM.
    pub medium_brightness: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            high_brightness: 340.0,
            medium_brightness: 320.0,
        }
    }
}

impl SeverityPolicy for ThresholdPolicy {
    fn severity(&self, record: &FireRecord) -> Severity {
        let confident = record.confidence == Confidence::High;
        if record.brightness > self.high_brightness && confident {
            Severity::High
        } else if record.brightness > self.medium_brightness
            || matches!(record.confidence, Confidence::High | Confidence::Nominal)
        {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier<P = ThresholdPolicy> {
    policy: P,
    clock: LocalClock,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: SeverityPolicy> Classifier<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            policy,
            clock: LocalClock::default(),
        }
    }

    /// Classifies raw records. Tier order follows input order.
    pub fn classify<I>(&self, records: I) -> Snapshot
    where
        I: IntoIterator<Item = FireRecord>,
    {
        let fires = records
            .into_iter()
            .map(|record| self.enrich(record, None, None, None))
            .collect();
        Snapshot::assemble(fires, Vec::new(), None)
    }

    /// Parses a snapshot body as served by the API or the static resource.
    pub fn parse(&self, body: &[u8]) -> Result<Snapshot, SnapshotError> {
        let wire: WireSnapshot = serde_json::from_slice(body)?;
        self.from_wire(wire)
    }

    /// Validates a wire snapshot and rebuilds its tiers.
    ///
    /// Fires without a severity tag are tagged by the policy. When the body
    /// carries tier lists they must agree with the flat list, in order.
    pub fn from_wire(&self, wire: WireSnapshot) -> Result<Snapshot, SnapshotError> {
        let WireSnapshot {
            total,
            fires,
            high,
            medium,
            low,
            alerts,
            last_updated,
        } = wire;

        let classified: Vec<ClassifiedFire> = match fires {
            Some(flat) => {
                let classified: Vec<ClassifiedFire> =
                    flat.into_iter().map(|fire| self.enrich_wire(fire)).collect();
                let tiers = [&high, &medium, &low];
                if tiers.iter().any(|tier| !tier.is_empty()) {
                    for severity in Severity::ALL {
                        let listed = tiers[severity.index()]
                            .iter()
                            .map(|fire| fire.record.effective_id());
                        let derived = classified
                            .iter()
                            .filter(|fire| fire.severity == severity)
                            .map(ClassifiedFire::id);
                        if !listed.eq(derived) {
                            return Err(SnapshotError::Inconsistent(severity));
                        }
                    }
                }
                classified
            }
            None => {
                let mut classified = Vec::with_capacity(high.len() + medium.len() + low.len());
                for (severity, tier) in Severity::ALL.into_iter().zip([high, medium, low]) {
                    for mut fire in tier {
                        if let Some(tagged) = fire.severity.filter(|tagged| *tagged != severity) {
                            return Err(SnapshotError::TierConflict {
                                id: fire.record.effective_id(),
                                listed: severity,
                                tagged,
                            });
                        }
                        fire.severity = Some(severity);
                        classified.push(self.enrich_wire(fire));
                    }
                }
                classified
            }
        };

        if let Some(claimed) = total {
            if claimed != classified.len() {
                return Err(SnapshotError::TotalMismatch {
                    claimed,
                    actual: classified.len(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(classified.len());
        if let Some(duplicate) = classified.iter().find(|fire| !seen.insert(fire.id())) {
            log::debug!("snapshot repeats fire id {}", duplicate.id());
        }

        Ok(Snapshot::assemble(
            classified,
            alerts.unwrap_or_default(),
            last_updated,
        ))
    }

    fn enrich_wire(&self, fire: WireFire) -> ClassifiedFire {
        self.enrich(fire.record, fire.severity, fire.local_time, fire.alert)
    }

    fn enrich(
        &self,
        mut record: FireRecord,
        tagged: Option<Severity>,
        local_time: Option<String>,
        alert: Option<bool>,
    ) -> ClassifiedFire {
        record.id = record.effective_id();
        let severity = tagged.unwrap_or_else(|| self.policy.severity(&record));
        let local_time = local_time.unwrap_or_else(|| {
            record.acquired_at().map_or_else(
                || record.acq_date.to_string(),
                |instant| self.clock.format(instant),
            )
        });
        let alert = alert.unwrap_or_else(|| self.policy.raises_alert(severity));

        ClassifiedFire {
            record,
            severity,
            local_time,
            alert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, brightness: f64, confidence: Confidence) -> FireRecord {
        FireRecord {
            id: id.to_string(),
            latitude: 30.0,
            longitude: 79.0,
            brightness,
            frp: 5.0,
            acq_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap_or_default(),
            acq_time: Some("0834".to_string()),
            datetime_utc: None,
            satellite: Some("N".to_string()),
            confidence,
            location: None,
        }
    }

    fn mixed() -> Vec<FireRecord> {
        vec![
            record("a", 350.0, Confidence::High),
            record("b", 300.0, Confidence::Low),
            record("c", 330.0, Confidence::Low),
            record("d", 345.0, Confidence::High),
            record("e", 310.0, Confidence::Nominal),
            record("f", 290.0, Confidence::Low),
        ]
    }

    fn ids<'a>(fires: impl Iterator<Item = &'a ClassifiedFire>) -> Vec<&'a str> {
        fires.map(ClassifiedFire::id).collect()
    }

    #[test]
    fn threshold_policy_matches_backend_rules() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.severity(&record("x", 341.0, Confidence::High)), Severity::High);
        assert_eq!(policy.severity(&record("x", 341.0, Confidence::Nominal)), Severity::Medium);
        assert_eq!(policy.severity(&record("x", 300.0, Confidence::High)), Severity::Medium);
        assert_eq!(policy.severity(&record("x", 321.0, Confidence::Low)), Severity::Medium);
        assert_eq!(policy.severity(&record("x", 320.0, Confidence::Low)), Severity::Low);
    }

    #[test]
    fn custom_policy_drives_tiers_and_alerts() {
        struct BrightnessOnly;

        impl SeverityPolicy for BrightnessOnly {
            fn severity(&self, record: &FireRecord) -> Severity {
                if record.brightness > 300.0 {
                    Severity::High
                } else {
                    Severity::Low
                }
            }

            fn raises_alert(&self, _severity: Severity) -> bool {
                false
            }
        }

        let snapshot = Classifier::with_policy(BrightnessOnly).classify(mixed());
        assert_eq!(ids(snapshot.tier(Severity::High)), ["a", "c", "d", "e"]);
        assert_eq!(ids(snapshot.tier(Severity::Low)), ["b", "f"]);
        assert!(snapshot.fires().iter().all(|fire| !fire.alert));
    }

    #[test]
    fn tiers_partition_the_flat_list() {
        let snapshot = Classifier::new().classify(mixed());

        let sum: usize = Severity::ALL.iter().map(|s| snapshot.count(*s)).sum();
        assert_eq!(snapshot.total(), 6);
        assert_eq!(sum, snapshot.total());

        for fire in snapshot.fires() {
            let memberships = Severity::ALL
                .iter()
                .filter(|s| snapshot.tier(**s).any(|other| other.id() == fire.id()))
                .count();
            assert_eq!(memberships, 1, "fire {} in {memberships} tiers", fire.id());
        }
    }

    #[test]
    fn partition_is_stable() {
        let snapshot = Classifier::new().classify(mixed());
        assert_eq!(ids(snapshot.tier(Severity::High)), ["a", "d"]);
        assert_eq!(ids(snapshot.tier(Severity::Medium)), ["c", "e"]);
        assert_eq!(ids(snapshot.tier(Severity::Low)), ["b", "f"]);
    }

    #[test]
    fn reclassification_is_idempotent() {
        let classifier = Classifier::new();
        assert_eq!(classifier.classify(mixed()), classifier.classify(mixed()));
    }

    #[test]
    fn empty_input_is_a_valid_snapshot() {
        let snapshot = Classifier::new().classify(Vec::new());
        assert_eq!(snapshot.total(), 0);
        for severity in Severity::ALL {
            assert_eq!(snapshot.count(severity), 0);
        }
    }

    #[test]
    fn high_fires_raise_alerts_and_get_local_time() {
        let snapshot = Classifier::new().classify(mixed());
        let first = &snapshot.fires()[0];
        assert!(first.alert);
        assert_eq!(first.local_time, "2:04 PM IST");
        assert!(!snapshot.fires()[1].alert);
    }

    #[test]
    fn missing_ids_are_derived() {
        let snapshot = Classifier::new().classify(vec![record("", 300.0, Confidence::Low)]);
        assert_eq!(snapshot.fires()[0].id(), "30.00000_79.00000_2025-04-12_0834");
    }

    #[test]
    fn wire_round_trip_preserves_tiers() -> Result<(), SnapshotError> {
        let classifier = Classifier::new();
        let snapshot = classifier.classify(mixed());
        let body = serde_json::to_vec(&snapshot)?;
        let parsed = classifier.parse(&body)?;
        assert_eq!(parsed, snapshot);
        Ok(())
    }

    #[test]
    fn wire_tags_win_over_policy() -> Result<(), SnapshotError> {
        let mut fire = WireFire::from(&Classifier::new().classify(vec![record("z", 290.0, Confidence::Low)]).fires()[0]);
        fire.severity = Some(Severity::High);
        let wire = WireSnapshot {
            total: Some(1),
            fires: Some(vec![fire.clone()]),
            high: vec![fire],
            ..WireSnapshot::default()
        };
        let snapshot = Classifier::new().from_wire(wire)?;
        assert_eq!(snapshot.count(Severity::High), 1);
        Ok(())
    }

    #[test]
    fn inconsistent_tiers_are_rejected() {
        let classifier = Classifier::new();
        let mut wire = classifier.classify(mixed()).to_wire();
        wire.high.pop();
        assert!(matches!(
            classifier.from_wire(wire),
            Err(SnapshotError::Inconsistent(Severity::High))
        ));
    }

    #[test]
    fn wrong_total_is_rejected() {
        let classifier = Classifier::new();
        let mut wire = classifier.classify(mixed()).to_wire();
        wire.total = Some(7);
        assert!(matches!(
            classifier.from_wire(wire),
            Err(SnapshotError::TotalMismatch { claimed: 7, actual: 6 })
        ));
    }

    #[test]
    fn tier_lists_without_flat_list_are_concatenated() -> Result<(), SnapshotError> {
        let classifier = Classifier::new();
        let mut wire = classifier.classify(mixed()).to_wire();
        wire.fires = None;
        let snapshot = classifier.from_wire(wire)?;
        assert_eq!(ids(snapshot.fires().iter()), ["a", "d", "c", "e", "b", "f"]);
        Ok(())
    }

    #[test]
    fn tier_lists_match_fires_without_ids() -> Result<(), SnapshotError> {
        let fire = r#"{"latitude": 30.2, "longitude": 79.1, "brightness": 355.0, "frp": 20.0,
            "acq_date": "2025-04-12", "acq_time": "0834", "confidence": "high"}"#;
        let body = format!(
            r#"{{"total": 1, "fires": [{fire}], "high": [{fire}], "medium": [], "low": []}}"#
        );
        let snapshot = Classifier::new().parse(body.as_bytes())?;
        assert_eq!(snapshot.count(Severity::High), 1);
        assert_eq!(snapshot.fires()[0].id(), "30.20000_79.10000_2025-04-12_0834");
        Ok(())
    }

    #[test]
    fn untagged_stream_is_classified_by_policy() -> Result<(), SnapshotError> {
        let body = br#"{"fires": [
            {"id": "raw", "latitude": 30.2, "longitude": 79.1, "brightness": 355.0,
             "frp": 20.0, "acq_date": "2025-04-12", "acq_time": "1200", "confidence": "h"}
        ]}"#;
        let snapshot = Classifier::new().parse(body)?;
        assert_eq!(snapshot.count(Severity::High), 1);
        assert_eq!(snapshot.fires()[0].local_time, "5:30 PM IST");
        Ok(())
    }
}
