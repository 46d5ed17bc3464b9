use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::acquisition::parse_acq_time;
use crate::domain::{Confidence, Severity, Swatch};

/// One detection event as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireRecord {
    #[serde(default)]
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub brightness: f64,
    pub frp: f64,
    pub acq_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acq_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime_utc: Option<NaiveDateTime>,
    #[serde(default)]
    pub satellite: Option<String>,
    pub confidence: Confidence,
    #[serde(default)]
    pub location: Option<String>,
}

impl FireRecord {
    /// Identifier used when the feed omits one.
    pub fn derived_id(&self) -> String {
        format!(
            "{:.5}_{:.5}_{}_{}",
            self.latitude,
            self.longitude,
            self.acq_date,
            self.acq_time.as_deref().unwrap_or("")
        )
    }

    /// The feed's id, or [`Self::derived_id`] when it is blank.
    pub fn effective_id(&self) -> String {
        if self.id.is_empty() {
            self.derived_id()
        } else {
            self.id.clone()
        }
    }

    /// Acquisition instant in UTC, when the feed carries enough to know it.
    pub fn acquired_at(&self) -> Option<NaiveDateTime> {
        self.datetime_utc.or_else(|| {
            self.acq_time
                .as_deref()
                .and_then(|time| parse_acq_time(self.acq_date, time))
        })
    }

    pub fn coordinates(&self) -> String {
        format!("{:.4}°N, {:.4}°E", self.latitude, self.longitude)
    }

    pub fn place(&self) -> String {
        self.location.clone().unwrap_or_else(|| self.coordinates())
    }
}

/// A record after classification. Built only by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFire {
    pub record: FireRecord,
    pub severity: Severity,
    pub local_time: String,
    pub alert: bool,
}

impl ClassifiedFire {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub const fn swatch(&self) -> Swatch {
        self.severity.swatch()
    }

    pub const fn icon(&self) -> &'static str {
        self.severity.icon()
    }
}

/// Notification raised upstream for a high-severity detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub message: String,
    pub location: String,
    #[serde(default)]
    pub coordinates: String,
    pub detected_at: String,
    pub brightness: f64,
    pub frp: f64,
    #[serde(deserialize_with = "string_or_number")]
    pub priority: String,
    pub status: String,
    #[serde(default)]
    pub recipients: Vec<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// A fire as it travels over the wire: the record plus the classification
/// fields the backend may already have filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFire {
    #[serde(flatten)]
    pub record: FireRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, rename = "datetime_ist", skip_serializing_if = "Option::is_none")]
    pub local_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
}

impl From<&ClassifiedFire> for WireFire {
    fn from(fire: &ClassifiedFire) -> Self {
        Self {
            record: fire.record.clone(),
            severity: Some(fire.severity),
            color: Some(fire.swatch().hex.to_string()),
            icon: Some(fire.icon().to_string()),
            local_time: Some(fire.local_time.clone()),
            alert: Some(fire.alert),
        }
    }
}

/// The JSON body served by both the API and the static fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSnapshot {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub fires: Option<Vec<WireFire>>,
    #[serde(default)]
    pub high: Vec<WireFire>,
    #[serde(default)]
    pub medium: Vec<WireFire>,
    #[serde(default)]
    pub low: Vec<WireFire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl WireSnapshot {
    pub fn tier(&self, severity: Severity) -> &[WireFire] {
        match severity {
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }
}

/// The complete classified data set every view reads from.
///
/// Fires are kept once, in source order; each tier is a list of indices into
/// that sequence, so a fire belongs to exactly one tier by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    fires: Vec<ClassifiedFire>,
    tiers: [Vec<usize>; 3],
    alerts: Vec<Alert>,
    last_updated: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub(crate) fn assemble(
        fires: Vec<ClassifiedFire>,
        alerts: Vec<Alert>,
        last_updated: Option<DateTime<Utc>>,
    ) -> Self {
        let mut tiers: [Vec<usize>; 3] = Default::default();
        for (index, fire) in fires.iter().enumerate() {
            tiers[fire.severity.index()].push(index);
        }

        Self {
            fires,
            tiers,
            alerts,
            last_updated,
        }
    }

    #[must_use]
    pub fn with_alerts(mut self, alerts: Vec<Alert>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn total(&self) -> usize {
        self.fires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fires.is_empty()
    }

    pub fn fires(&self) -> &[ClassifiedFire] {
        &self.fires
    }

    pub fn tier(&self, severity: Severity) -> impl Iterator<Item = &ClassifiedFire> + '_ {
        self.tiers[severity.index()]
            .iter()
            .map(move |&index| &self.fires[index])
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.tiers[severity.index()].len()
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub const fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn to_wire(&self) -> WireSnapshot {
        let tier = |severity: Severity| -> Vec<WireFire> {
            self.tier(severity).map(WireFire::from).collect()
        };
        WireSnapshot {
            total: Some(self.total()),
            fires: Some(self.fires.iter().map(WireFire::from).collect()),
            high: tier(Severity::High),
            medium: tier(Severity::Medium),
            low: tier(Severity::Low),
            alerts: (!self.alerts.is_empty()).then(|| self.alerts.clone()),
            last_updated: self.last_updated,
        }
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_wire().serialize(serializer)
    }
}
