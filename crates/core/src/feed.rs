//! Fetch policy and the snapshot store shared by the front ends.
//!
//! Transport lives in each front end; this module decides which source to
//! try, what to keep when both fail, and when a finished fetch is stale.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::error::FetchError;
use crate::model::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Primary,
    Fallback,
}

impl SourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "live API",
            Self::Fallback => "static snapshot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceStrategy {
    /// Ask the API first and fall back to the static resource.
    #[default]
    PrimaryWithFallback,
    /// Only read the static resource.
    FallbackOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched {
        snapshot: Snapshot,
        source: SourceKind,
    },
    Failed {
        primary: Option<FetchError>,
        fallback: FetchError,
    },
}

impl FetchOutcome {
    pub fn summary(&self) -> String {
        match self {
            Self::Fetched { snapshot, source } => {
                format!("{} fires from {}", snapshot.total(), source.label())
            }
            Self::Failed {
                primary: Some(primary),
                fallback,
            } => format!("API: {primary}; fallback: {fallback}"),
            Self::Failed {
                primary: None,
                fallback,
            } => format!("fallback: {fallback}"),
        }
    }
}

/// Tries the primary source, then the fallback.
///
/// With [`SourceStrategy::FallbackOnly`] the primary is never called.
pub async fn fetch_with_fallback<P, PFut, F, FFut>(
    strategy: SourceStrategy,
    primary: P,
    fallback: F,
) -> FetchOutcome
where
    P: FnOnce() -> PFut,
    PFut: Future<Output = Result<Snapshot, FetchError>>,
    F: FnOnce() -> FFut,
    FFut: Future<Output = Result<Snapshot, FetchError>>,
{
    let primary_error = match strategy {
        SourceStrategy::PrimaryWithFallback => match primary().await {
            Ok(snapshot) => {
                return FetchOutcome::Fetched {
                    snapshot,
                    source: SourceKind::Primary,
                }
            }
            Err(error) => {
                warn!("primary source failed, trying fallback: {error}");
                Some(error)
            }
        },
        SourceStrategy::FallbackOnly => None,
    };

    match fallback().await {
        Ok(snapshot) => FetchOutcome::Fetched {
            snapshot,
            source: SourceKind::Fallback,
        },
        Err(error) => {
            warn!("fallback source failed: {error}");
            FetchOutcome::Failed {
                primary: primary_error,
                fallback: error,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Loading,
    Live(SourceKind),
    /// Last refresh failed; the previous snapshot is still shown.
    Stale(String),
    /// Every refresh so far has failed.
    Unavailable(String),
}

/// The current snapshot and how it was obtained.
///
/// The snapshot is only ever replaced whole, so a reader holding a clone of
/// this state always sees a consistent data set.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    snapshot: Option<Arc<Snapshot>>,
    status: FeedStatus,
    refreshed_at: Option<DateTime<Utc>>,
    attempted_at: Option<DateTime<Utc>>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, outcome: FetchOutcome, now: DateTime<Utc>) {
        self.attempted_at = Some(now);
        match outcome {
            FetchOutcome::Fetched { snapshot, source } => {
                info!(
                    "snapshot refreshed from {}: {} fires",
                    source.label(),
                    snapshot.total()
                );
                self.snapshot = Some(Arc::new(snapshot));
                self.status = FeedStatus::Live(source);
                self.refreshed_at = Some(now);
            }
            failed @ FetchOutcome::Failed { .. } => {
                let reason = failed.summary();
                self.status = if self.snapshot.is_some() {
                    FeedStatus::Stale(reason)
                } else {
                    FeedStatus::Unavailable(reason)
                };
            }
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    pub fn shared_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.clone()
    }

    pub const fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub const fn attempted_at(&self) -> Option<DateTime<Utc>> {
        self.attempted_at
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none()
    }

    /// One-line description for a status bar.
    pub fn status_line(&self) -> String {
        match &self.status {
            FeedStatus::Loading => "Loading fire data...".to_string(),
            FeedStatus::Live(source) => self.refreshed_at.map_or_else(
                || format!("Live from {}", source.label()),
                |at| format!("Live from {} • refreshed {}", source.label(), at.format("%H:%M UTC")),
            ),
            FeedStatus::Stale(reason) => format!("Stale data, refresh failed ({reason})"),
            FeedStatus::Unavailable(reason) => format!("Fire data unavailable ({reason})"),
        }
    }
}

/// Ticket for one in-flight refresh.
#[derive(Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    epoch: u64,
}

/// Keeps refreshes from overlapping and drops results that land after
/// teardown.
#[derive(Debug, Default)]
pub struct RefreshGate {
    in_flight: bool,
    closed: bool,
    epoch: u64,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` while another refresh is running or after `close`.
    pub fn try_begin(&mut self) -> Option<RefreshTicket> {
        if self.in_flight || self.closed {
            return None;
        }
        self.in_flight = true;
        Some(RefreshTicket { epoch: self.epoch })
    }

    /// Ends a refresh. Returns whether its result may still be applied.
    pub fn finish(&mut self, ticket: RefreshTicket) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        self.in_flight = false;
        !self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.in_flight = false;
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::domain::Confidence;
    use crate::model::FireRecord;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn snapshot(count: usize) -> Snapshot {
        let records = (0..count).map(|index| FireRecord {
            id: format!("fire-{index}"),
            latitude: 30.0,
            longitude: 79.0,
            brightness: 330.0,
            frp: 4.0,
            acq_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap_or_default(),
            acq_time: None,
            datetime_utc: None,
            satellite: None,
            confidence: Confidence::Nominal,
            location: None,
        });
        Classifier::new().classify(records)
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let fallback_called = Cell::new(false);
        let flag = &fallback_called;
        let outcome = fetch_with_fallback(
            SourceStrategy::PrimaryWithFallback,
            || async { Ok(snapshot(2)) },
            move || async move {
                flag.set(true);
                Ok(snapshot(1))
            },
        )
        .await;

        assert_eq!(
            outcome,
            FetchOutcome::Fetched {
                snapshot: snapshot(2),
                source: SourceKind::Primary
            }
        );
        assert!(!fallback_called.get());
    }

    #[tokio::test]
    async fn primary_failure_uses_fallback_content() {
        let outcome = fetch_with_fallback(
            SourceStrategy::PrimaryWithFallback,
            || async { Err(FetchError::Status(502)) },
            || async { Ok(snapshot(3)) },
        )
        .await;

        let mut state = FeedState::new();
        state.apply(outcome, Utc::now());
        assert_eq!(state.snapshot(), Some(&snapshot(3)));
        assert_eq!(state.status(), &FeedStatus::Live(SourceKind::Fallback));
    }

    #[tokio::test]
    async fn fallback_only_never_calls_primary() {
        let primary_called = Cell::new(false);
        let flag = &primary_called;
        let outcome = fetch_with_fallback(
            SourceStrategy::FallbackOnly,
            move || async move {
                flag.set(true);
                Ok(snapshot(1))
            },
            || async { Err(FetchError::NotConfigured) },
        )
        .await;

        assert!(!primary_called.get());
        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                primary: None,
                fallback: FetchError::NotConfigured
            }
        );
    }

    #[tokio::test]
    async fn double_failure_keeps_previous_snapshot() {
        let mut state = FeedState::new();
        state.apply(
            FetchOutcome::Fetched {
                snapshot: snapshot(4),
                source: SourceKind::Primary,
            },
            Utc::now(),
        );
        let before = state.shared_snapshot();

        let outcome = fetch_with_fallback(
            SourceStrategy::PrimaryWithFallback,
            || async { Err(FetchError::Network("refused".to_string())) },
            || async { Err(FetchError::Malformed("eof".to_string())) },
        )
        .await;
        state.apply(outcome, Utc::now());

        let after = state.shared_snapshot();
        assert!(matches!((before, after), (Some(a), Some(b)) if Arc::ptr_eq(&a, &b)));
        assert!(matches!(state.status(), FeedStatus::Stale(_)));
        assert!(state.status_line().starts_with("Stale data"));
    }

    #[test]
    fn failure_before_first_snapshot_is_unavailable() {
        let mut state = FeedState::new();
        assert!(state.is_loading());
        state.apply(
            FetchOutcome::Failed {
                primary: Some(FetchError::Status(500)),
                fallback: FetchError::Status(404),
            },
            Utc::now(),
        );
        assert!(state.is_loading());
        assert!(matches!(state.status(), FeedStatus::Unavailable(reason) if reason.contains("404")));
    }

    #[test]
    fn gate_rejects_overlapping_refreshes() {
        let mut gate = RefreshGate::new();
        let ticket = gate.try_begin();
        assert!(ticket.is_some());
        assert!(gate.try_begin().is_none());
        assert!(ticket.is_some_and(|ticket| gate.finish(ticket)));
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn gate_discards_results_after_close() {
        let mut gate = RefreshGate::new();
        let Some(ticket) = gate.try_begin() else {
            panic!("gate should open");
        };
        gate.close();
        assert!(!gate.finish(ticket));
        assert!(gate.try_begin().is_none());
        assert!(gate.is_closed());
    }
}
