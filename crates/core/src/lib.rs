//! Shared core of the firewatch dashboards.
//!
//! Raw detections go through the [`Classifier`] into a [`Snapshot`]; the
//! front ends keep the current snapshot in a [`FeedState`] and draw the view
//! models from [`views`].

pub mod acquisition;
pub mod boundary;
pub mod classify;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod feed;
pub mod model;
pub mod stats;
pub mod views;

pub use acquisition::LocalClock;
pub use boundary::{Boundary, Bounds};
pub use classify::{Classifier, SeverityPolicy, ThresholdPolicy};
pub use domain::{Confidence, RiskTier, Severity, Swatch};
pub use error::{BoundaryError, FetchError, InputError, SnapshotError};
pub use estimate::{estimate, PredictionInput, PredictionResult};
pub use feed::{
    fetch_with_fallback, FeedState, FeedStatus, FetchOutcome, RefreshGate, SourceKind,
    SourceStrategy,
};
pub use model::{Alert, ClassifiedFire, FireRecord, Snapshot};
pub use stats::{SnapshotStats, TierCounts};
