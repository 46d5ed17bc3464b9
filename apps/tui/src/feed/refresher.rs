use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use firewatch_core::{FeedState, FetchOutcome, RefreshGate};
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Background task that keeps the [`FeedState`] current.
///
/// Fetches once at start, then on every interval tick and on every manual
/// request. It is the only writer of the watch channel.
pub struct FeedRefresher {
    handle: Option<JoinHandle<()>>,
    cancel_token: CancellationToken,
    refresh_tx: mpsc::Sender<()>,
    state_rx: watch::Receiver<FeedState>,
}

impl FeedRefresher {
    pub fn start<F, Fut>(fetch: F, interval: Duration) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(FeedState::new());
        // One queued request is enough; extra presses while it waits are dropped.
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        let handle = tokio::spawn(refresh_loop(
            fetch,
            interval,
            state_tx,
            refresh_rx,
            cancel_token.clone(),
        ));

        Self {
            handle: Some(handle),
            cancel_token,
            refresh_tx,
            state_rx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state_rx.clone()
    }

    /// Returns `false` when a refresh is already queued.
    pub fn request_refresh(&self) -> bool {
        self.refresh_tx.try_send(()).is_ok()
    }

    /// Cancels the task and waits for it. An in-flight fetch is dropped.
    pub async fn stop(mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(error) = handle.await {
                warn!("refresh task failed to join: {error}");
            }
        }
    }
}

impl Drop for FeedRefresher {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn refresh_loop<F, Fut>(
    fetch: F,
    interval: Duration,
    state_tx: watch::Sender<FeedState>,
    mut refresh_rx: mpsc::Receiver<()>,
    cancel_token: CancellationToken,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = FetchOutcome>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut gate = RefreshGate::new();

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            _ = ticker.tick() => debug!("scheduled refresh"),
            Some(()) = refresh_rx.recv() => {
                debug!("manual refresh");
                ticker.reset();
            }
        }

        let Some(ticket) = gate.try_begin() else {
            continue;
        };

        let outcome = tokio::select! {
            () = cancel_token.cancelled() => {
                gate.close();
                break;
            }
            outcome = fetch() => outcome,
        };

        if gate.finish(ticket) {
            state_tx.send_modify(|state| state.apply(outcome, Utc::now()));
        }
    }

    info!("refresh task stopped");
}
