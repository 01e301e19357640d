use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::Account;
use crate::error::SessionError;
use crate::ports::WalletServicePort;

pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
struct AppliedCount {
    seq: u64,
    total: u64,
}

struct PollSession {
    address: String,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodically re-reads the outstanding-transaction count for one
/// address while a consumer is mounted.
///
/// One live task at most: `start` tears down any previous session and
/// `stop`/drop abort the task, so no timer outlives its mount window.
/// Every request carries a monotonic sequence number and a response is
/// applied only if it is newer than the applied watermark, so a slow
/// response from an old session can never overwrite fresher data.
/// Failed ticks are swallowed; the previous count stays visible and the
/// next tick self-heals.
pub struct PendingActivityPoller<W> {
    wallet: Arc<W>,
    period: Duration,
    ticket: Arc<AtomicU64>,
    latest: Arc<Mutex<AppliedCount>>,
    session: Mutex<Option<PollSession>>,
}

impl<W> PendingActivityPoller<W>
where
    W: WalletServicePort + 'static,
{
    pub fn new(wallet: Arc<W>) -> Self {
        Self::with_period(wallet, DEFAULT_POLL_PERIOD)
    }

    pub fn with_period(wallet: Arc<W>, period: Duration) -> Self {
        Self {
            wallet,
            period: period.max(Duration::from_millis(1)),
            ticket: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(Mutex::new(AppliedCount::default())),
            session: Mutex::new(None),
        }
    }

    /// Begin polling for `address`, replacing any running session.
    pub fn start(&self, address: &str) {
        self.stop();

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let wallet = Arc::clone(&self.wallet);
        let ticket = Arc::clone(&self.ticket);
        let latest = Arc::clone(&self.latest);
        let period = self.period;
        let target = address.to_owned();

        let handle = tokio::spawn(async move {
            // The interval's first tick completes immediately, so the
            // count is fresh on mount instead of waiting out a period.
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let seq = ticket.fetch_add(1, Ordering::SeqCst) + 1;
                        match wallet.pending_count(&target).await {
                            Ok(count) => apply_count(&latest, seq, count.total_count),
                            Err(err) => {
                                let err = SessionError::PollingFetch(err.to_string());
                                tracing::debug!(error = %err, address = %target, "poll tick failed");
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        if let Ok(mut g) = self.session.lock() {
            *g = Some(PollSession {
                address: address.to_owned(),
                shutdown: shutdown_tx,
                handle,
            });
        }
    }

    /// Tear down the polling session. Idempotent.
    pub fn stop(&self) {
        let taken = self.session.lock().ok().and_then(|mut g| g.take());
        if let Some(session) = taken {
            let _ = session.shutdown.send(true);
            session.handle.abort();
        }
    }

    /// Bind the polling lifecycle to the active account: a new address
    /// restarts onto it, the same address is a no-op, and a vanished
    /// account stops the session.
    pub fn watch_account(&self, account: Option<&Account>) {
        match account {
            Some(account) => {
                let already_polling = self
                    .session
                    .lock()
                    .ok()
                    .map(|g| {
                        g.as_ref()
                            .is_some_and(|s| s.address == account.address)
                    })
                    .unwrap_or(false);
                if !already_polling {
                    self.start(&account.address);
                }
            }
            None => self.stop(),
        }
    }

    pub fn pending_count(&self) -> u64 {
        self.latest.lock().map(|g| g.total).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.session.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    pub fn active_address(&self) -> Option<String> {
        self.session
            .lock()
            .ok()
            .and_then(|g| g.as_ref().map(|s| s.address.clone()))
    }
}

impl<W> Drop for PendingActivityPoller<W> {
    fn drop(&mut self) {
        if let Ok(mut g) = self.session.lock() {
            if let Some(session) = g.take() {
                session.handle.abort();
            }
        }
    }
}

fn apply_count(latest: &Mutex<AppliedCount>, seq: u64, total: u64) {
    if let Ok(mut g) = latest.lock() {
        if seq > g.seq {
            g.seq = seq;
            g.total = total;
        }
    }
}
