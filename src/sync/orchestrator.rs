use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use log::{error, info, warn};
use tokio::task::{AbortHandle, JoinHandle};
use uuid::Uuid;

use crate::state::{StateBroadcaster, StateSubscription, SyncState, Transaction, UserProfile};
use crate::sync::error::FetchError;
use crate::sync::source::DataSource;

// Drives the fan-out/fan-in protocol against a DataSource and publishes
// Loading -> (Success | Error) transitions through an owned broadcaster.
// Overlapping loads are serialized by cancelling the previous invocation
// before starting the next one.
pub struct SyncOrchestrator {
    broadcaster: Arc<StateBroadcaster>,
    source: Arc<DataSource>,
    invocations: Arc<AtomicU64>,
    inflight: Arc<Mutex<Vec<AbortHandle>>>,
}

impl SyncOrchestrator {
    pub fn new(source: Arc<DataSource>) -> Self {
        Self {
            broadcaster: Arc::new(StateBroadcaster::new()),
            source,
            invocations: Arc::new(AtomicU64::new(0)),
            inflight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    // Non-blocking: publishes Loading synchronously, then hands the fetches
    // off to the worker pool. Failure never reaches the caller; it is only
    // observable through the state feed.
    pub fn load(&self) {
        let mut inflight = self.inflight.lock().unwrap();
        for handle in inflight.drain(..) {
            handle.abort();
        }
        let invocation = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;

        // Loading goes out strictly before either fetch starts
        if let Err(e) = self.broadcaster.publish(SyncState::Loading) {
            error!("Failed to publish loading state: {}", e);
        }
        info!("Sync invocation {} started", invocation);

        // Fan-out: both fetches run as independent tasks
        let source = Arc::clone(&self.source);
        let profile_task = tokio::spawn(async move { source.fetch_profile().await });
        let source = Arc::clone(&self.source);
        let history_task = tokio::spawn(async move { source.fetch_history().await });

        inflight.push(profile_task.abort_handle());
        inflight.push(history_task.abort_handle());

        let broadcaster = Arc::clone(&self.broadcaster);
        let invocations = Arc::clone(&self.invocations);
        let registry = Arc::clone(&self.inflight);
        let supervisor = tokio::spawn(async move {
            let outcome = join_fetches(profile_task, history_task).await;

            // Final check before publishing: holding the registry lock keeps
            // cancel() from slipping in between the check and the publish.
            // A superseded invocation discards its result silently.
            let _inflight = registry.lock().unwrap();
            if invocations.load(Ordering::SeqCst) != invocation {
                info!("Sync invocation {} superseded, discarding result", invocation);
                return;
            }

            match outcome {
                Ok((profile, transactions)) => {
                    info!(
                        "Sync invocation {} completed: {} transactions for user {}",
                        invocation,
                        transactions.len(),
                        profile.user_id
                    );
                    let _ = broadcaster.publish(SyncState::Success { profile, transactions });
                }
                Err(FetchError::Cancelled) => {
                    info!("Sync invocation {} cancelled", invocation);
                }
                Err(err) => {
                    warn!("Sync invocation {} failed: {}", invocation, err);
                    let _ = broadcaster.publish(SyncState::Error {
                        message: format!("Sync failed: {}", err),
                    });
                }
            }
        });
        inflight.push(supervisor.abort_handle());
    }

    pub fn observe(&self) -> Result<StateSubscription, String> {
        self.broadcaster.subscribe()
    }

    pub fn unsubscribe(&self, id: Uuid) {
        self.broadcaster.unsubscribe(id);
    }

    pub fn current_state(&self) -> SyncState {
        self.broadcaster.current_state()
    }

    pub fn observer_count(&self) -> usize {
        self.broadcaster.observer_count()
    }

    // Aborts the in-flight invocation, fetches included. No further state is
    // published for it: giving up is not a failure, so no Error goes out.
    pub fn cancel(&self) {
        let mut inflight = self.inflight.lock().unwrap();
        if inflight.is_empty() {
            return;
        }
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let count = inflight.len();
        for handle in inflight.drain(..) {
            handle.abort();
        }
        info!("Cancelled in-flight sync, {} tasks aborted", count);
    }
}

// Fan-in: wait for both fetches, but let the first failure abort the
// still-running sibling instead of waiting it out.
async fn join_fetches(
    mut profile_task: JoinHandle<UserProfile>,
    mut history_task: JoinHandle<Result<Vec<Transaction>, FetchError>>,
) -> Result<(UserProfile, Vec<Transaction>), FetchError> {
    tokio::select! {
        joined = &mut profile_task => {
            let profile = match joined {
                Ok(profile) => profile,
                Err(err) => {
                    history_task.abort();
                    return Err(FetchError::from_join(err, "profile fetch"));
                }
            };
            let transactions = match history_task.await {
                Ok(Ok(transactions)) => transactions,
                Ok(Err(err)) => return Err(err),
                Err(err) => return Err(FetchError::from_join(err, "history fetch")),
            };
            Ok((profile, transactions))
        }
        joined = &mut history_task => {
            let transactions = match joined {
                Ok(Ok(transactions)) => transactions,
                Ok(Err(err)) => {
                    profile_task.abort();
                    return Err(err);
                }
                Err(err) => {
                    profile_task.abort();
                    return Err(FetchError::from_join(err, "history fetch"));
                }
            };
            let profile = match profile_task.await {
                Ok(profile) => profile,
                Err(err) => return Err(FetchError::from_join(err, "profile fetch")),
            };
            Ok((profile, transactions))
        }
    }
}
