//! Reducer-driven stores with snapshot-after-transition persistence.
//!
//! Each store serializes every mutation through one `dispatch` entry point.
//! Until `finish_loading` is called, transitions are applied in memory only,
//! so an empty initial state can never overwrite a snapshot that has not been
//! restored yet.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::persistence::{PersistError, PersistenceGateway};

/// Pure state-transition function plus the metadata a [`Store`] needs to persist it.
pub trait Reducer: Send + Sync + 'static {
    type State: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Action: Send;

    /// Key the full state is snapshotted under.
    const SNAPSHOT_KEY: &'static str;

    /// Total: every (state, action) pair yields a state, never an error.
    fn reduce(state: &Self::State, action: Self::Action) -> Self::State;

    /// The action that replaces the whole state with a restored snapshot.
    fn load_snapshot(snapshot: Self::State) -> Self::Action;

    fn action_name(action: &Self::Action) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Absent,
    /// A blob existed but did not decode; treated as absent.
    Malformed,
    /// The backend could not be read; treated as absent.
    Unavailable,
}

impl RestoreOutcome {
    pub fn is_restored(self) -> bool {
        self == RestoreOutcome::Restored
    }
}

struct StoreInner<S> {
    state: S,
    hydrated: bool,
}

pub struct Store<R: Reducer> {
    inner: Mutex<StoreInner<R::State>>,
    gateway: PersistenceGateway,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State, gateway: PersistenceGateway) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                state: initial,
                hydrated: false,
            }),
            gateway,
            _reducer: PhantomData,
        }
    }

    /// Applies `action`; returns whether the state changed.
    pub async fn dispatch(&self, action: R::Action) -> bool {
        self.dispatch_with(|_| action).await
    }

    /// Builds the action from the current state while holding the dispatch lock,
    /// so values derived from state (such as the next free id) cannot race.
    pub async fn dispatch_with<F>(&self, make_action: F) -> bool
    where
        F: FnOnce(&R::State) -> R::Action,
    {
        let mut inner = self.inner.lock().await;
        let action = make_action(&inner.state);
        let name = R::action_name(&action);
        let next = R::reduce(&inner.state, action);

        if next == inner.state {
            debug!(key = R::SNAPSHOT_KEY, action = name, "action left state unchanged");
            return false;
        }

        inner.state = next;
        debug!(key = R::SNAPSHOT_KEY, action = name, "state updated");

        if inner.hydrated {
            self.persist(&inner.state).await;
        }
        true
    }

    pub async fn state(&self) -> R::State {
        self.inner.lock().await.state.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub async fn read<T>(&self, f: impl FnOnce(&R::State) -> T) -> T {
        f(&self.inner.lock().await.state)
    }

    /// Replaces in-memory state with the durable snapshot, if a usable one exists.
    pub async fn restore(&self) -> RestoreOutcome {
        match self.gateway.load::<R::State>(R::SNAPSHOT_KEY).await {
            Ok(Some(snapshot)) => {
                self.dispatch(R::load_snapshot(snapshot)).await;
                info!(key = R::SNAPSHOT_KEY, "restored store from snapshot");
                RestoreOutcome::Restored
            }
            Ok(None) => {
                info!(key = R::SNAPSHOT_KEY, "no snapshot found");
                RestoreOutcome::Absent
            }
            Err(e @ PersistError::Decode { .. }) => {
                warn!(key = R::SNAPSHOT_KEY, error = %e, "ignoring malformed snapshot");
                RestoreOutcome::Malformed
            }
            Err(e) => {
                error!(key = R::SNAPSHOT_KEY, error = %e, "snapshot backend unavailable");
                RestoreOutcome::Unavailable
            }
        }
    }

    /// Ends the load phase: from now on every change is snapshotted.
    /// The current state is written once immediately.
    pub async fn finish_loading(&self) {
        let mut inner = self.inner.lock().await;
        inner.hydrated = true;
        self.persist(&inner.state).await;
    }

    async fn persist(&self, state: &R::State) {
        if let Err(e) = self.gateway.save(R::SNAPSHOT_KEY, state).await {
            error!(key = R::SNAPSHOT_KEY, error = %e, "failed to snapshot store state");
        }
    }
}
