//! Lock-guarded store of controllable states
//!
//! All access goes through [`StateStore::lock`], which hands out a
//! [`StateGuard`] exposing only `snapshot()` and `toggle_all()`. Reads and
//! the read-mutate-read of a control both take the same exclusive lock.

use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use crate::{
    catalog::{CATALOG, ControlStates, Controllable},
    error::{PluginError, PluginResult},
};

/// Holds the current state of every controllable
#[derive(Debug)]
pub struct StateStore {
    states: Mutex<ControlStates>,
}

impl StateStore {
    /// Create a store over `catalog`, starting from its initial flags.
    pub fn new(catalog: &'static [Controllable]) -> Self {
        Self {
            states: Mutex::new(ControlStates::initial(catalog)),
        }
    }

    /// Acquire the exclusive lock for the duration of one critical section.
    pub fn lock(&self) -> PluginResult<StateGuard<'_>> {
        self.states
            .lock()
            .map(|guard| StateGuard { guard })
            .map_err(|_| PluginError::LockPoisoned)
    }

    /// Copy of the current states, taken under the lock.
    pub fn snapshot(&self) -> PluginResult<ControlStates> {
        Ok(self.lock()?.snapshot().clone())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(CATALOG)
    }
}

/// Exclusive access to the store for one critical section
pub struct StateGuard<'a> {
    guard: MutexGuard<'a, ControlStates>,
}

impl StateGuard<'_> {
    pub fn snapshot(&self) -> &ControlStates {
        &self.guard
    }

    /// Flip every controllable in lock-step.
    pub fn toggle_all(&mut self) {
        self.guard.toggle_all();
        trace!("toggled controls: {:?}", self.guard.dead_flags());
    }
}
