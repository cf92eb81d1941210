//! Single-write entry storage shared by both hubs.

use crate::core::{ResolutionState, Value};
use crate::errors::{CircularDependencyError, HubError};
use parking_lot::{Condvar, Mutex};
use std::collections::{BTreeMap, HashMap};
use std::thread::{self, ThreadId};

#[derive(Debug)]
enum Slot {
    Resolving(ThreadId),
    Resolved(Value),
}

/// Outcome of asking the bag for a name.
enum Claim {
    Cached(Value),
    Claimed,
    Cycle(Vec<String>),
}

#[derive(Debug, Default)]
struct Slots {
    entries: HashMap<String, Slot>,
    /// Names each thread is currently resolving, outermost first.
    chains: HashMap<ThreadId, Vec<String>>,
    /// The name each blocked thread is waiting for.
    waiting: HashMap<ThreadId, String>,
}

impl Slots {
    /// Returns true if `owner` is `me`, or is blocked (possibly through
    /// other threads) on a name `me` is resolving.
    fn waits_for(&self, mut owner: ThreadId, me: ThreadId) -> bool {
        for _ in 0..=self.waiting.len() {
            if owner == me {
                return true;
            }
            let Some(name) = self.waiting.get(&owner) else {
                return false;
            };
            match self.entries.get(name) {
                Some(Slot::Resolving(next)) => owner = *next,
                _ => return false,
            }
        }
        false
    }

    fn cycle_chain(&self, me: ThreadId, name: &str) -> Vec<String> {
        let mut chain = self.chains.get(&me).cloned().unwrap_or_default();
        if let Some(start) = chain.iter().position(|n| n == name) {
            chain.drain(..start);
        }
        chain.push(name.to_string());
        chain
    }

    fn leave(&mut self, me: ThreadId, name: &str) {
        if let Some(chain) = self.chains.get_mut(&me) {
            if let Some(pos) = chain.iter().rposition(|n| n == name) {
                chain.remove(pos);
            }
            if chain.is_empty() {
                self.chains.remove(&me);
            }
        }
    }
}

/// Releases a claimed name if its resolver unwinds.
struct PendingClaim<'a> {
    bag: &'a EntryBag,
    name: &'a str,
    settled: bool,
}

impl Drop for PendingClaim<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.bag.abandon(self.name);
        }
    }
}

/// A bag of lazily resolved entries.
///
/// Once a name is resolved its value never changes. Names whose resolution
/// fails go back to [`ResolutionState::Unresolved`]. No lock is held while a
/// resolver runs, so resolvers may read other names from the same bag.
///
/// A thread asking for a name that another thread is resolving blocks until
/// that resolution settles. Re-entrant requests, on one thread or across
/// threads waiting on each other, fail with a circular dependency error.
#[derive(Debug, Default)]
pub(crate) struct EntryBag {
    slots: Mutex<Slots>,
    settled: Condvar,
}

impl EntryBag {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores a value up front (e.g. the `context` entry).
    pub(crate) fn seed(&self, name: impl Into<String>, value: Value) {
        self.slots
            .lock()
            .entries
            .insert(name.into(), Slot::Resolved(value));
    }

    /// Returns the cached value, or runs `resolve` exactly once and caches
    /// its successful result.
    pub(crate) fn resolve_with<F>(&self, name: &str, resolve: F) -> Result<Value, HubError>
    where
        F: FnOnce() -> Result<Value, HubError>,
    {
        match self.claim(name) {
            Claim::Cached(value) => Ok(value),
            Claim::Cycle(chain) => Err(CircularDependencyError::new(chain).into()),
            Claim::Claimed => {
                let mut pending = PendingClaim {
                    bag: self,
                    name,
                    settled: false,
                };
                let result = resolve();
                pending.settled = true;
                match result {
                    Ok(value) => {
                        self.fulfil(name, value.clone());
                        Ok(value)
                    }
                    Err(err) => {
                        self.abandon(name);
                        Err(err)
                    }
                }
            }
        }
    }

    fn claim(&self, name: &str) -> Claim {
        let me = thread::current().id();
        let mut slots = self.slots.lock();
        loop {
            let owner = match slots.entries.get(name) {
                Some(Slot::Resolved(value)) => return Claim::Cached(value.clone()),
                Some(Slot::Resolving(owner)) => *owner,
                None => {
                    slots.entries.insert(name.to_string(), Slot::Resolving(me));
                    slots.chains.entry(me).or_default().push(name.to_string());
                    return Claim::Claimed;
                }
            };

            if slots.waits_for(owner, me) {
                return Claim::Cycle(slots.cycle_chain(me, name));
            }
            slots.waiting.insert(me, name.to_string());
            self.settled.wait(&mut slots);
            slots.waiting.remove(&me);
        }
    }

    fn fulfil(&self, name: &str, value: Value) {
        let mut slots = self.slots.lock();
        slots.entries.insert(name.to_string(), Slot::Resolved(value));
        slots.leave(thread::current().id(), name);
        self.settled.notify_all();
    }

    fn abandon(&self, name: &str) {
        let mut slots = self.slots.lock();
        slots.entries.remove(name);
        slots.leave(thread::current().id(), name);
        self.settled.notify_all();
    }

    /// Gets a resolved value without triggering resolution.
    pub(crate) fn peek(&self, name: &str) -> Option<Value> {
        match self.slots.lock().entries.get(name) {
            Some(Slot::Resolved(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub(crate) fn state(&self, name: &str) -> ResolutionState {
        match self.slots.lock().entries.get(name) {
            Some(Slot::Resolved(_)) => ResolutionState::Resolved,
            Some(Slot::Resolving(_)) => ResolutionState::Resolving,
            None => ResolutionState::Unresolved,
        }
    }

    /// Returns the number of resolved entries.
    pub(crate) fn len(&self) -> usize {
        self.slots
            .lock()
            .entries
            .values()
            .filter(|slot| matches!(slot, Slot::Resolved(_)))
            .count()
    }

    /// Returns the resolved names, sorted.
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .slots
            .lock()
            .entries
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Resolved(_)))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Returns a JSON rendering of all resolved entries.
    pub(crate) fn snapshot(&self) -> BTreeMap<String, serde_json::Value> {
        self.slots
            .lock()
            .entries
            .iter()
            .filter_map(|(name, slot)| match slot {
                Slot::Resolved(value) => Some((name.clone(), value.to_json())),
                Slot::Resolving(_) => None,
            })
            .collect()
    }
}
