//! Generated-module registration.
//!
//! Every crate that runs the generator produces one install function. Two
//! mechanisms get those functions called while the host assembles its
//! container:
//!
//! - [`GENERATED_MODULES`], a `linkme` distributed slice that crates submit
//!   a [`ModuleEntry`] to at compile time, discovered with no central list
//!   to maintain;
//! - [`ModuleQueue`], an owned one-shot queue for hosts that wire modules
//!   up explicitly (or seed from the slice via [`ModuleQueue::from_linked`]).
//!
//! A queue is constructed fresh for one composition phase and drained
//! exactly once. Draining takes every pending callback out under the lock
//! and runs each a single time; a second drain finds the queue empty and
//! is a no-op.

use std::sync::{Mutex, PoisonError};

use crate::collection::ServiceCollection;

/// Install function produced by the generator for one crate.
///
/// `categories` carries the host's active category names; the generated
/// body skips category-gated registrations that match none of them.
pub type InstallFn = fn(&mut ServiceCollection, &[&str]);

/// One generated module, submitted to [`GENERATED_MODULES`].
pub struct ModuleEntry {
    /// Module name, normally the crate that generated the install function.
    pub name: &'static str,
    /// The generated install function.
    pub install: InstallFn,
}

// Auto-collection via linkme distributed slices - generated crates submit
// entries at compile time.
#[linkme::distributed_slice]
pub static GENERATED_MODULES: [ModuleEntry] = [..];

type Callback = Box<dyn FnOnce(&mut ServiceCollection, &[&str]) + Send>;

/// One-shot queue of pending module install callbacks.
///
/// Owned by the host for the duration of a single composition phase. Unlike
/// a process-global registry, dropping the queue drops anything that was
/// never drained, and two independent compositions cannot observe each
/// other's modules.
#[derive(Default)]
pub struct ModuleQueue {
    pending: Mutex<Vec<Callback>>,
}

impl ModuleQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue seeded with every entry in [`GENERATED_MODULES`].
    pub fn from_linked() -> Self {
        let queue = Self::new();
        for entry in GENERATED_MODULES {
            queue.register(entry.install);
        }
        queue
    }

    /// Appends a callback to run on the next drain.
    pub fn register(&self, callback: impl FnOnce(&mut ServiceCollection, &[&str]) + Send + 'static) {
        self.lock_pending().push(Box::new(callback));
    }

    /// Runs every pending callback exactly once against `services`, in
    /// registration order, and clears the queue. Returns how many ran.
    pub fn drain_into(&self, services: &mut ServiceCollection, categories: &[&str]) -> usize {
        // Take the batch under the lock, run it outside, so callbacks may
        // register follow-up modules for a later drain without deadlocking.
        let batch = std::mem::take(&mut *self.lock_pending());
        let count = batch.len();
        for callback in batch {
            callback(services, categories);
        }
        count
    }

    /// Number of callbacks waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.lock_pending().len()
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Vec<Callback>> {
        // A poisoned lock only means another thread panicked mid-push; the
        // Vec itself is still coherent.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
