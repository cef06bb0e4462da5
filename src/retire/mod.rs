// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Deferred retirement of superseded log files.
//!
//! A reconfiguration may race with writers that loaded the previous backend state just before
//! the swap. Instead of closing the old file right away, the backend queues it here; a dedicated
//! worker thread closes it once a grace period has elapsed.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use crate::Trap;
use crate::append::LogFile;

mod state;
mod worker;

use self::state::RetireState;
use self::worker::Worker;

/// The default delay between a file being retired and it being closed.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// A file handle waiting in the [`RetirementQueue`].
#[derive(Debug, Clone)]
pub struct RetirementEntry {
    handle: Arc<LogFile>,
    generation: u64,
}

impl RetirementEntry {
    /// Create an entry for a handle opened by the backend generation `generation`.
    pub fn new(handle: Arc<LogFile>, generation: u64) -> Self {
        Self { handle, generation }
    }

    /// The queued file.
    pub fn handle(&self) -> &Arc<LogFile> {
        &self.handle
    }

    /// The backend generation that opened the file.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub(crate) type Entries = Arc<Mutex<VecDeque<RetirementEntry>>>;

pub(crate) fn lock_entries(entries: &Entries) -> MutexGuard<'_, VecDeque<RetirementEntry>> {
    entries.lock().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn close_entry(entry: &RetirementEntry, trap: &dyn Trap) {
    log::debug!(
        "closing retired log file {} (generation {})",
        entry.handle().path().display(),
        entry.generation()
    );
    if let Err(err) = entry.handle().close() {
        let err = err.with_context("generation", entry.generation());
        trap.trap(&err);
    }
}

pub(crate) enum Task {
    Retire { entries: Vec<RetirementEntry> },
}

/// A FIFO of file handles that are closed by a background worker after a grace period.
///
/// The queue holds every file handle the owner has opened and not yet retired, oldest first.
/// [`retire`](RetirementQueue::retire) pops entries from the front until at most
/// `allowed_outstanding` remain and hands them to the worker, which closes each one once the
/// grace period elapses.
///
/// Dropping the queue, or calling [`shutdown`](RetirementQueue::shutdown), cancels the pending
/// waits and closes every handle still known to the queue. The queue stays usable afterwards:
/// handles retired after a shutdown are closed right away.
#[derive(Debug)]
pub struct RetirementQueue {
    entries: Entries,
    state: RetireState,
    trap: Arc<dyn Trap>,
}

impl RetirementQueue {
    /// Create a queue and spawn its worker thread.
    pub fn new(
        thread_name: impl Into<String>,
        grace_period: Duration,
        trap: Arc<dyn Trap>,
    ) -> Self {
        let entries = Entries::default();
        let (sender, receiver) = crossbeam_channel::unbounded();

        let worker = Worker::new(receiver, entries.clone(), grace_period, trap.clone());
        let handle = std::thread::Builder::new()
            .name(thread_name.into())
            .spawn(move || worker.run())
            .expect("failed to spawn log retirement thread");

        Self {
            entries,
            state: RetireState::new(sender, handle, trap.clone()),
            trap,
        }
    }

    /// Append a handle to the tail of the queue.
    pub fn enqueue(&self, entry: RetirementEntry) {
        lock_entries(&self.entries).push_back(entry);
    }

    /// Retire the oldest entries until at most `allowed_outstanding` remain queued.
    ///
    /// The entries are chosen now, so handles enqueued later are never affected. Never blocks
    /// on the grace period. After a shutdown the retired handles are closed immediately.
    pub fn retire(&self, allowed_outstanding: usize) {
        let retired: Vec<RetirementEntry> = {
            let mut entries = lock_entries(&self.entries);
            let excess = entries.len().saturating_sub(allowed_outstanding);
            entries.drain(..excess).collect()
        };
        if retired.is_empty() {
            return;
        }

        let task = Task::Retire { entries: retired };
        if let Err(Task::Retire { entries }) = self.state.send_task(task) {
            for entry in &entries {
                close_entry(entry, self.trap.as_ref());
            }
        }
    }

    /// The number of handles queued and not yet retired.
    pub fn len(&self) -> usize {
        lock_entries(&self.entries).len()
    }

    /// Whether no handle is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop the worker, closing every pending and queued handle immediately.
    pub fn shutdown(&self) {
        self.state.destroy();
    }
}
