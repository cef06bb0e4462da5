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

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;

use crate::Trap;
use crate::retire::Entries;
use crate::retire::RetirementEntry;
use crate::retire::Task;
use crate::retire::close_entry;
use crate::retire::lock_entries;

struct Pending {
    deadline: Instant,
    entry: RetirementEntry,
}

pub(crate) struct Worker {
    receiver: Receiver<Task>,
    entries: Entries,
    grace_period: Duration,
    trap: Arc<dyn Trap>,
}

impl Worker {
    pub(crate) fn new(
        receiver: Receiver<Task>,
        entries: Entries,
        grace_period: Duration,
        trap: Arc<dyn Trap>,
    ) -> Self {
        Self {
            receiver,
            entries,
            grace_period,
            trap,
        }
    }

    pub(crate) fn run(self) {
        // every entry gets the same grace period, so deadlines are ordered like the queue
        let mut pending: VecDeque<Pending> = VecDeque::new();

        loop {
            let task = match pending.front() {
                Some(next) => {
                    let timeout = next.deadline.saturating_duration_since(Instant::now());
                    match self.receiver.recv_timeout(timeout) {
                        Ok(task) => Some(task),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.receiver.recv() {
                    Ok(task) => Some(task),
                    Err(_) => break,
                },
            };

            if let Some(Task::Retire { entries }) = task {
                let deadline = Instant::now() + self.grace_period;
                pending.extend(entries.into_iter().map(|entry| Pending { deadline, entry }));
            }

            let now = Instant::now();
            while pending.front().is_some_and(|next| next.deadline <= now) {
                if let Some(Pending { entry, .. }) = pending.pop_front() {
                    self.close(entry);
                }
            }
        }

        // shutting down: nothing will write through a retired or queued handle any more
        for Pending { entry, .. } in pending {
            self.close(entry);
        }
        let remaining = std::mem::take(&mut *lock_entries(&self.entries));
        for entry in remaining {
            self.close(entry);
        }
    }

    fn close(&self, entry: RetirementEntry) {
        close_entry(&entry, self.trap.as_ref());
    }
}
