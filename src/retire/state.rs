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

use std::sync::Arc;
use std::thread::JoinHandle;

use arc_swap::ArcSwapOption;
use crossbeam_channel::Sender;

use crate::Error;
use crate::ErrorKind;
use crate::Trap;
use crate::retire::Task;

#[derive(Debug)]
pub(crate) struct RetireState {
    state: ArcSwapOption<State>,
    trap: Arc<dyn Trap>,
}

#[derive(Debug)]
struct State {
    sender: Sender<Task>,
    handle: JoinHandle<()>,
}

impl RetireState {
    pub(crate) fn new(sender: Sender<Task>, handle: JoinHandle<()>, trap: Arc<dyn Trap>) -> Self {
        let state = State { sender, handle };
        Self {
            state: ArcSwapOption::from(Some(Arc::new(state))),
            trap,
        }
    }

    /// Hand `task` to the worker, or give it back if the worker is gone.
    pub(crate) fn send_task(&self, task: Task) -> Result<(), Task> {
        let state = self.state.load();
        match state.as_ref() {
            Some(state) => state.sender.send(task).map_err(|err| err.0),
            None => Err(task),
        }
    }

    pub(crate) fn destroy(&self) {
        if let Some(mut state) = self.state.swap(None) {
            // a concurrent `send_task` may still hold a strong count for a moment
            let State { sender, handle } = loop {
                match Arc::try_unwrap(state) {
                    Ok(state) => break state,
                    Err(shared) => {
                        std::thread::yield_now();
                        state = shared;
                    }
                }
            };

            // drop our sender, the worker cancels its waits once the channel disconnects
            drop(sender);

            // wait for the thread to finish
            if handle.join().is_err() {
                let err = Error::new(ErrorKind::Unexpected, "log retirement thread panicked");
                self.trap.trap(&err);
            }
        }
    }
}

impl Drop for RetireState {
    fn drop(&mut self) {
        self.destroy();
    }
}
