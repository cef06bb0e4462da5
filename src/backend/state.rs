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

use crate::Error;
use crate::Layout;
use crate::Level;
use crate::append::Sink;
use crate::record::Record;

/// One immutable logging configuration.
///
/// A [`Backend`](crate::Backend) publishes a new state on every successful reconfiguration and
/// never mutates a published one, so a writer holding a state always sees a consistent sink,
/// layout and level.
#[derive(Debug)]
pub struct BackendState {
    sink: Sink,
    layout: Arc<dyn Layout>,
    level: Level,
    generation: u64,
}

impl BackendState {
    pub(crate) fn new(sink: Sink, layout: Arc<dyn Layout>, level: Level, generation: u64) -> Self {
        Self {
            sink,
            layout,
            level,
            generation,
        }
    }

    /// The destination of formatted lines.
    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// The layout lines are formatted with.
    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    /// The minimum level that is written.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The publication counter of this state, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a record at `level` passes this state's filter.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    pub(crate) fn emit(&self, record: &Record) -> Result<(), Error> {
        if !self.enabled(record.level()) {
            return Ok(());
        }

        let bytes = self.layout.format(record)?;
        self.sink.write_line(bytes)
    }
}
