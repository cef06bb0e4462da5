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

//! A builder that folds annotations and timings of one operation into a single log line.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write;
use std::time::Instant;

use crate::Backend;
use crate::Level;

/// Accumulates key/value annotations and named timer measurements, then emits them as one
/// [`Level::Info`] line.
///
/// A record belongs to one logical operation and one owner; every mutation takes `&mut self`.
///
/// # Examples
///
/// ```
/// use logswitch::Backend;
/// use logswitch::BufferRecord;
///
/// let backend = Backend::new();
/// let mut record = BufferRecord::with_value(&backend, "checkout");
/// record.start_timer("db");
/// // ... query ...
/// record.stop_timer("db");
/// record.append_pair("order", 42);
/// record.flush();
/// ```
#[derive(Debug)]
pub struct BufferRecord<'a> {
    buffer: String,
    timers: HashMap<String, Instant>,
    backend: &'a Backend,
}

impl<'a> BufferRecord<'a> {
    /// Create an empty record flushing to `backend`.
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            buffer: String::new(),
            timers: HashMap::new(),
            backend,
        }
    }

    /// Create a record whose line starts with `value`.
    pub fn with_value(backend: &'a Backend, value: impl fmt::Display) -> Self {
        let mut record = Self::new(backend);
        record.push(format_args!("{value}"));
        record
    }

    /// Create a record whose line starts with `key=value`.
    pub fn with_pair(
        backend: &'a Backend,
        key: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        let mut record = Self::new(backend);
        record.push(format_args!("{key}={value}"));
        record
    }

    /// Start (or restart) the timer `name`.
    pub fn start_timer(&mut self, name: impl Into<String>) -> &mut Self {
        self.timers.insert(name.into(), Instant::now());
        self
    }

    /// Append ` name=<elapsed>ms` for the timer `name`, elapsed in fractional milliseconds.
    ///
    /// The timer keeps running, so a later stop measures from the same start. Does nothing if
    /// `name` was never started.
    pub fn stop_timer(&mut self, name: &str) -> &mut Self {
        if let Some(start) = self.timers.get(name) {
            let millis = start.elapsed().as_secs_f64() * 1e3;
            self.push(format_args!(" {name}={millis}ms"));
        }
        self
    }

    /// Append ` value`.
    pub fn append(&mut self, value: impl fmt::Display) -> &mut Self {
        self.push(format_args!(" {value}"));
        self
    }

    /// Append ` key=value`.
    pub fn append_pair(&mut self, key: impl fmt::Display, value: impl fmt::Display) -> &mut Self {
        self.push(format_args!(" {key}={value}"));
        self
    }

    /// Append a space and the formatted arguments.
    ///
    /// ```
    /// # let backend = logswitch::Backend::new();
    /// let mut record = logswitch::BufferRecord::new(&backend);
    /// record.append_fmt(format_args!("{}/{}", 3, 4));
    /// assert_eq!(record.as_str(), " 3/4");
    /// ```
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        self.push(format_args!(" {args}"));
        self
    }

    fn push(&mut self, args: fmt::Arguments<'_>) {
        // SAFETY: write to a string always succeeds
        self.buffer.write_fmt(args).unwrap();
    }

    /// The line accumulated so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Emit the accumulated line at [`Level::Info`].
    ///
    /// The buffer is kept; flushing twice emits the line twice.
    #[track_caller]
    pub fn flush(&self) {
        self.backend.emit(Level::Info, &self.buffer);
    }
}
