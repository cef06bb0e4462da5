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

//! Log record and severity levels.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

use crate::Error;
use crate::ErrorKind;

/// The payload of a log message.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: SystemTime,

    level: Level,
    file: Option<&'a str>,
    line: Option<u32>,

    // the payload
    args: fmt::Arguments<'a>,
}

impl<'a> Record<'a> {
    /// Create a new [`RecordBuilder`].
    pub fn builder() -> RecordBuilder<'a> {
        RecordBuilder::default()
    }

    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.now
    }

    /// The severity of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The source file containing the message.
    pub fn file(&self) -> Option<&'a str> {
        self.file
    }

    /// The final path component of [`file`](Record::file), or an empty string.
    pub fn filename(&self) -> &'a str {
        self.file
            .map(|file| {
                Path::new(file)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(file)
            })
            .unwrap_or_default()
    }

    /// The line containing the message.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// The message body.
    pub fn args(&self) -> &fmt::Arguments<'a> {
        &self.args
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    record: Record<'a>,
}

impl Default for RecordBuilder<'_> {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                now: SystemTime::now(),
                level: Level::Info,
                file: None,
                line: None,
                args: format_args!(""),
            },
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Set [`args`](Record::args).
    pub fn args(mut self, args: fmt::Arguments<'a>) -> Self {
        self.record.args = args;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`file`](Record::file).
    pub fn file(mut self, file: Option<&'a str>) -> Self {
        self.record.file = file;
        self
    }

    /// Set [`line`](Record::line).
    pub fn line(mut self, line: Option<u32>) -> Self {
        self.record.line = line;
        self
    }

    /// Set [`time`](Record::time).
    pub fn time(mut self, now: SystemTime) -> Self {
        self.record.now = now;
        self
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record<'a> {
        self.record
    }
}

/// An enum representing the available severity levels, from least to most severe.
#[repr(usize)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Level {
    /// The "debug" level.
    ///
    /// Designates lower priority information.
    Debug = 100,
    /// The "info" level.
    ///
    /// Designates useful information.
    Info = 200,
    /// The "notice" level.
    ///
    /// Designates normal but significant events.
    Notice = 300,
    /// The "warning" level.
    ///
    /// Designates hazardous situations.
    Warning = 400,
    /// The "error" level.
    ///
    /// Designates very serious errors.
    Error = 500,
    /// The "critical" level.
    ///
    /// Designates failures the process may not survive.
    Critical = 600,
}

impl Level {
    const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Parse a level name, falling back to [`Level::Info`] if the name is unknown.
    pub fn parse_or_info(name: &str) -> Level {
        name.parse().unwrap_or(Level::Info)
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.as_str()) {
                return Ok(level);
            }
        }

        Err(Error::new(ErrorKind::InvalidLevel, "malformed log level").with_context("name", s))
    }
}
