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

//! Sinks that receive formatted log lines.

use std::sync::Arc;

use crate::Error;

mod file;
mod stdio;

pub use self::file::LogFile;
pub use self::stdio::Capture;
pub use self::stdio::Console;

/// The destination of formatted log output.
#[derive(Debug, Clone)]
pub enum Sink {
    /// A console stream.
    Console(Console),
    /// A file opened for append. The handle is shared with the retirement queue so it can be
    /// closed once the sink is superseded.
    File(Arc<LogFile>),
}

impl Sink {
    /// Whether this sink writes to a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Sink::File(_))
    }

    /// Write one formatted line, appending the trailing newline.
    pub(crate) fn write_line(&self, mut bytes: Vec<u8>) -> Result<(), Error> {
        bytes.push(b'\n');
        match self {
            Sink::Console(console) => console.write_all(&bytes),
            Sink::File(file) => file.write_all(&bytes),
        }
    }
}
